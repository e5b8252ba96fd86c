//! Input file discovery and `+re`/`-re` filtering

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

/// Resolves every input path and collects the supported files below it.
/// Missing paths are reported and skipped.
pub fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        let resolved = std::path::absolute(path).unwrap_or_else(|_| path.clone());
        if !resolved.exists() {
            eprintln!(
                "{} The path \"{}\" does not exist.",
                "warning:".yellow().bold(),
                resolved.display()
            );
            continue;
        }
        files.extend(discover_files(&resolved));
    }
    dedup(files)
}

fn discover_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if is_supported_file(path) {
            return vec![path.to_path_buf()];
        } else {
            return vec![];
        }
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}

fn dedup(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| seen.insert(file.clone()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    Add,
    Remove,
}

#[derive(Debug, Clone)]
pub struct Filter {
    pub action: FilterAction,
    pub pattern: Regex,
}

impl FromStr for Filter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let action = match s.chars().next() {
            Some('+') => FilterAction::Add,
            Some('-') => FilterAction::Remove,
            _ => anyhow::bail!("Invalid filter '{}'. Filters start with '+' or '-'", s),
        };
        let pattern = s[1..].trim();
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid regular expression in filter '{}'", s))?;
        Ok(Self { action, pattern })
    }
}

pub fn parse_filters(filters: &[String]) -> Result<Vec<Filter>> {
    filters.iter().map(|f| f.parse()).collect()
}

/// Applies the filters to each file in order: a matching `-` filter drops
/// the file, a matching `+` filter adds it back. The result keeps first
/// occurrences only.
pub fn apply_filters(files: Vec<PathBuf>, filters: &[Filter]) -> Vec<PathBuf> {
    if filters.is_empty() {
        return files;
    }

    let mut kept: Vec<PathBuf> = Vec::with_capacity(files.len());
    for file in files {
        let name = file.to_string_lossy().to_string();
        kept.push(file.clone());
        for filter in filters {
            if !filter.pattern.is_match(&name) {
                continue;
            }
            match filter.action {
                FilterAction::Remove => {
                    debug!(file = %name, filter = %filter.pattern, "filtered out");
                    kept.retain(|f| f != &file);
                }
                FilterAction::Add => kept.push(file.clone()),
            }
        }
    }
    dedup(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn filters(specs: &[&str]) -> Vec<Filter> {
        let specs: Vec<String> = specs.iter().map(|s| s.to_string()).collect();
        parse_filters(&specs).unwrap()
    }

    #[test]
    fn collects_supported_files_recursively() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();
        File::create(dir.path().join("root.js")).unwrap();
        File::create(src.join("nested.ts")).unwrap();
        File::create(src.join("readme.md")).unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]);

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn skips_hidden_directories_and_node_modules() {
        let dir = tempdir().unwrap();
        for skipped in [".git", "node_modules"] {
            let sub = dir.path().join(skipped);
            fs::create_dir(&sub).unwrap();
            File::create(sub.join("dep.js")).unwrap();
        }
        File::create(dir.path().join("app.js")).unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]);

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));
    }

    #[test]
    fn missing_paths_are_skipped() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.js")).unwrap();

        let files = collect_files(&[dir.path().join("missing"), dir.path().join("a.js")]);

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn repeated_inputs_are_deduplicated() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.js");
        File::create(&file).unwrap();

        let files = collect_files(&[file.clone(), dir.path().to_path_buf(), file]);

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn is_supported_file_accepts_all_extensions() {
        for ext in SUPPORTED_EXTENSIONS {
            assert!(is_supported_file(Path::new(&format!("test.{}", ext))));
        }
        assert!(!is_supported_file(Path::new("test.vue")));
        assert!(!is_supported_file(Path::new("test.json")));
    }

    #[test]
    fn minus_filter_removes_matches() {
        let files = paths(&["src/a.js", "test/a.test.js", "src/b.js"]);

        let kept = apply_filters(files, &filters(&["-test"]));

        assert_eq!(kept, paths(&["src/a.js", "src/b.js"]));
    }

    #[test]
    fn plus_filter_readds_after_minus() {
        let files = paths(&["src/a.js", "test/keep.test.js", "test/drop.test.js"]);

        let kept = apply_filters(files, &filters(&["-test", "+keep"]));

        assert_eq!(kept, paths(&["src/a.js", "test/keep.test.js"]));
    }

    #[test]
    fn minus_after_plus_wins() {
        let files = paths(&["lib/x.js"]);

        let kept = apply_filters(files, &filters(&["+x", "-lib"]));

        assert!(kept.is_empty());
    }

    #[test]
    fn filters_need_a_sign_and_a_valid_regex() {
        assert!("test".parse::<Filter>().is_err());
        assert!("-(".parse::<Filter>().is_err());
        assert_eq!("+ src ".parse::<Filter>().unwrap().pattern.as_str(), "src");
    }
}
