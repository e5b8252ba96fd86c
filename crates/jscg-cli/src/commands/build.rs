//! Build command - constructs the call graph of a set of files

use crate::files::{apply_filters, collect_files, parse_filters};
use crate::output::{json, pretty};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use jscg_core::config::{Config, load_config_or_default_with_warnings};
use jscg_core::{Analysis, AnalysisOptions, Analyzer, ParsedFile, Strategy};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Files or directories to analyze
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Propagation strategy (demand, full)
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<Strategy>,

    /// Include (+regex) or exclude (-regex) files; applied in order
    #[arg(long = "filter", value_name = "FILTER", allow_hyphen_values = true)]
    pub filters: Vec<String>,

    /// Print the call graph
    #[arg(long)]
    pub cg: bool,

    /// Print the flow graph
    #[arg(long)]
    pub fg: bool,

    /// Count function literals passed as call arguments
    #[arg(long)]
    pub count_cb: bool,

    /// Print file dependencies from resolved imports and requires
    #[arg(long)]
    pub req_js: bool,

    /// Write the call graph as JSON to FILE (.json is appended if missing)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print phase timings to stderr
    #[arg(long)]
    pub time: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl BuildArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let config = self.load_config();
        let files = self.select_files(&config)?;

        let start = Instant::now();
        let parsed = read_files(&files)?;
        let parsing = start.elapsed();

        let analysis = Analyzer::new(self.options(&config)).analyze(&parsed);
        self.report(&analysis, parsing)
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }

    fn load_config(&self) -> Config {
        let start = self
            .paths
            .first()
            .map(|path| config_dir(path))
            .unwrap_or_else(|| PathBuf::from("."));
        let result = load_config_or_default_with_warnings(&start);
        for warning in &result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        result.config
    }

    fn options(&self, config: &Config) -> AnalysisOptions {
        let options = AnalysisOptions::from(&config.analysis);
        AnalysisOptions {
            strategy: self.strategy.unwrap_or(options.strategy),
            ..options
        }
    }

    /// Config patterns first, then command-line filters.
    fn select_files(&self, config: &Config) -> Result<Vec<PathBuf>> {
        let mut specs = config.filters();
        specs.extend(self.filters.iter().cloned());
        let filters = parse_filters(&specs)?;

        let files = apply_filters(collect_files(&self.paths), &filters);
        if files.is_empty() {
            anyhow::bail!("Input file list is empty");
        }
        info!(files = files.len(), "input files selected");
        Ok(files)
    }

    fn report(&self, analysis: &Analysis, parsing: Duration) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        if self.fg {
            pretty::write_flow_graph(&mut out, analysis)?;
        }
        if self.count_cb {
            pretty::write_callback_count(&mut out, analysis)?;
        }
        if self.req_js {
            pretty::write_dependencies(&mut out, analysis)?;
        }
        if self.cg {
            pretty::write_call_graph(&mut out, analysis)?;
        }
        out.flush()?;

        if let Some(output) = &self.output {
            let written = json::write_edges(output, &analysis.edges()?)?;
            info!(path = %written.display(), edges = analysis.stats.call_edges, "call graph written");
        }

        let stderr = io::stderr();
        let mut err = stderr.lock();
        for failure in &analysis.parse_failures {
            writeln!(err, "{} could not parse {}", "warning:".yellow().bold(), failure)?;
        }
        if self.time {
            pretty::write_timings(&mut err, parsing, analysis)?;
        }
        if !self.cg && !self.fg {
            pretty::write_summary(&mut err, analysis)?;
        }
        Ok(())
    }
}

/// Directory where the config search starts for an input path.
fn config_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}

/// Reads and parses files in parallel; the result keeps input order.
fn read_files(files: &[PathBuf]) -> Result<Vec<ParsedFile>> {
    files
        .par_iter()
        .map(|file| {
            let content = fs::read_to_string(file)
                .with_context(|| format!("Failed to read '{}'", file.display()))?;
            Ok(ParsedFile::from_source(&file.to_string_lossy(), &content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscg_core::config::CONFIG_FILENAME;
    use tempfile::tempdir;

    fn args(paths: Vec<PathBuf>) -> BuildArgs {
        BuildArgs {
            paths,
            strategy: None,
            filters: Vec::new(),
            cg: false,
            fg: false,
            count_cb: false,
            req_js: false,
            output: None,
            time: false,
            no_color: true,
        }
    }

    #[test]
    fn empty_file_list_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "# notes").unwrap();

        let err = args(vec![dir.path().to_path_buf()]).run().unwrap_err();

        assert_eq!(err.to_string(), "Input file list is empty");
    }

    #[test]
    fn filters_can_empty_the_list() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.test.js"), "f();").unwrap();
        let mut build = args(vec![dir.path().to_path_buf()]);
        build.filters = vec!["-\\.test\\.js$".to_string()];

        assert!(build.run().is_err());
    }

    #[test]
    fn config_excludes_apply_before_cli_filters() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "exclude = [\"vendor\"]").unwrap();
        fs::create_dir(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/lib.js"), "").unwrap();
        fs::write(dir.path().join("app.js"), "").unwrap();

        let build = args(vec![dir.path().to_path_buf()]);
        let config = build.load_config();
        let files = build.select_files(&config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("app.js"));

        let mut readd = args(vec![dir.path().to_path_buf()]);
        readd.filters = vec!["+vendor".to_string()];
        assert_eq!(readd.select_files(&config).unwrap().len(), 2);
    }

    #[test]
    fn command_line_strategy_overrides_config() {
        let mut build = args(vec![PathBuf::from(".")]);
        let config = Config::default();
        assert_eq!(build.options(&config).strategy, Strategy::Demand);

        build.strategy = Some(Strategy::Full);
        assert_eq!(build.options(&config).strategy, Strategy::Full);
    }

    #[test]
    fn writes_json_output() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "function f() {}\nf();").unwrap();
        let mut build = args(vec![dir.path().join("app.js")]);
        build.output = Some(dir.path().join("cg"));

        build.run().unwrap();

        let content = fs::read_to_string(dir.path().join("cg.json")).unwrap();
        let edges: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(edges.as_array().unwrap().len(), 1);
        assert_eq!(edges[0]["target"]["label"], "f");
    }

    #[test]
    fn optional_reports_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lib.js"), "export function f(cb) { cb(); }").unwrap();
        fs::write(dir.path().join("main.js"), "import { f } from './lib';\nf(() => {});").unwrap();
        let mut build = args(vec![dir.path().to_path_buf()]);
        build.count_cb = true;
        build.req_js = true;

        assert!(build.run().is_ok());
    }

    #[test]
    fn read_files_keeps_input_order() {
        let dir = tempdir().unwrap();
        let names = ["c.js", "a.js", "b.js"];
        let files: Vec<PathBuf> = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                fs::write(&path, "x();").unwrap();
                path
            })
            .collect();

        let parsed = read_files(&files).unwrap();

        let order: Vec<&str> = parsed.iter().map(|p| p.filename()).collect();
        let expected: Vec<String> = files.iter().map(|f| f.to_string_lossy().to_string()).collect();
        assert_eq!(order, expected);
    }
}
