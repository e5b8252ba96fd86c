//! Cross-file module linking
//!
//! The intraprocedural builder records, per file, which values each module
//! exports and where imported bindings live. Linking resolves relative
//! specifiers against the analysed file set and connects exports to imports.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::graph::{FlowGraph, VertexId};
use super::vertex::Vertex;
use crate::program::{CallId, FileId};

/// Extensions tried, in order, when a specifier omits one.
pub const RESOLVE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportedName {
    Default,
    Named(String),
    Namespace,
}

#[derive(Debug, Clone)]
pub struct ImportBinding {
    pub specifier: String,
    pub imported: ImportedName,
    /// Vertex receiving the imported value.
    pub local: VertexId,
}

#[derive(Debug, Clone)]
pub struct ExportBinding {
    /// Exported name; the default export is named `default`.
    pub name: String,
    pub value: VertexId,
}

#[derive(Debug, Clone)]
pub struct RequireCall {
    pub specifier: String,
    pub call: CallId,
}

#[derive(Debug, Clone)]
pub struct ModuleRecord {
    pub file: FileId,
    pub path: PathBuf,
    pub exports: Vec<ExportBinding>,
    pub imports: Vec<ImportBinding>,
    pub requires: Vec<RequireCall>,
}

impl ModuleRecord {
    pub fn new(file: FileId, path: impl Into<PathBuf>) -> Self {
        Self {
            file,
            path: path.into(),
            exports: Vec::new(),
            imports: Vec::new(),
            requires: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn export_names(&self) -> Vec<&str> {
        self.exports.iter().map(|e| e.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub resolved: usize,
    pub unresolved: usize,
    pub edges_added: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Import,
    Require,
}

/// `from` imports or requires `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDependency {
    pub from: FileId,
    pub to: FileId,
    pub kind: DependencyKind,
}

#[derive(Debug, Clone, Default)]
pub struct ModuleLinks {
    pub stats: LinkStats,
    /// One entry per linked file pair, in first-reference order.
    pub dependencies: Vec<ModuleDependency>,
}

impl ModuleLinks {
    fn depend(
        &mut self,
        from: FileId,
        to: FileId,
        kind: DependencyKind,
        seen: &mut HashSet<(FileId, FileId)>,
    ) {
        if seen.insert((from, to)) {
            self.dependencies.push(ModuleDependency { from, to, kind });
        }
    }
}

/// Lexically normalises `.` and `..` components without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn with_extension_appended(base: &Path, ext: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_os_string();
    raw.push(".");
    raw.push(ext);
    PathBuf::from(raw)
}

/// Resolves a relative specifier against the importing file. Tries the
/// exact path, then each known extension, then `index.<ext>`. Returns the
/// index of the matching module in `known`.
pub fn resolve_specifier(
    from: &Path,
    specifier: &str,
    known: &HashMap<PathBuf, usize>,
) -> Option<usize> {
    if !is_relative_specifier(specifier) {
        return None;
    }

    let dir = from.parent().unwrap_or(Path::new(""));
    let base = normalize_path(&dir.join(specifier));

    if let Some(&index) = known.get(&base) {
        return Some(index);
    }
    for ext in RESOLVE_EXTENSIONS {
        if let Some(&index) = known.get(&with_extension_appended(&base, ext)) {
            return Some(index);
        }
    }
    for ext in RESOLVE_EXTENSIONS {
        if let Some(&index) = known.get(&base.join(format!("index.{}", ext))) {
            return Some(index);
        }
    }
    None
}

/// Connects every import and `require` in `records` to the exports of the
/// module it resolves to.
pub fn link_modules(graph: &mut FlowGraph, records: &[ModuleRecord]) -> ModuleLinks {
    let known: HashMap<PathBuf, usize> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (normalize_path(&record.path), index))
        .collect();

    let mut links = ModuleLinks::default();
    let mut seen = HashSet::new();

    for record in records {
        for import in &record.imports {
            let Some(target) = resolve_in(record, &import.specifier, &known, &mut links.stats)
            else {
                continue;
            };
            links.depend(record.file, records[target].file, DependencyKind::Import, &mut seen);
            let stats = &mut links.stats;
            let exports = &records[target].exports;
            match &import.imported {
                ImportedName::Default => {
                    stats.edges_added += connect_named(graph, exports, "default", import.local);
                }
                ImportedName::Named(name) => {
                    stats.edges_added += connect_named(graph, exports, name, import.local);
                }
                ImportedName::Namespace => {
                    stats.edges_added += connect_namespace(graph, exports);
                }
            }
        }

        for require in &record.requires {
            let Some(target) = resolve_in(record, &require.specifier, &known, &mut links.stats)
            else {
                continue;
            };
            links.depend(record.file, records[target].file, DependencyKind::Require, &mut seen);
            let stats = &mut links.stats;
            let exports = &records[target].exports;
            let res = graph.intern(Vertex::Res(require.call));
            stats.edges_added += connect_named(graph, exports, "default", res);
            stats.edges_added += connect_namespace(graph, exports);
        }
    }

    links
}

fn resolve_in(
    record: &ModuleRecord,
    specifier: &str,
    known: &HashMap<PathBuf, usize>,
    stats: &mut LinkStats,
) -> Option<usize> {
    let resolved = resolve_specifier(&record.path, specifier, known);
    match resolved {
        Some(_) => stats.resolved += 1,
        None => {
            stats.unresolved += 1;
            if is_relative_specifier(specifier) {
                warn!(
                    file = %record.path.display(),
                    specifier,
                    "unresolved module specifier"
                );
            } else {
                debug!(specifier, "skipping package import");
            }
        }
    }
    resolved
}

fn connect_named(graph: &mut FlowGraph, exports: &[ExportBinding], name: &str, to: VertexId) -> usize {
    exports
        .iter()
        .filter(|export| export.name == name)
        .filter(|export| graph.add_edge(export.value, to))
        .count()
}

fn connect_namespace(graph: &mut FlowGraph, exports: &[ExportBinding]) -> usize {
    let mut added = 0;
    for export in exports.iter().filter(|e| e.name != "default") {
        let prop = graph.intern(Vertex::prop(export.name.clone()));
        if graph.add_edge(export.value, prop) {
            added += 1;
        }
    }
    added
}
