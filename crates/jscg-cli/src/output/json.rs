//! JSON call graph output
//!
//! Edges are streamed one at a time into a single JSON array so that very
//! large graphs never have to be held as one string.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jscg_core::CallGraphEdge;

/// `path` with `.json` appended unless it already ends in `.json`.
pub fn output_path(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(".json") {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".json");
        PathBuf::from(raw)
    }
}

pub fn write_edges_to<W: Write>(writer: &mut W, edges: &[CallGraphEdge]) -> io::Result<()> {
    writer.write_all(b"[")?;
    for (index, edge) in edges.iter().enumerate() {
        if index > 0 {
            writer.write_all(b",")?;
        }
        serde_json::to_writer_pretty(&mut *writer, edge)?;
    }
    writer.write_all(b"]")
}

/// Writes `edges` to `path` (see [`output_path`]) and returns the file
/// actually written.
pub fn write_edges(path: &Path, edges: &[CallGraphEdge]) -> Result<PathBuf> {
    let path = output_path(path);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_edges_to(&mut writer, edges)
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jscg_core::{Analyzer, ParsedFile};

    fn edges(code: &str) -> Vec<CallGraphEdge> {
        let files = vec![ParsedFile::from_source("/p/app.js", code)];
        Analyzer::default().analyze(&files).edges().unwrap()
    }

    #[test]
    fn appends_json_extension() {
        assert_eq!(output_path(Path::new("out")), PathBuf::from("out.json"));
        assert_eq!(output_path(Path::new("cg.json")), PathBuf::from("cg.json"));
        assert_eq!(output_path(Path::new("a.b")), PathBuf::from("a.b.json"));
    }

    #[test]
    fn writes_a_json_array_of_edges() {
        let edges = edges("function f() {}\nf();\nMath.max(1, 2);");
        let mut buffer = Vec::new();

        write_edges_to(&mut buffer, &edges).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), edges.len());
        assert_eq!(array[0]["source"]["label"], "global");
        assert_eq!(array[0]["target"]["label"], "f");
        assert_eq!(array[0]["target"]["start"]["row"], 1);
        assert_eq!(array[1]["target"]["file"], "Native");
        assert!(array[1]["target"]["range"]["start"].is_null());
    }

    #[test]
    fn empty_graph_is_an_empty_array() {
        let mut buffer = Vec::new();
        write_edges_to(&mut buffer, &[]).unwrap();
        assert_eq!(buffer, b"[]");
    }

    #[test]
    fn write_edges_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_edges(&dir.path().join("graph"), &edges("function f() {}\nf();")).unwrap();

        assert!(written.ends_with("graph.json"));
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.starts_with('['));
        assert!(content.ends_with(']'));
    }
}
