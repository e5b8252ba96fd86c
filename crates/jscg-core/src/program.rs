//! Program model consumed by the flow graph and call graph builders
//!
//! Functions and call sites are allocated once, in discovery order, while
//! the intraprocedural builder walks the parsed modules. Flow graph vertices
//! refer back to them by id for location reporting.

use std::ops::Range;
use std::path::PathBuf;

use id_arena::{Arena, Id};
use serde::Serialize;

pub type FunctionId = Id<Function>;
pub type CallId = Id<CallSite>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub start: Position,
    pub end: Position,
    pub range: Range<u32>,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
}

impl SourceFile {
    /// File name without directories, used in compact position strings.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }
}

#[derive(Debug)]
pub struct Function {
    pub id: FunctionId,
    pub name: Option<String>,
    /// Declared parameters, not counting the receiver slot.
    pub param_count: usize,
    pub file: FileId,
    pub location: Location,
    pub enclosing: Option<FunctionId>,
    pub is_arrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    New,
}

#[derive(Debug)]
pub struct CallSite {
    pub id: CallId,
    pub kind: CallKind,
    /// Actual arguments, not counting the receiver slot.
    pub arg_count: usize,
    pub enclosing: Option<FunctionId>,
    pub file: FileId,
    pub location: Location,
}

#[derive(Debug, Default)]
pub struct Program {
    files: Vec<SourceFile>,
    functions: Arena<Function>,
    calls: Arena<CallSite>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile {
            id,
            path: path.into(),
        });
        id
    }

    pub fn add_function(
        &mut self,
        name: Option<String>,
        param_count: usize,
        file: FileId,
        location: Location,
        enclosing: Option<FunctionId>,
        is_arrow: bool,
    ) -> FunctionId {
        self.functions.alloc_with_id(|id| Function {
            id,
            name,
            param_count,
            file,
            location,
            enclosing,
            is_arrow,
        })
    }

    pub fn add_call(
        &mut self,
        kind: CallKind,
        arg_count: usize,
        enclosing: Option<FunctionId>,
        file: FileId,
        location: Location,
    ) -> CallId {
        self.calls.alloc_with_id(|id| CallSite {
            id,
            kind,
            arg_count,
            enclosing,
            file,
            location,
        })
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id]
    }

    pub fn call(&self, id: CallId) -> &CallSite {
        &self.calls[id]
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.iter().map(|(_, f)| f)
    }

    pub fn calls(&self) -> impl Iterator<Item = &CallSite> {
        self.calls.iter().map(|(_, c)| c)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    pub fn function_label(&self, id: FunctionId) -> &str {
        self.functions[id].name.as_deref().unwrap_or("anon")
    }

    /// `<file>@<line>:<start>-<end>`
    pub fn pretty_position(&self, file: FileId, location: &Location) -> String {
        format!(
            "{}@{}:{}-{}",
            self.file(file).display_name(),
            location.start.line,
            location.range.start,
            location.range.end
        )
    }

    /// Label of the function enclosing a call site, `global` at top level.
    pub fn enclosing_label(&self, call: CallId) -> String {
        match self.calls[call].enclosing {
            Some(func) => {
                let function = &self.functions[func];
                format!(
                    "{} ({})",
                    self.function_label(func),
                    self.pretty_position(function.file, &function.location)
                )
            }
            None => "global".to_string(),
        }
    }
}
