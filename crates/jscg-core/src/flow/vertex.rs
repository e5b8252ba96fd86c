//! Flow graph vertex kinds

use std::fmt;

use crate::program::{CallId, FileId, FunctionId};
use crate::semantic::SymbolId;

/// Identifies a compound expression (`a || b`, `c ? f : g`) by its
/// file-relative byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprKey {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

/// An abstract value-flow point.
///
/// Parameter and argument slot 0 is the receiver (`this`); slot `i` for
/// `i >= 1` is the `i`-th declared parameter or actual argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Vertex {
    /// A function referenced as a value.
    Func(FunctionId),
    /// Whatever value is invoked at a call expression.
    Callee(CallId),
    /// A built-in function, named `Owner_member` or after the global.
    Native(&'static str),
    Param(FunctionId, usize),
    Arg(CallId, usize),
    Ret(FunctionId),
    Res(CallId),
    /// A value whose provenance is not tracked. Traversal stops here.
    Unknown,
    /// A resolved local binding.
    Var(SymbolId),
    /// Every property with this name, on any object, including globals.
    Prop(String),
    Expr(ExprKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexKind {
    Func,
    Callee,
    Native,
    Param,
    Arg,
    Ret,
    Res,
    Unknown,
    Var,
    Prop,
    Expr,
}

impl Vertex {
    pub fn kind(&self) -> VertexKind {
        match self {
            Vertex::Func(_) => VertexKind::Func,
            Vertex::Callee(_) => VertexKind::Callee,
            Vertex::Native(_) => VertexKind::Native,
            Vertex::Param(..) => VertexKind::Param,
            Vertex::Arg(..) => VertexKind::Arg,
            Vertex::Ret(_) => VertexKind::Ret,
            Vertex::Res(_) => VertexKind::Res,
            Vertex::Unknown => VertexKind::Unknown,
            Vertex::Var(_) => VertexKind::Var,
            Vertex::Prop(_) => VertexKind::Prop,
            Vertex::Expr(_) => VertexKind::Expr,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Vertex::Unknown)
    }

    pub fn as_callee(&self) -> Option<CallId> {
        match self {
            Vertex::Callee(call) => Some(*call),
            _ => None,
        }
    }

    pub fn prop(name: impl Into<String>) -> Self {
        Vertex::Prop(name.into())
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VertexKind::Func => "FuncVertex",
            VertexKind::Callee => "CalleeVertex",
            VertexKind::Native => "NativeVertex",
            VertexKind::Param => "ParamVertex",
            VertexKind::Arg => "ArgVertex",
            VertexKind::Ret => "RetVertex",
            VertexKind::Res => "ResVertex",
            VertexKind::Unknown => "UnknownVertex",
            VertexKind::Var => "VarVertex",
            VertexKind::Prop => "PropVertex",
            VertexKind::Expr => "ExprVertex",
        };
        f.write_str(name)
    }
}
