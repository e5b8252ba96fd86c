//! jscg core - demand-driven call graph construction for JavaScript and
//! TypeScript
//!
//! Source files are parsed with swc, lowered into a flow graph of abstract
//! values, and interprocedural flow is added only where it can influence
//! which function a call site invokes.

pub mod analysis;
pub mod callgraph;
pub mod config;
pub mod flow;
pub mod parser;
pub mod program;
pub mod semantic;

pub use analysis::{Analysis, AnalysisOptions, Analyzer};
pub use callgraph::{CallGraph, CallGraphEdge, Callee};
pub use flow::Strategy;
pub use parser::ParsedFile;
