//! Flow graph construction and the demand-driven fixpoint
//!
//! - [`intraprocedural`] builds the per-function edges from parsed modules
//! - [`modules`] links imports to exports across files
//! - [`natives`] seeds built-in functions
//! - [`interprocedural`] adds argument and return edges on demand
//! - [`callbacks`] counts function literals passed as arguments

pub mod callbacks;
pub mod graph;
pub mod interprocedural;
pub mod intraprocedural;
pub mod modules;
pub mod natives;
pub mod reachability;
pub mod vertex;

pub use callbacks::{CallbackStats, count_callbacks};
pub use graph::{FlowGraph, VertexId};
pub use interprocedural::{PropagationStats, Propagator, RoundOutcome, Strategy};
pub use intraprocedural::{FlowContext, build_file};
pub use modules::{
    DependencyKind, LinkStats, ModuleDependency, ModuleLinks, ModuleRecord, link_modules,
};
pub use natives::{NATIVE_FUNCTIONS, seed_natives};
pub use reachability::{ReachabilityIndex, not_unknown, reachability};
pub use vertex::{ExprKey, Vertex, VertexKind};
