//! Binding resolution
//!
//! Scopes and symbols used by the flow graph builder to map identifiers to
//! their declarations. Identifiers with no declaration are globals.

pub mod scope;
pub mod symbols;

pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbols::{Symbol, SymbolId, SymbolKind, SymbolTable};
