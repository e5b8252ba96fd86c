//! Declared bindings
//!
//! Flow graph `Var` vertices are keyed by [`SymbolId`], so a binding is
//! declared exactly once per scope and name.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;

use super::scope::{ScopeId, ScopeTree};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Class,
    Parameter,
    Import,
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Arena<Symbol>,
    bindings: HashMap<(ScopeId, String), SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` in `scope`. A second declaration of the same name in the
    /// same scope (`var x; var x;`, or hoisting followed by the declaration
    /// itself) yields the first binding.
    pub fn declare(&mut self, name: &str, kind: SymbolKind, scope: ScopeId, span: Span) -> SymbolId {
        let key = (scope, name.to_string());
        if let Some(&existing) = self.bindings.get(&key) {
            return existing;
        }
        let id = self.symbols.alloc_with_id(|id| Symbol {
            id,
            name: name.to_string(),
            kind,
            scope,
            span,
        });
        self.bindings.insert(key, id);
        id
    }

    /// Innermost binding of `name` visible from `scope`; `None` for globals.
    pub fn lookup(&self, name: &str, scope: ScopeId, scopes: &ScopeTree) -> Option<SymbolId> {
        scopes
            .ancestors(scope)
            .find_map(|s| self.bindings.get(&(s, name.to_string())).copied())
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    #[cfg(test)]
    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().map(|(_, symbol)| symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.len() == 0
    }
}
