//! Lexical scopes
//!
//! One tree spans the whole program: the global scope is the root, each file
//! gets a module scope below it, and function, block and class scopes nest
//! from there.

use id_arena::{Arena, Id};
use swc_common::{DUMMY_SP, Span};

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    ArrowFunction,
    Block,
    For,
    Catch,
    Class,
}

impl ScopeKind {
    /// Scopes that receive hoisted `var` declarations.
    pub fn hoists_vars(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Module | ScopeKind::Function | ScopeKind::ArrowFunction
        )
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub span: Span,
}

#[derive(Debug)]
pub struct ScopeTree {
    scopes: Arena<Scope>,
    global: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// A tree holding only the global scope.
    pub fn new() -> Self {
        let mut scopes = Arena::new();
        let global = scopes.alloc_with_id(|id| Scope {
            id,
            kind: ScopeKind::Global,
            parent: None,
            span: DUMMY_SP,
        });
        Self { scopes, global }
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn create_scope(&mut self, kind: ScopeKind, parent: ScopeId, span: Span) -> ScopeId {
        self.scopes.alloc_with_id(|id| Scope {
            id,
            kind,
            parent: Some(parent),
            span,
        })
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id].parent
    }

    /// `id` followed by each enclosing scope up to the global one.
    pub fn ancestors(&self, id: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(id), move |&scope| self.parent(scope))
    }

    /// Nearest scope, `id` included, that `var` declarations hoist to.
    pub fn var_scope(&self, id: ScopeId) -> ScopeId {
        self.ancestors(id)
            .find(|&scope| self.scopes[scope].kind.hoists_vars())
            .unwrap_or(self.global)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.len() == 0
    }
}
