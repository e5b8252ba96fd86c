//! Flow graph over interned vertices
//!
//! Vertices live in a single growable store and are referred to by
//! [`VertexId`] handles. An edge `a -> b` means "a value may flow from `a`
//! to `b`". Edges and `interesting` flags only ever grow.

use std::collections::{HashMap, HashSet};

use super::vertex::Vertex;
use crate::program::Program;
use crate::semantic::SymbolTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
    pub(crate) fn from_index(index: usize) -> Self {
        VertexId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct VertexData {
    vertex: Vertex,
    interesting: bool,
    successors: Vec<VertexId>,
}

#[derive(Debug, Default)]
pub struct FlowGraph {
    vertices: Vec<VertexData>,
    index: HashMap<Vertex, VertexId>,
    edges: HashSet<(VertexId, VertexId)>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `vertex`, allocating it on first use.
    pub fn intern(&mut self, vertex: Vertex) -> VertexId {
        if let Some(&id) = self.index.get(&vertex) {
            return id;
        }
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(VertexData {
            vertex: vertex.clone(),
            interesting: false,
            successors: Vec::new(),
        });
        self.index.insert(vertex, id);
        id
    }

    pub fn lookup(&self, vertex: &Vertex) -> Option<VertexId> {
        self.index.get(vertex).copied()
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()].vertex
    }

    pub fn unknown(&mut self) -> VertexId {
        self.intern(Vertex::Unknown)
    }

    /// Records `source -> target` if absent. Returns whether the edge is new.
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> bool {
        if source == target || !self.edges.insert((source, target)) {
            return false;
        }
        self.vertices[source.index()].successors.push(target);
        true
    }

    /// Interns both endpoints and records the edge between them.
    pub fn connect(&mut self, source: Vertex, target: Vertex) -> bool {
        let source = self.intern(source);
        let target = self.intern(target);
        self.add_edge(source, target)
    }

    pub fn has_edge(&self, source: VertexId, target: VertexId) -> bool {
        self.edges.contains(&(source, target))
    }

    pub fn contains_edge(&self, source: &Vertex, target: &Vertex) -> bool {
        match (self.lookup(source), self.lookup(target)) {
            (Some(source), Some(target)) => self.has_edge(source, target),
            _ => false,
        }
    }

    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        &self.vertices[id.index()].successors
    }

    /// All edges, grouped by source in vertex allocation order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices.iter().enumerate().flat_map(|(index, data)| {
            let source = VertexId(index as u32);
            data.successors.iter().map(move |&target| (source, target))
        })
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len() as u32).map(VertexId)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_interesting(&self, id: VertexId) -> bool {
        self.vertices[id.index()].interesting
    }

    /// Sets the `interesting` flag. Returns whether it was previously unset.
    pub fn mark_interesting(&mut self, id: VertexId) -> bool {
        let data = &mut self.vertices[id.index()];
        let changed = !data.interesting;
        data.interesting = true;
        changed
    }

    pub fn interesting_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.interesting).count()
    }

    /// Human-readable rendering of a vertex for flow graph dumps.
    pub fn describe(&self, id: VertexId, program: &Program, symbols: &SymbolTable) -> String {
        let call_pos = |call| {
            let site = program.call(call);
            program.pretty_position(site.file, &site.location)
        };
        let func_pos = |func| {
            let function = program.function(func);
            format!(
                "{} {}",
                program.function_label(func),
                program.pretty_position(function.file, &function.location)
            )
        };

        match self.vertex(id) {
            Vertex::Func(func) => format!("Func({})", func_pos(*func)),
            Vertex::Callee(call) => format!("Callee({})", call_pos(*call)),
            Vertex::Native(name) => format!("Native({})", name),
            Vertex::Param(func, index) => format!("Param({}, {})", func_pos(*func), index),
            Vertex::Arg(call, index) => format!("Arg({}, {})", call_pos(*call), index),
            Vertex::Ret(func) => format!("Ret({})", func_pos(*func)),
            Vertex::Res(call) => format!("Res({})", call_pos(*call)),
            Vertex::Unknown => "Unknown".to_string(),
            Vertex::Var(symbol) => {
                format!("Var({}#{})", symbols.get(*symbol).name, symbol.index())
            }
            Vertex::Prop(name) => format!("Prop({})", name),
            Vertex::Expr(key) => format!(
                "Expr({}@{}-{})",
                program.file(key.file).display_name(),
                key.start,
                key.end
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::vertex::VertexKind;

    #[test]
    fn interning_returns_stable_handles() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::prop("a"));
        let b = graph.intern(Vertex::prop("b"));

        assert_ne!(a, b);
        assert_eq!(graph.intern(Vertex::prop("a")), a);
        assert_eq!(graph.lookup(&Vertex::prop("b")), Some(b));
        assert_eq!(graph.lookup(&Vertex::prop("c")), None);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::prop("a"));
        let b = graph.intern(Vertex::prop("b"));

        assert!(graph.add_edge(a, b));
        assert!(!graph.add_edge(a, b));
        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.successors(a), &[b]);
    }

    #[test]
    fn self_edges_are_ignored() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::prop("a"));

        assert!(!graph.add_edge(a, a));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn cycles_are_allowed() {
        let mut graph = FlowGraph::new();
        assert!(graph.connect(Vertex::prop("a"), Vertex::prop("b")));
        assert!(graph.connect(Vertex::prop("b"), Vertex::prop("a")));

        assert!(graph.contains_edge(&Vertex::prop("a"), &Vertex::prop("b")));
        assert!(graph.contains_edge(&Vertex::prop("b"), &Vertex::prop("a")));
        assert_eq!(graph.edges().count(), 2);
    }

    #[test]
    fn interesting_flag_only_goes_up() {
        let mut graph = FlowGraph::new();
        let a = graph.intern(Vertex::prop("a"));

        assert!(!graph.is_interesting(a));
        assert!(graph.mark_interesting(a));
        assert!(!graph.mark_interesting(a));
        assert!(graph.is_interesting(a));
        assert_eq!(graph.interesting_count(), 1);
    }

    #[test]
    fn unknown_is_a_singleton() {
        let mut graph = FlowGraph::new();
        let first = graph.unknown();
        let second = graph.unknown();

        assert_eq!(first, second);
        assert_eq!(graph.vertex(first).kind(), VertexKind::Unknown);
    }
}
