//! Reachability over a flow graph snapshot
//!
//! The graph is condensed into strongly connected components first, so
//! queries walk the (acyclic) condensation instead of the raw graph.
//! Vertices rejected by the traversal predicate are still reachable but
//! contribute no out-edges.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::graph::{FlowGraph, VertexId};
use super::vertex::Vertex;

/// Traversal predicate used by propagation and extraction.
pub fn not_unknown(vertex: &Vertex) -> bool {
    !vertex.is_unknown()
}

const UNVISITED: u32 = u32::MAX;

fn out_edges<'g>(graph: &'g FlowGraph, follows: &[bool], v: usize) -> &'g [VertexId] {
    if follows[v] {
        graph.successors(VertexId::from_index(v))
    } else {
        &[]
    }
}

#[derive(Debug)]
pub struct ReachabilityIndex {
    component: Vec<usize>,
    members: Vec<Vec<VertexId>>,
    successors: Vec<Vec<usize>>,
    memo: RefCell<HashMap<usize, Rc<Vec<usize>>>>,
}

/// Builds a reachability index for the current state of `graph`.
pub fn reachability<P>(graph: &FlowGraph, predicate: P) -> ReachabilityIndex
where
    P: Fn(&Vertex) -> bool,
{
    let n = graph.vertex_count();
    let follows: Vec<bool> = graph
        .vertex_ids()
        .map(|id| predicate(graph.vertex(id)))
        .collect();
    let edges_of = |v: usize| out_edges(graph, &follows, v);

    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut component = vec![usize::MAX; n];
    let mut members: Vec<Vec<VertexId>> = Vec::new();
    let mut counter = 0u32;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        index[root] = counter;
        lowlink[root] = counter;
        counter += 1;
        stack.push(root);
        on_stack[root] = true;
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(&(v, pos)) = frames.last() {
            let succ = edges_of(v);
            if pos < succ.len() {
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }
                let w = succ[pos].index();
                if index[w] == UNVISITED {
                    index[w] = counter;
                    lowlink[w] = counter;
                    counter += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    frames.push((w, 0));
                } else if on_stack[w] {
                    lowlink[v] = lowlink[v].min(index[w]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[v]);
            }

            if lowlink[v] == index[v] {
                let id = members.len();
                let mut scc = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component[w] = id;
                    scc.push(VertexId::from_index(w));
                    if w == v {
                        break;
                    }
                }
                members.push(scc);
            }
        }
    }

    let mut successors = vec![Vec::new(); members.len()];
    for v in 0..n {
        let from = component[v];
        for w in edges_of(v) {
            let to = component[w.index()];
            if to != from {
                successors[from].push(to);
            }
        }
    }
    for list in &mut successors {
        list.sort_unstable();
        list.dedup();
    }

    ReachabilityIndex {
        component,
        members,
        successors,
        memo: RefCell::new(HashMap::new()),
    }
}

impl ReachabilityIndex {
    #[cfg(test)]
    pub fn component_count(&self) -> usize {
        self.members.len()
    }

    /// Whether two vertices belong to the same strongly connected component.
    #[cfg(test)]
    pub fn same_component(&self, a: VertexId, b: VertexId) -> bool {
        match (self.component.get(a.index()), self.component.get(b.index())) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        }
    }

    /// Calls `visit` once for every vertex reachable from `from` through zero
    /// or more edges, `from` included.
    pub fn iterate_reachable<F>(&self, from: VertexId, mut visit: F)
    where
        F: FnMut(VertexId),
    {
        let Some(&start) = self.component.get(from.index()) else {
            // interned after the snapshot was taken
            visit(from);
            return;
        };

        for comp in self.reachable_components(start).iter() {
            for &vertex in &self.members[*comp] {
                visit(vertex);
            }
        }
    }

    #[cfg(test)]
    pub fn reachable(&self, from: VertexId) -> Vec<VertexId> {
        let mut out = Vec::new();
        self.iterate_reachable(from, |v| out.push(v));
        out.sort_unstable();
        out
    }

    pub fn any_reachable<F>(&self, from: VertexId, mut pred: F) -> bool
    where
        F: FnMut(VertexId) -> bool,
    {
        let mut found = false;
        self.iterate_reachable(from, |v| {
            if !found && pred(v) {
                found = true;
            }
        });
        found
    }

    fn reachable_components(&self, start: usize) -> Rc<Vec<usize>> {
        if let Some(hit) = self.memo.borrow().get(&start) {
            return Rc::clone(hit);
        }

        let mut seen: HashSet<usize> = HashSet::new();
        seen.insert(start);
        let mut work = vec![start];

        while let Some(comp) = work.pop() {
            if comp != start {
                let cached = self.memo.borrow().get(&comp).cloned();
                if let Some(closed) = cached {
                    seen.extend(closed.iter().copied());
                    continue;
                }
            }
            for &next in &self.successors[comp] {
                if seen.insert(next) {
                    work.push(next);
                }
            }
        }

        let mut result: Vec<usize> = seen.into_iter().collect();
        result.sort_unstable();
        let result = Rc::new(result);
        self.memo.borrow_mut().insert(start, Rc::clone(&result));
        result
    }
}
