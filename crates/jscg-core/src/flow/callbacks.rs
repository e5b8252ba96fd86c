//! Callback argument census
//!
//! A callback is a function literal written directly in an argument
//! position, e.g. `items.forEach(x => use(x))`. Only such an argument gets a
//! `Func -> Arg(c, i)` edge from the builder, and propagation never adds
//! edges into `Arg` vertices, so the census reads those edges off the graph.

use std::collections::HashSet;

use super::graph::FlowGraph;
use super::vertex::Vertex;
use crate::program::CallId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallbackStats {
    /// Arguments that are function literals. The receiver slot never counts.
    pub callbacks: usize,
    /// Call sites passing at least one such argument.
    pub calls: usize,
}

pub fn count_callbacks(graph: &FlowGraph) -> CallbackStats {
    let mut slots: HashSet<(CallId, usize)> = HashSet::new();
    for (source, target) in graph.edges() {
        if let (Vertex::Func(_), Vertex::Arg(call, slot)) = (graph.vertex(source), graph.vertex(target))
        {
            if *slot > 0 {
                slots.insert((*call, *slot));
            }
        }
    }

    let calls: HashSet<CallId> = slots.iter().map(|(call, _)| *call).collect();
    CallbackStats {
        callbacks: slots.len(),
        calls: calls.len(),
    }
}
