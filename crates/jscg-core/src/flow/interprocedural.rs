//! Demand-driven interprocedural propagation
//!
//! Argument-to-parameter and return-to-result edges are only added where
//! the receiving vertex is `interesting`, i.e. where a value reaching it
//! may end up being invoked. Rounds repeat until one adds no edge.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use super::graph::{FlowGraph, VertexId};
use super::reachability::{ReachabilityIndex, not_unknown, reachability};
use super::vertex::Vertex;
use crate::program::{CallId, Program};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Demand,
    Full,
}

impl Strategy {
    /// The strategy that actually runs. Exhaustive propagation is not
    /// available, so `Full` degrades to `Demand`.
    pub fn effective(self) -> Strategy {
        match self {
            Strategy::Demand => Strategy::Demand,
            Strategy::Full => {
                warn!("strategy FULL not implemented yet; using DEMAND instead");
                Strategy::Demand
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Demand => "demand",
            Strategy::Full => "full",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demand" => Ok(Strategy::Demand),
            "full" => Ok(Strategy::Full),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub edges_added: usize,
    pub newly_interesting: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    pub rounds: usize,
    pub edges_added: usize,
    pub interesting: usize,
}

pub struct Propagator<'a> {
    program: &'a Program,
    graph: &'a mut FlowGraph,
}

impl<'a> Propagator<'a> {
    pub fn new(program: &'a Program, graph: &'a mut FlowGraph) -> Self {
        Self { program, graph }
    }

    /// Runs rounds until one of them adds no edge.
    pub fn run(&mut self) -> PropagationStats {
        let mut stats = PropagationStats::default();
        loop {
            let outcome = self.run_round();
            stats.rounds += 1;
            stats.edges_added += outcome.edges_added;
            debug!(
                round = stats.rounds,
                edges_added = outcome.edges_added,
                newly_interesting = outcome.newly_interesting,
                "propagation round"
            );
            if outcome.edges_added == 0 {
                break;
            }
        }
        stats.interesting = self.graph.interesting_count();
        stats
    }

    pub fn run_round(&mut self) -> RoundOutcome {
        let program = self.program;
        let reach = reachability(self.graph, not_unknown);
        let mut outcome = RoundOutcome::default();

        for call in program.calls() {
            if let Some(res) = self.graph.lookup(&Vertex::Res(call.id)) {
                outcome.newly_interesting += self.mark_if_reaches_callee(&reach, res);
            }
        }

        for function in program.functions() {
            let func = function.id;
            let nparams = function.param_count;

            let mut any_interesting = false;
            for i in 0..=nparams {
                if let Some(param) = self.graph.lookup(&Vertex::Param(func, i)) {
                    outcome.newly_interesting += self.mark_if_reaches_callee(&reach, param);
                    any_interesting |= self.graph.is_interesting(param);
                }
            }

            let Some(func_vertex) = self.graph.lookup(&Vertex::Func(func)) else {
                continue;
            };

            for call in self.reachable_calls(&reach, func_vertex) {
                if let Some(res) = self.graph.lookup(&Vertex::Res(call)) {
                    if self.graph.is_interesting(res) {
                        let ret = self.graph.intern(Vertex::Ret(func));
                        if self.graph.add_edge(ret, res) {
                            outcome.edges_added += 1;
                        }
                    }
                }

                if !any_interesting {
                    continue;
                }

                let arg_count = program.call(call).arg_count;
                for i in 0..=nparams {
                    if i > arg_count {
                        break;
                    }
                    let Some(param) = self.graph.lookup(&Vertex::Param(func, i)) else {
                        continue;
                    };
                    if self.graph.is_interesting(param) {
                        let arg = self.graph.intern(Vertex::Arg(call, i));
                        if self.graph.add_edge(arg, param) {
                            outcome.edges_added += 1;
                        }
                    }
                }
            }
        }

        outcome
    }

    fn mark_if_reaches_callee(&mut self, reach: &ReachabilityIndex, vertex: VertexId) -> usize {
        if self.graph.is_interesting(vertex) {
            return 0;
        }
        let graph = &*self.graph;
        let reaches_callee = reach.any_reachable(vertex, |v| graph.vertex(v).as_callee().is_some());
        if reaches_callee && self.graph.mark_interesting(vertex) {
            1
        } else {
            0
        }
    }

    fn reachable_calls(&self, reach: &ReachabilityIndex, from: VertexId) -> Vec<CallId> {
        let mut calls = Vec::new();
        reach.iterate_reachable(from, |v| {
            if let Some(call) = self.graph.vertex(v).as_callee() {
                calls.push(call);
            }
        });
        calls.sort_by_key(|call| call.index());
        calls
    }
}
