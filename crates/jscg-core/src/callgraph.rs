//! Call graph extraction and rendering
//!
//! A call site `c` may invoke every `Func` or `Native` vertex from which
//! `Callee(c)` is reachable in the converged flow graph. Call sites that
//! resolve to nothing are kept and reported as unresolved; the analysis
//! is a may-analysis and such sites are expected.

use serde::Serialize;

use crate::flow::{FlowGraph, Vertex, VertexId, not_unknown, reachability};
use crate::program::{CallId, FunctionId, Location, Program};
use crate::semantic::SymbolTable;

/// Marker used in place of a file name for built-in targets.
pub const NATIVE_FILE: &str = "Native";

#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("unexpected vertex kind {kind} where a call site or function was expected")]
    UnexpectedVertex { kind: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callee {
    Function(FunctionId),
    Native(&'static str),
}

impl Callee {
    fn from_vertex(vertex: &Vertex) -> Option<Callee> {
        match vertex {
            Vertex::Func(func) => Some(Callee::Function(*func)),
            Vertex::Native(name) => Some(Callee::Native(*name)),
            _ => None,
        }
    }

    pub fn to_vertex(self) -> Vertex {
        match self {
            Callee::Function(func) => Vertex::Func(func),
            Callee::Native(name) => Vertex::Native(name),
        }
    }
}

/// Resolved targets for every call site of a program.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    /// Call sites in discovery order, each with its targets in flow graph
    /// vertex order.
    sites: Vec<(CallId, Vec<Callee>)>,
    edge_count: usize,
}

/// Resolves every call site of `program` against the converged `graph`.
pub fn extract(program: &Program, graph: &FlowGraph) -> CallGraph {
    let reach = reachability(graph, not_unknown);
    let mut sites: Vec<(CallId, Vec<Callee>)> =
        program.calls().map(|call| (call.id, Vec::new())).collect();

    let mut edge_count = 0;
    for source in graph.vertex_ids() {
        let Some(callee) = Callee::from_vertex(graph.vertex(source)) else {
            continue;
        };
        reach.iterate_reachable(source, |v| {
            if let Some(call) = graph.vertex(v).as_callee() {
                if let Some((_, targets)) = sites.get_mut(call.index()) {
                    targets.push(callee);
                    edge_count += 1;
                }
            }
        });
    }

    CallGraph { sites, edge_count }
}

impl CallGraph {
    /// Visits every `(call, callee)` pair exactly once.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(CallId, Callee),
    {
        for (call, targets) in &self.sites {
            for &callee in targets {
                visit(*call, callee);
            }
        }
    }

    pub fn edges(&self) -> impl Iterator<Item = (CallId, Callee)> + '_ {
        self.sites
            .iter()
            .flat_map(|(call, targets)| targets.iter().map(move |&callee| (*call, callee)))
    }

    pub fn callees(&self, call: CallId) -> &[Callee] {
        self.sites
            .get(call.index())
            .map(|(_, targets)| targets.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_resolved(&self, call: CallId) -> bool {
        !self.callees(call).is_empty()
    }

    pub fn unresolved_calls(&self) -> impl Iterator<Item = CallId> + '_ {
        self.sites
            .iter()
            .filter(|(_, targets)| targets.is_empty())
            .map(|(call, _)| *call)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn call_count(&self) -> usize {
        self.sites.len()
    }

    /// Rendered edges, in [`CallGraph::for_each`] order.
    pub fn render(&self, program: &Program) -> Result<Vec<CallGraphEdge>, CallGraphError> {
        self.edges()
            .map(|(call, callee)| CallGraphEdge::new(program, call, callee))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

/// One side of a rendered call graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub label: String,
    pub file: String,
    pub start: Point,
    pub end: Point,
    pub range: ByteRange,
}

impl Endpoint {
    fn located(label: String, file: String, location: &Location) -> Self {
        Self {
            label,
            file,
            start: Point {
                row: Some(location.start.line),
                column: Some(location.start.column),
            },
            end: Point {
                row: Some(location.end.line),
                column: Some(location.end.column),
            },
            range: ByteRange {
                start: Some(location.range.start),
                end: Some(location.range.end),
            },
        }
    }

    /// The call site side: labelled with its enclosing function.
    fn call_site(program: &Program, call: CallId) -> Self {
        let site = program.call(call);
        let label = match site.enclosing {
            Some(func) => program.function_label(func).to_string(),
            None => "global".to_string(),
        };
        let file = program.file(site.file).path.to_string_lossy().to_string();
        Self::located(label, file, &site.location)
    }

    fn callee(program: &Program, callee: Callee) -> Self {
        match callee {
            Callee::Function(func) => {
                let function = program.function(func);
                let file = program.file(function.file).path.to_string_lossy().to_string();
                Self::located(
                    program.function_label(func).to_string(),
                    file,
                    &function.location,
                )
            }
            Callee::Native(name) => Self {
                label: name.to_string(),
                file: NATIVE_FILE.to_string(),
                start: Point {
                    row: None,
                    column: None,
                },
                end: Point {
                    row: None,
                    column: None,
                },
                range: ByteRange {
                    start: None,
                    end: None,
                },
            },
        }
    }

    /// Renders a `Callee`, `Func` or `Native` vertex. Any other kind is an
    /// internal error.
    pub fn from_vertex(program: &Program, vertex: &Vertex) -> Result<Self, CallGraphError> {
        if let Some(call) = vertex.as_callee() {
            return Ok(Self::call_site(program, call));
        }
        match Callee::from_vertex(vertex) {
            Some(callee) => Ok(Self::callee(program, callee)),
            None => Err(CallGraphError::UnexpectedVertex {
                kind: vertex.kind().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallGraphEdge {
    pub source: Endpoint,
    pub target: Endpoint,
}

impl CallGraphEdge {
    pub fn new(program: &Program, call: CallId, callee: Callee) -> Result<Self, CallGraphError> {
        Ok(Self {
            source: Endpoint::from_vertex(program, &Vertex::Callee(call))?,
            target: Endpoint::from_vertex(program, &callee.to_vertex())?,
        })
    }
}

/// `'label' (file@line:start-end)`, or `'name' (Native)` for built-ins.
pub fn pretty_vertex(program: &Program, vertex: &Vertex) -> Result<String, CallGraphError> {
    match vertex {
        Vertex::Callee(call) => {
            let site = program.call(*call);
            let label = match site.enclosing {
                Some(func) => program.function_label(func),
                None => "global",
            };
            Ok(format!(
                "'{}' ({})",
                label,
                program.pretty_position(site.file, &site.location)
            ))
        }
        Vertex::Func(func) => {
            let function = program.function(*func);
            Ok(format!(
                "'{}' ({})",
                program.function_label(*func),
                program.pretty_position(function.file, &function.location)
            ))
        }
        Vertex::Native(name) => Ok(format!("'{}' ({})", name, NATIVE_FILE)),
        other => Err(CallGraphError::UnexpectedVertex {
            kind: other.kind().to_string(),
        }),
    }
}

/// Flow graph edge rendered as `source => target`.
pub fn pretty_flow_edge(
    graph: &FlowGraph,
    program: &Program,
    symbols: &SymbolTable,
    source: VertexId,
    target: VertexId,
) -> String {
    format!(
        "{} => {}",
        graph.describe(source, program, symbols),
        graph.describe(target, program, symbols)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{CallKind, Position};

    fn location(line: usize, start: u32, end: u32) -> Location {
        Location {
            start: Position {
                line,
                column: start as usize,
            },
            end: Position {
                line,
                column: end as usize,
            },
            range: start..end,
        }
    }

    struct Fixture {
        program: Program,
        graph: FlowGraph,
        f: FunctionId,
        call: CallId,
        other: CallId,
    }

    fn fixture() -> Fixture {
        let mut program = Program::new();
        let file = program.add_file("/src/app.js");
        let f = program.add_function(Some("f".into()), 0, file, location(1, 0, 15), None, false);
        let call = program.add_call(CallKind::Call, 0, Some(f), file, location(2, 20, 23));
        let other = program.add_call(CallKind::Call, 1, None, file, location(3, 30, 40));

        let mut graph = FlowGraph::new();
        graph.connect(Vertex::Func(f), Vertex::prop("f"));
        graph.connect(Vertex::prop("f"), Vertex::Callee(call));
        graph.connect(Vertex::Native("Math_log"), Vertex::prop("log"));
        graph.connect(Vertex::prop("log"), Vertex::Callee(call));
        graph.connect(Vertex::Unknown, Vertex::Callee(other));

        Fixture {
            program,
            graph,
            f,
            call,
            other,
        }
    }

    #[test]
    fn extracts_functions_and_natives() {
        let fx = fixture();
        let cg = extract(&fx.program, &fx.graph);

        assert_eq!(
            cg.callees(fx.call),
            &[Callee::Function(fx.f), Callee::Native("Math_log")]
        );
        assert_eq!(cg.edge_count(), 2);
        assert!(cg.is_resolved(fx.call));
    }

    #[test]
    fn unresolved_calls_are_reported_not_failed() {
        let fx = fixture();
        let cg = extract(&fx.program, &fx.graph);

        assert!(!cg.is_resolved(fx.other));
        assert_eq!(cg.unresolved_calls().collect::<Vec<_>>(), vec![fx.other]);
        assert_eq!(cg.call_count(), 2);
    }

    #[test]
    fn for_each_visits_every_pair_once() {
        let fx = fixture();
        let cg = extract(&fx.program, &fx.graph);

        let mut seen = Vec::new();
        cg.for_each(|call, callee| seen.push((call, callee)));

        assert_eq!(seen.len(), cg.edge_count());
        assert_eq!(seen, cg.edges().collect::<Vec<_>>());
    }

    #[test]
    fn extraction_is_idempotent() {
        let fx = fixture();
        let first: Vec<_> = extract(&fx.program, &fx.graph).edges().collect();
        let second: Vec<_> = extract(&fx.program, &fx.graph).edges().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn natives_render_without_positions() {
        let fx = fixture();
        let edge = CallGraphEdge::new(&fx.program, fx.call, Callee::Native("Math_log")).unwrap();

        assert_eq!(edge.source.label, "f");
        assert_eq!(edge.source.file, "/src/app.js");
        assert_eq!(edge.source.start.row, Some(2));
        assert_eq!(edge.target.file, NATIVE_FILE);
        assert_eq!(edge.target.range.start, None);

        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["target"]["start"]["row"], serde_json::Value::Null);
        assert_eq!(json["source"]["range"]["end"], 23);
    }

    #[test]
    fn pretty_vertices_use_compact_positions() {
        let fx = fixture();
        let pretty = |vertex: Vertex| pretty_vertex(&fx.program, &vertex).unwrap();

        assert_eq!(pretty(Vertex::Callee(fx.call)), "'f' (app.js@2:20-23)");
        assert_eq!(pretty(Vertex::Func(fx.f)), "'f' (app.js@1:0-15)");
        assert_eq!(pretty(Vertex::Callee(fx.other)), "'global' (app.js@3:30-40)");
        assert_eq!(pretty(Vertex::Native("Math_log")), "'Math_log' (Native)");
    }

    #[test]
    fn rendered_edges_follow_extraction_order() {
        let fx = fixture();
        let cg = extract(&fx.program, &fx.graph);

        let edges = cg.render(&fx.program).unwrap();

        let targets: Vec<&str> = edges.iter().map(|e| e.target.label.as_str()).collect();
        assert_eq!(targets, vec!["f", "Math_log"]);
        assert!(edges.iter().all(|e| e.source.label == "f"));
    }

    #[test]
    fn rendering_rejects_other_vertex_kinds() {
        let fx = fixture();

        let err = Endpoint::from_vertex(&fx.program, &Vertex::prop("f")).unwrap_err();
        assert!(err.to_string().contains("PropVertex"));
        assert!(Endpoint::from_vertex(&fx.program, &Vertex::Callee(fx.call)).is_ok());
        assert!(pretty_vertex(&fx.program, &Vertex::Unknown).is_err());
    }
}
