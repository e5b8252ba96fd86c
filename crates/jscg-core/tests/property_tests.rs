//! Invariants of propagation, reachability and extraction

use std::collections::HashSet;
use std::path::Path;

use jscg_core::callgraph::extract;
use jscg_core::flow::{
    FlowContext, FlowGraph, Propagator, ReachabilityIndex, Vertex, VertexId, build_file,
    not_unknown, reachability, seed_natives,
};
use jscg_core::parser::ParsedFile;
use jscg_core::program::{CallKind, Location, Position, Program};

const SAMPLE: &str = r#"
function compose(f, g) {
  return function composed(x) { return f(g(x)); };
}
function inc(n) { return n + 1; }
function twice(n) { return n * 2; }
const pipeline = compose(inc, twice);
pipeline(3);

const registry = {
  handlers: [],
  register(handler) { this.handlers.push(handler); return handler; },
};
registry.register(function onEvent(e) { return Math.max(e, 0); })(1);

function memo(fn) {
  const cache = {};
  return function (key) {
    return cache[key] || (cache[key] = fn(key));
  };
}
memo(twice)(4);
"#;

fn build(source: &str) -> FlowContext {
    let parsed = ParsedFile::from_source("sample.js", source);
    let mut ctx = FlowContext::new();
    seed_natives(&mut ctx.graph);
    build_file(&mut ctx, Path::new("sample.js"), &parsed).expect("sample parses");
    ctx
}

fn reached(reach: &ReachabilityIndex, from: VertexId) -> Vec<VertexId> {
    let mut out = Vec::new();
    reach.iterate_reachable(from, |v| out.push(v));
    out
}

fn edge_set(graph: &FlowGraph) -> HashSet<(Vertex, Vertex)> {
    graph
        .edges()
        .map(|(s, t)| (graph.vertex(s).clone(), graph.vertex(t).clone()))
        .collect()
}

fn location(start: u32, end: u32) -> Location {
    Location {
        start: Position {
            line: 1,
            column: start as usize,
        },
        end: Position {
            line: 1,
            column: end as usize,
        },
        range: start..end,
    }
}

#[test]
fn rounds_never_shrink_the_graph() {
    let mut ctx = build(SAMPLE);
    let mut edges = ctx.graph.edge_count();
    let mut interesting = ctx.graph.interesting_count();
    let bound = ctx.graph.vertex_count() * ctx.graph.vertex_count() + 1;

    let mut rounds = 0;
    loop {
        let outcome = Propagator::new(&ctx.program, &mut ctx.graph).run_round();
        rounds += 1;

        assert!(ctx.graph.edge_count() >= edges);
        assert!(ctx.graph.interesting_count() >= interesting);
        assert_eq!(ctx.graph.edge_count(), edges + outcome.edges_added);
        edges = ctx.graph.edge_count();
        interesting = ctx.graph.interesting_count();

        if outcome.edges_added == 0 {
            break;
        }
        assert!(rounds <= bound, "propagation did not converge");
    }
    assert!(rounds > 1);
}

#[test]
fn intraprocedural_edges_survive_propagation() {
    let mut ctx = build(SAMPLE);
    let before = edge_set(&ctx.graph);

    let stats = Propagator::new(&ctx.program, &mut ctx.graph).run();
    let after = edge_set(&ctx.graph);

    assert!(before.is_subset(&after));
    assert_eq!(after.len(), before.len() + stats.edges_added);
}

#[test]
fn unknown_absorbs_flow() {
    let mut program = Program::new();
    let file = program.add_file("sink.js");
    let func = program.add_function(Some("f".into()), 0, file, location(0, 10), None, false);
    let call = program.add_call(CallKind::Call, 0, None, file, location(11, 14));

    let mut graph = FlowGraph::new();
    let f = graph.intern(Vertex::Func(func));
    let sink = graph.unknown();
    let callee = graph.intern(Vertex::Callee(call));
    graph.add_edge(f, sink);
    graph.add_edge(sink, callee);

    let reach = reachability(&graph, not_unknown);
    let reachable = reached(&reach, f);

    assert!(!reachable.contains(&callee));
    assert!(extract(&program, &graph).callees(call).is_empty());
}

#[test]
fn reachability_is_deterministic() {
    let mut ctx = build(SAMPLE);
    Propagator::new(&ctx.program, &mut ctx.graph).run();
    let reach = reachability(&ctx.graph, not_unknown);

    for id in ctx.graph.vertex_ids() {
        let first: HashSet<_> = reached(&reach, id).into_iter().collect();
        let second: HashSet<_> = reached(&reach, id).into_iter().collect();
        assert_eq!(first, second);
    }
}

#[test]
fn extraction_is_idempotent() {
    let mut ctx = build(SAMPLE);
    Propagator::new(&ctx.program, &mut ctx.graph).run();

    let first: HashSet<_> = extract(&ctx.program, &ctx.graph).edges().collect();
    let second: HashSet<_> = extract(&ctx.program, &ctx.graph).edges().collect();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn higher_order_results_resolve() {
    let mut ctx = build(SAMPLE);
    Propagator::new(&ctx.program, &mut ctx.graph).run();
    let call_graph = extract(&ctx.program, &ctx.graph);

    let targets: HashSet<String> = call_graph
        .edges()
        .filter_map(|(_, callee)| match callee {
            jscg_core::Callee::Function(f) => ctx.program.function(f).name.clone(),
            jscg_core::Callee::Native(name) => Some(name.to_string()),
        })
        .collect();

    for expected in ["compose", "composed", "inc", "twice", "register", "onEvent", "memo"] {
        assert!(targets.contains(expected), "missing callee {}", expected);
    }
    assert!(targets.contains("Math_max"));
    assert!(targets.contains("Array_prototype_push"));
}
