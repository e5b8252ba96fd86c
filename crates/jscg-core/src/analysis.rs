//! End-to-end call graph analysis
//!
//! Runs the phases in order: native seeding, intraprocedural flow, module
//! linking, interprocedural propagation and call graph extraction.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::callgraph::{CallGraph, CallGraphEdge, CallGraphError, extract};
use crate::config::AnalysisConfig;
use crate::flow::{
    CallbackStats, FlowContext, FlowGraph, LinkStats, ModuleDependency, ModuleLinks,
    ModuleRecord, PropagationStats, Propagator, Strategy, build_file, count_callbacks,
    link_modules, seed_natives,
};
use crate::parser::ParsedFile;
use crate::program::Program;
use crate::semantic::{ScopeTree, SymbolTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub strategy: Strategy,
    pub natives: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Demand,
            natives: true,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            strategy: config.strategy,
            natives: config.natives,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    pub natives: Duration,
    pub intraprocedural: Duration,
    pub linking: Duration,
    pub propagation: Duration,
    pub extraction: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.natives + self.intraprocedural + self.linking + self.propagation + self.extraction
    }

    /// `(phase, duration)` pairs in execution order.
    pub fn phases(&self) -> [(&'static str, Duration); 5] {
        [
            ("natives", self.natives),
            ("intraprocedural", self.intraprocedural),
            ("linking", self.linking),
            ("propagation", self.propagation),
            ("extraction", self.extraction),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisStats {
    pub files: usize,
    pub functions: usize,
    pub calls: usize,
    pub vertices: usize,
    /// Flow edges before propagation.
    pub intraprocedural_edges: usize,
    pub flow_edges: usize,
    pub natives_seeded: usize,
    pub links: LinkStats,
    pub callbacks: CallbackStats,
    pub propagation: PropagationStats,
    pub call_edges: usize,
    pub unresolved_calls: usize,
}

pub struct Analysis {
    pub program: Program,
    pub flow_graph: FlowGraph,
    pub scopes: ScopeTree,
    pub symbols: SymbolTable,
    pub call_graph: CallGraph,
    /// Resolved file-to-file imports and requires.
    pub dependencies: Vec<ModuleDependency>,
    pub stats: AnalysisStats,
    pub timings: PhaseTimings,
    /// Files that produced no syntax tree.
    pub parse_failures: Vec<String>,
}

impl Analysis {
    pub fn edges(&self) -> Result<Vec<CallGraphEdge>, CallGraphError> {
        self.call_graph.render(&self.program)
    }
}

pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    #[instrument(skip_all, fields(files = files.len(), strategy = %self.options.strategy))]
    pub fn analyze(&self, files: &[ParsedFile]) -> Analysis {
        let strategy = self.options.strategy.effective();
        let mut timings = PhaseTimings::default();
        let mut stats = AnalysisStats::default();
        let mut ctx = FlowContext::new();

        let start = Instant::now();
        if self.options.natives {
            stats.natives_seeded = seed_natives(&mut ctx.graph);
        }
        timings.natives = start.elapsed();

        let start = Instant::now();
        let (records, parse_failures) = build_flow(&mut ctx, files);
        timings.intraprocedural = start.elapsed();

        let start = Instant::now();
        let links = link(&mut ctx.graph, &records);
        stats.links = links.stats;
        timings.linking = start.elapsed();
        stats.intraprocedural_edges = ctx.graph.edge_count();

        let start = Instant::now();
        stats.propagation = propagate(&ctx.program, &mut ctx.graph);
        timings.propagation = start.elapsed();

        let start = Instant::now();
        let call_graph = extract_calls(&ctx.program, &ctx.graph);
        timings.extraction = start.elapsed();

        stats.files = ctx.program.files().len();
        stats.functions = ctx.program.function_count();
        stats.calls = ctx.program.call_count();
        stats.vertices = ctx.graph.vertex_count();
        stats.flow_edges = ctx.graph.edge_count();
        stats.call_edges = call_graph.edge_count();
        stats.unresolved_calls = call_graph.unresolved_calls().count();
        stats.callbacks = count_callbacks(&ctx.graph);

        info!(
            files = stats.files,
            functions = stats.functions,
            calls = stats.calls,
            call_edges = stats.call_edges,
            unresolved = stats.unresolved_calls,
            rounds = stats.propagation.rounds,
            strategy = %strategy,
            "call graph built"
        );

        let FlowContext {
            program,
            graph,
            scopes,
            symbols,
            ..
        } = ctx;

        Analysis {
            program,
            flow_graph: graph,
            scopes,
            symbols,
            call_graph,
            dependencies: links.dependencies,
            stats,
            timings,
            parse_failures,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalysisOptions::default())
    }
}

#[instrument(skip_all, name = "intraprocedural")]
fn build_flow(ctx: &mut FlowContext, files: &[ParsedFile]) -> (Vec<ModuleRecord>, Vec<String>) {
    let mut records = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for file in files {
        if let Some(error) = file.errors().first() {
            warn!(
                file = file.filename(),
                line = error.line,
                column = error.column,
                "{}",
                error.message
            );
        }
        match build_file(ctx, Path::new(file.filename()), file) {
            Some(record) => records.push(record),
            None => failures.push(file.filename().to_string()),
        }
    }

    (records, failures)
}

#[instrument(skip_all, name = "linking")]
fn link(graph: &mut FlowGraph, records: &[ModuleRecord]) -> ModuleLinks {
    link_modules(graph, records)
}

#[instrument(skip_all, name = "propagation")]
fn propagate(program: &Program, graph: &mut FlowGraph) -> PropagationStats {
    Propagator::new(program, graph).run()
}

#[instrument(skip_all, name = "extraction")]
fn extract_calls(program: &Program, graph: &FlowGraph) -> CallGraph {
    extract(program, graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callgraph::Callee;

    fn analyze(sources: &[(&str, &str)]) -> Analysis {
        let files: Vec<ParsedFile> = sources
            .iter()
            .map(|(name, code)| ParsedFile::from_source(name, code))
            .collect();
        Analyzer::default().analyze(&files)
    }

    fn targets(analysis: &Analysis) -> Vec<(String, String)> {
        analysis
            .edges()
            .unwrap()
            .into_iter()
            .map(|edge| (edge.source.label, edge.target.label))
            .collect()
    }

    #[test]
    fn resolves_direct_calls() {
        let analysis = analyze(&[("main.js", "function f() {}\nfunction main() { f(); }")]);

        assert_eq!(targets(&analysis), vec![("main".to_string(), "f".to_string())]);
        assert_eq!(analysis.stats.functions, 2);
        assert_eq!(analysis.stats.unresolved_calls, 0);
    }

    #[test]
    fn resolves_natives_only_when_seeded() {
        let files = vec![ParsedFile::from_source("m.js", "Math.log(1);")];

        let seeded = Analyzer::default().analyze(&files);
        let bare = Analyzer::new(AnalysisOptions {
            natives: false,
            ..AnalysisOptions::default()
        })
        .analyze(&files);

        let call = seeded.program.calls().next().map(|c| c.id).unwrap();
        assert_eq!(
            seeded.call_graph.callees(call),
            &[Callee::Native("Math_log"), Callee::Native("console_log")]
        );
        assert_eq!(bare.call_graph.edge_count(), 0);
        assert_eq!(bare.stats.natives_seeded, 0);
    }

    #[test]
    fn propagation_never_removes_edges() {
        let analysis = analyze(&[(
            "cb.js",
            "function apply(g) { return g(); }\napply(function cb() {});",
        )]);

        assert!(analysis.stats.flow_edges >= analysis.stats.intraprocedural_edges);
        assert!(analysis.stats.propagation.edges_added > 0);
        assert_eq!(
            analysis.stats.flow_edges,
            analysis.stats.intraprocedural_edges + analysis.stats.propagation.edges_added
        );
    }

    #[test]
    fn unparseable_files_are_reported() {
        let analysis = analyze(&[("ok.js", "f();"), ("bad.js", "function (")]);

        assert_eq!(analysis.stats.calls, 1);
        assert!(analysis.parse_failures.len() <= 1);
    }

    #[test]
    fn full_strategy_runs_demand() {
        let files = vec![ParsedFile::from_source(
            "a.js",
            "function g() { return h; }\nfunction h() {}\ng()();",
        )];
        let demand = Analyzer::default().analyze(&files);
        let full = Analyzer::new(AnalysisOptions {
            strategy: Strategy::Full,
            ..AnalysisOptions::default()
        })
        .analyze(&files);

        assert_eq!(targets(&demand), targets(&full));
    }

    #[test]
    fn records_dependencies_and_callbacks() {
        let analysis = analyze(&[
            ("/p/lib.js", "export function each(xs, f) { xs.forEach(f); }"),
            (
                "/p/main.js",
                "import { each } from './lib';
const util = require('./lib.js');
each([1], x => x);",
            ),
        ]);

        let path = |file| analysis.program.file(file).path.as_path();
        assert_eq!(analysis.dependencies.len(), 1);
        assert_eq!(path(analysis.dependencies[0].from), Path::new("/p/main.js"));
        assert_eq!(path(analysis.dependencies[0].to), Path::new("/p/lib.js"));
        assert_eq!(
            analysis.stats.callbacks,
            CallbackStats {
                callbacks: 1,
                calls: 1
            }
        );
    }

    #[test]
    fn options_follow_the_config() {
        let config = AnalysisConfig {
            strategy: Strategy::Full,
            natives: false,
        };

        let options = AnalysisOptions::from(&config);

        assert_eq!(options.strategy, Strategy::Full);
        assert!(!options.natives);
    }

    #[test]
    fn timings_cover_every_phase() {
        let analysis = analyze(&[("a.js", "f();")]);
        let phases = analysis.timings.phases();

        assert_eq!(phases.len(), 5);
        assert_eq!(phases[0].0, "natives");
        assert!(analysis.timings.total() >= phases[3].1);
    }
}
