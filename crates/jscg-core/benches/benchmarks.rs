use std::hint::black_box;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jscg_core::callgraph::extract;
use jscg_core::flow::{FlowContext, Propagator, build_file, seed_natives};
use jscg_core::parser::ParsedFile;
use jscg_core::{Analyzer, Strategy};

/// A module of higher-order helpers; each round of `i` adds callbacks that
/// only resolve through interprocedural flow.
fn generate_callback_module(count: usize) -> String {
    let mut code = String::with_capacity(count * 400);
    code.push_str("// Generated callback-heavy module for benchmarking\n\n");

    for i in 0..count {
        code.push_str(&format!(
            r#"function map{i}(items, fn) {{
    const out = [];
    items.forEach(function (item) {{ out.push(fn(item)); }});
    return out;
}}

function compose{i}(f, g) {{
    return function (x) {{ return f(g(x)); }};
}}

function step{i}(x) {{
    return x + {i};
}}

const handlers{i} = {{
    run(value) {{ return compose{i}(step{i}, Math.abs)(value); }},
}};

map{i}([1, 2, 3], handlers{i}.run);
compose{i}(step{i}, step{i})({i});

"#,
            i = i
        ));
    }

    code
}

fn generate_project(files: usize) -> Vec<(String, String)> {
    (0..files)
        .map(|i| {
            let filename = format!("/project/src/module_{}.js", i);
            let import = if i == 0 {
                String::new()
            } else {
                format!("import {{ apply{prev} }} from './module_{prev}.js';\n", prev = i - 1)
            };
            let call = if i == 0 {
                String::new()
            } else {
                format!("apply{prev}(handler{i});\n", prev = i - 1, i = i)
            };
            let content = format!(
                r#"{import}
export function apply{i}(callback) {{
    return callback({i});
}}

function handler{i}(value) {{
    return value * 2;
}}

{call}apply{i}(handler{i});
"#,
                import = import,
                call = call,
                i = i
            );
            (filename, content)
        })
        .collect()
}

fn parse_all(files: &[(String, String)]) -> Vec<ParsedFile> {
    files
        .iter()
        .map(|(name, content)| ParsedFile::from_source(name, content))
        .collect()
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let code = generate_callback_module(25);
    group.throughput(Throughput::Elements(code.lines().count() as u64));
    group.bench_function("parse_callback_module", |b| {
        b.iter(|| ParsedFile::from_source(black_box("module.js"), black_box(&code)))
    });

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");

    let code = generate_callback_module(25);
    let parsed = ParsedFile::from_source("module.js", &code);

    group.bench_function("intraprocedural", |b| {
        b.iter(|| {
            let mut ctx = FlowContext::new();
            seed_natives(&mut ctx.graph);
            build_file(&mut ctx, Path::new("module.js"), black_box(&parsed));
            ctx
        })
    });

    let mut base = FlowContext::new();
    seed_natives(&mut base.graph);
    build_file(&mut base, Path::new("module.js"), &parsed);

    group.bench_function("propagation", |b| {
        b.iter_batched(
            || {
                let mut ctx = FlowContext::new();
                seed_natives(&mut ctx.graph);
                build_file(&mut ctx, Path::new("module.js"), &parsed);
                ctx
            },
            |mut ctx| Propagator::new(&ctx.program, &mut ctx.graph).run(),
            criterion::BatchSize::SmallInput,
        )
    });

    Propagator::new(&base.program, &mut base.graph).run();
    group.bench_function("extraction", |b| {
        b.iter(|| extract(black_box(&base.program), black_box(&base.graph)))
    });

    group.finish();
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    let analyzer = Analyzer::default();
    let parsed = parse_all(&generate_project(100));

    for size in [10, 25, 50, 100] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("project_size", size), &size, |b, &size| {
            let subset = &parsed[..size];
            b.iter(|| analyzer.analyze(black_box(subset)))
        });
    }

    let full = Analyzer::new(jscg_core::AnalysisOptions {
        strategy: Strategy::Full,
        natives: true,
    });
    group.bench_function("full_strategy_100_files", |b| {
        b.iter(|| full.analyze(black_box(&parsed)))
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_phases, bench_analysis);
criterion_main!(benches);
