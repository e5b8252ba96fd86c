//! Human-readable call graph, flow graph and timing output

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use jscg_core::Analysis;
use jscg_core::callgraph::{pretty_flow_edge, pretty_vertex};
use jscg_core::flow::Vertex;

/// One `'caller' (pos) -> 'callee' (pos)` line per call graph edge.
pub fn write_call_graph<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    for (call, callee) in analysis.call_graph.edges() {
        let source =
            pretty_vertex(&analysis.program, &Vertex::Callee(call)).map_err(io::Error::other)?;
        let target =
            pretty_vertex(&analysis.program, &callee.to_vertex()).map_err(io::Error::other)?;
        writeln!(writer, "{} {} {}", source.cyan(), "->".dimmed(), target.green())?;
    }
    Ok(())
}

/// One `source => target` line per flow graph edge.
pub fn write_flow_graph<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    for (source, target) in analysis.flow_graph.edges() {
        writeln!(
            writer,
            "{}",
            pretty_flow_edge(
                &analysis.flow_graph,
                &analysis.program,
                &analysis.symbols,
                source,
                target
            )
        )?;
    }
    Ok(())
}

pub fn write_callback_count<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    let callbacks = analysis.stats.callbacks;
    writeln!(
        writer,
        "Callbacks: {} function arguments at {} call sites",
        callbacks.callbacks, callbacks.calls
    )
}

/// One `importer -> imported` line per linked file pair.
pub fn write_dependencies<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    for dependency in &analysis.dependencies {
        writeln!(
            writer,
            "{} -> {}",
            analysis.program.file(dependency.from).path.display(),
            analysis.program.file(dependency.to).path.display()
        )?;
    }
    Ok(())
}

pub fn write_timings<W: Write>(
    writer: &mut W,
    parsing: Duration,
    analysis: &Analysis,
) -> io::Result<()> {
    writeln!(writer, "{:<16} {:>10.3}ms", "parsing", millis(parsing))?;
    for (phase, duration) in analysis.timings.phases() {
        writeln!(writer, "{:<16} {:>10.3}ms", phase, millis(duration))?;
    }
    writeln!(
        writer,
        "{:<16} {:>10.3}ms",
        "total".bold(),
        millis(parsing + analysis.timings.total())
    )
}

pub fn write_summary<W: Write>(writer: &mut W, analysis: &Analysis) -> io::Result<()> {
    let stats = &analysis.stats;
    let unresolved = if stats.unresolved_calls > 0 {
        stats.unresolved_calls.to_string().yellow()
    } else {
        stats.unresolved_calls.to_string().green()
    };
    writeln!(
        writer,
        "{} {} files, {} functions, {} call sites, {} call edges, {} unresolved",
        "✓".green().bold(),
        stats.files,
        stats.functions,
        stats.calls,
        stats.call_edges,
        unresolved
    )
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
