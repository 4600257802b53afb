//! `depviz graph` command implementation.
//!
//! Explores the graph, prints it as a tree or adjacency listing with
//! statistics, and writes the picture to the configured output file.

use depviz_core::error::DepvizResult;
use depviz_graph::{find_cycles, DependencyGraph};
use tracing::info;

use super::CommandContext;
use crate::output::dot::{write_graph, WrittenGraph};
use crate::output::stats::GraphStats;
use crate::output::tree::render_tree;
use crate::AnalysisArgs;

/// Execute the `depviz graph` command
pub async fn execute(args: &AnalysisArgs, ctx: &CommandContext) -> DepvizResult<()> {
    let run = ctx.run_config(args).await?;
    let graph = ctx.explore(&run).await?;

    ctx.output.heading(&format!("Dependency graph of {}", run.package));
    if run.output.ascii_tree {
        ctx.output.report(render_tree(&graph, &run.package).trim_end());
    } else {
        ctx.output.report(&render_adjacency(&graph));
    }

    let stats = GraphStats::collect(&graph, &run.package, find_cycles(&graph).len());
    ctx.output.report("");
    ctx.output.report(&stats.to_string());

    let written = write_graph(&graph, &ctx.resolve_path(&run.output.file)).await?;
    report_written(&written, ctx);
    Ok(())
}

/// Tell the user where the graph went
pub fn report_written(written: &WrittenGraph, ctx: &CommandContext) {
    info!(path = %written.path(), "Graph output written");
    match written {
        WrittenGraph::Dot(path) => ctx.output.success(&format!("Graph written to {}", path)),
        WrittenGraph::Image(path) => ctx.output.success(&format!("Graph image written to {}", path)),
        WrittenGraph::Fallback { path, reason } => {
            ctx.output.warn(&format!("{}; wrote DOT source to {} instead", reason, path));
        }
    }
}

/// `name -> dep, dep` per explored package, then the unexplored names
pub fn render_adjacency(graph: &DependencyGraph) -> String {
    let mut lines: Vec<String> = graph
        .iter()
        .map(|(name, deps)| {
            if deps.is_empty() {
                format!("{} -> (none)", name)
            } else {
                format!("{} -> {}", name, deps.join(", "))
            }
        })
        .collect();

    let leaves = graph.unexplored_leaves();
    if !leaves.is_empty() {
        lines.push(format!("not explored: {}", leaves.join(", ")));
    }
    lines.join("\n")
}
