//! `depviz analyze` command implementation.
//!
//! Builds the graph once and runs every analysis over it. With `--json`, or
//! `format = "json"` in `[output]`, a single JSON document goes to stdout.

use serde::Serialize;

use depviz_config::{ReportFormat, RunConfig};
use depviz_core::error::DepvizResult;
use depviz_core::PackageName;
use depviz_graph::{find_cycles, load_order, Cycle, DependencyGraph, LoadOrder};

use super::cycles::render_cycles;
use super::deps::render_direct;
use super::graph::{render_adjacency, report_written};
use super::order::render_order;
use super::{to_json, CommandContext};
use crate::output::dot::write_graph;
use crate::output::stats::GraphStats;
use crate::output::tree::render_tree;
use crate::AnalysisArgs;

/// Every result of one analysis run
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub package: &'a str,
    pub source: String,
    pub max_depth: usize,
    pub filter: Option<&'a str>,
    pub direct_dependencies: &'a [PackageName],
    pub graph: &'a DependencyGraph,
    pub stats: GraphStats,
    pub cycles: Vec<Cycle>,
    pub load_order: LoadOrderReport<'a>,
}

#[derive(Debug, Serialize)]
pub struct LoadOrderReport<'a> {
    pub order: &'a [PackageName],
    /// One-based position of the analyzed package
    pub start_position: Option<usize>,
    pub reachable: usize,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(run: &'a RunConfig, graph: &'a DependencyGraph, order: &'a LoadOrder) -> Self {
        let cycles = find_cycles(graph);
        Self {
            package: &run.package,
            source: run.source.describe(),
            max_depth: run.max_depth,
            filter: run.filter.as_deref(),
            direct_dependencies: graph.dependencies_of(&run.package).unwrap_or(&[]),
            graph,
            stats: GraphStats::collect(graph, &run.package, cycles.len()),
            cycles,
            load_order: LoadOrderReport {
                order: order.as_slice(),
                start_position: order.start_position().map(|position| position + 1),
                reachable: order.len(),
            },
        }
    }

    /// Human-readable report, sections separated by blank lines
    pub fn render_text(&self, ascii_tree: bool, order: &LoadOrder) -> String {
        let structure = if ascii_tree {
            render_tree(self.graph, self.package).trim_end().to_string()
        } else {
            render_adjacency(self.graph)
        };

        [
            render_direct(self.package, self.direct_dependencies),
            structure,
            self.stats.to_string(),
            render_cycles(&self.cycles),
            render_order(order),
        ]
        .join("\n\n")
    }
}

/// Execute the `depviz analyze` command
pub async fn execute(args: &AnalysisArgs, json: bool, ctx: &CommandContext) -> DepvizResult<()> {
    let run = ctx.run_config(args).await?;
    let graph = ctx.explore(&run).await?;
    let order = load_order(&graph, &run.package);
    let report = AnalysisReport::new(&run, &graph, &order);

    if json || run.output.format == ReportFormat::Json {
        ctx.output.report(&to_json(&report)?);
    } else {
        ctx.output.report(&report.render_text(run.output.ascii_tree, &order));
    }

    let written = write_graph(&graph, &ctx.resolve_path(&run.output.file)).await?;
    report_written(&written, ctx);
    Ok(())
}
