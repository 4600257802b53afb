//! `depviz cycles` command implementation.

use depviz_core::error::DepvizResult;
use depviz_graph::{find_cycles, Cycle};

use super::CommandContext;
use crate::AnalysisArgs;

/// Execute the `depviz cycles` command
pub async fn execute(args: &AnalysisArgs, ctx: &CommandContext) -> DepvizResult<()> {
    let run = ctx.run_config(args).await?;
    let graph = ctx.explore(&run).await?;

    let cycles = find_cycles(&graph);
    ctx.output.report(&render_cycles(&cycles));
    Ok(())
}

/// Numbered list of cycles
pub fn render_cycles(cycles: &[Cycle]) -> String {
    if cycles.is_empty() {
        return "No cycles found".to_string();
    }

    let mut out = format!("Found {} cycle(s):", cycles.len());
    for (index, cycle) in cycles.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", index + 1, cycle));
    }
    out
}
