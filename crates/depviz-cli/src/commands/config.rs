//! `depviz config` command implementation.

use depviz_core::error::DepvizResult;

use super::{CommandContext, ResolvedConfig};
use crate::AnalysisArgs;

/// Execute the `depviz config` command
pub async fn execute(args: &AnalysisArgs, ctx: &CommandContext) -> DepvizResult<()> {
    let resolved = ctx.resolve_config(args).await?;
    ctx.output.report(&render_config(&resolved));

    for warning in &resolved.validated.warnings {
        ctx.output.warn(&warning.to_string());
    }
    Ok(())
}

/// Configuration table followed by the layers that produced it
pub fn render_config(resolved: &ResolvedConfig) -> String {
    let mut out = resolved.validated.run.to_string();
    if resolved.sources.is_empty() {
        out.push_str("\nSources: defaults only");
    } else {
        out.push_str("\nSources:");
        for source in &resolved.sources {
            out.push_str(&format!("\n  - {}", source));
        }
    }
    out
}
