//! `depviz deps` command implementation.

use depviz_core::error::DepvizResult;
use depviz_core::PackageName;

use super::source::open_source;
use super::{builder_for, CommandContext};
use crate::AnalysisArgs;

/// Execute the `depviz deps` command
pub async fn execute(args: &AnalysisArgs, ctx: &CommandContext) -> DepvizResult<()> {
    let run = ctx.run_config(args).await?;
    let source = open_source(&run.source, &ctx.cwd).await?;

    let dependencies = builder_for(&run)
        .direct_dependencies(&run.package, &source)
        .await;

    ctx.output.report(&render_direct(&run.package, &dependencies));
    Ok(())
}

/// One dependency per line under a heading
pub fn render_direct(package: &str, dependencies: &[PackageName]) -> String {
    if dependencies.is_empty() {
        return format!("{} has no direct dependencies", package);
    }

    let mut out = format!("Direct dependencies of {} ({}):", package, dependencies.len());
    for dependency in dependencies {
        out.push_str("\n  - ");
        out.push_str(dependency);
    }
    out
}
