//! `depviz order` command implementation.

use camino::Utf8Path;
use depviz_core::error::{DepvizError, DepvizResult};
use depviz_core::PackageName;
use depviz_graph::{compare_with_reference, load_order, LoadOrder, OrderComparison};

use super::CommandContext;
use crate::AnalysisArgs;

/// Execute the `depviz order` command
pub async fn execute(
    args: &AnalysisArgs,
    reference: Option<&Utf8Path>,
    ctx: &CommandContext,
) -> DepvizResult<()> {
    let run = ctx.run_config(args).await?;
    let graph = ctx.explore(&run).await?;

    let order = load_order(&graph, &run.package);
    ctx.output.report(&render_order(&order));

    if let Some(reference) = reference {
        let reference_order = read_reference(&ctx.resolve_path(reference)).await?;
        let comparison = compare_with_reference(order.as_slice(), &reference_order);
        ctx.output.report("");
        ctx.output.report(&render_comparison(&comparison));
    }
    Ok(())
}

/// Read a reference order: one name per line, `#` comments and blank lines skipped
pub async fn read_reference(path: &Utf8Path) -> DepvizResult<Vec<PackageName>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DepvizError::io(format!("Failed to read reference order {}", path), e))?;
    Ok(parse_reference(&content))
}

pub fn parse_reference(content: &str) -> Vec<PackageName> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Numbered order with the start package's position
pub fn render_order(order: &LoadOrder) -> String {
    let Some(position) = order.start_position() else {
        return format!("{} was not explored; no load order", order.start());
    };

    let mut out = format!("Load order for {}:", order.start());
    for (index, name) in order.iter().enumerate() {
        out.push_str(&format!("\n  {:>3}. {}", index + 1, name));
    }
    out.push_str(&format!(
        "\n{} loads at position {} of {}",
        order.start(),
        position + 1,
        order.len()
    ));
    out
}

pub fn render_comparison(comparison: &OrderComparison) -> String {
    if comparison.is_consistent() {
        return format!(
            "Reference order agrees on all {} packages",
            comparison.common.len()
        );
    }

    let mut out = format!(
        "Reference order differs ({} packages in common):",
        comparison.common.len()
    );
    if !comparison.only_computed.is_empty() {
        out.push_str(&format!("\n  only computed : {}", comparison.only_computed.join(", ")));
    }
    if !comparison.only_reference.is_empty() {
        out.push_str(&format!("\n  only reference: {}", comparison.only_reference.join(", ")));
    }
    for (first, second) in &comparison.inversions {
        out.push_str(&format!(
            "\n  {} before {} here, after it in the reference",
            first, second
        ));
    }
    out
}
