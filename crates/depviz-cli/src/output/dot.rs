//! Graph image and DOT export.
//!
//! The DOT text comes from petgraph. Image formats are produced by piping it
//! through Graphviz `dot`; when Graphviz is missing or fails, the DOT text is
//! written next to the requested file instead.

use std::process::Stdio;

use camino::{Utf8Path, Utf8PathBuf};
use petgraph::dot::{Config, Dot};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use depviz_core::error::{DepvizError, DepvizResult};
use depviz_core::utils::get_extension;
use depviz_graph::DependencyGraph;

/// What ended up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrittenGraph {
    /// DOT text written directly
    Dot(Utf8PathBuf),
    /// Image rendered by Graphviz
    Image(Utf8PathBuf),
    /// Graphviz was unusable, DOT text written instead
    Fallback { path: Utf8PathBuf, reason: String },
}

impl WrittenGraph {
    pub fn path(&self) -> &Utf8Path {
        match self {
            WrittenGraph::Dot(path) | WrittenGraph::Image(path) => path,
            WrittenGraph::Fallback { path, .. } => path,
        }
    }
}

/// DOT text for the graph; unexplored leaves are drawn dashed
pub fn to_dot(graph: &DependencyGraph) -> String {
    let view = graph.to_petgraph();
    // Labels are written by hand so the weights only need Debug
    let dot = Dot::with_attr_getters(
        &view,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, _| String::new(),
        &|_, (_, node)| {
            let style = if node.explored { "" } else { ", style=dashed" };
            format!("label = \"{}\", shape=box{} ", escape_label(&node.name), style)
        },
    );
    format!("{:?}", dot)
}

fn escape_label(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write the graph to `path`, rendering through Graphviz unless it is a `.dot` file
pub async fn write_graph(graph: &DependencyGraph, path: &Utf8Path) -> DepvizResult<WrittenGraph> {
    let dot = to_dot(graph);
    let format = get_extension(path.as_std_path()).unwrap_or_else(|| "png".to_string());

    if format == "dot" {
        write_file(path, &dot).await?;
        return Ok(WrittenGraph::Dot(path.to_path_buf()));
    }

    match render_with_graphviz(&dot, &format, path).await {
        Ok(()) => Ok(WrittenGraph::Image(path.to_path_buf())),
        Err(reason) => {
            let fallback = path.with_extension("dot");
            warn!(%reason, fallback = %fallback, "Graphviz rendering failed, writing DOT instead");
            write_file(&fallback, &dot).await?;
            Ok(WrittenGraph::Fallback { path: fallback, reason })
        }
    }
}

async fn render_with_graphviz(dot: &str, format: &str, path: &Utf8Path) -> Result<(), String> {
    debug!(format, path = %path, "Rendering with Graphviz");
    let mut child = Command::new("dot")
        .arg(format!("-T{}", format))
        .arg("-o")
        .arg(path.as_str())
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("could not run Graphviz 'dot': {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot.as_bytes())
            .await
            .map_err(|e| format!("could not send graph to Graphviz: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| format!("Graphviz did not finish: {}", e))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(format!(
            "Graphviz exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ))
    }
}

async fn write_file(path: &Utf8Path, content: &str) -> DepvizResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DepvizError::io(format!("Failed to create {}", parent), e))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| DepvizError::io(format!("Failed to write {}", path), e))
}
