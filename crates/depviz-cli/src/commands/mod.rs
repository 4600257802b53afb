//! Command implementations and dispatch logic.
//!
//! Every analysis command resolves the layered configuration, opens the
//! configured package source, and runs the graph engine. Each command is an
//! async function taking a `CommandContext`.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use depviz_config::{validate, ConfigLayering, ConfigLoader, ConfigSource, RunConfig, ValidatedConfig};
use depviz_core::error::{DepvizError, DepvizResult};
use depviz_graph::{DependencyGraph, GraphBuilder};
use tracing::info;

pub mod analyze;
pub mod config;
pub mod cycles;
pub mod deps;
pub mod graph;
pub mod order;
pub mod source;

#[cfg(test)]
mod tests;

use crate::{AnalysisArgs, Commands, output::OutputHandler};
use source::open_source;

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    /// Explicit `--config` file
    pub config_file: Option<Utf8PathBuf>,
    /// `DEPVIZ_*` variables captured at startup
    pub env_overrides: HashMap<String, String>,
    pub output: OutputHandler,
}

/// Everything known about a configuration after layering and validation
pub struct ResolvedConfig {
    pub validated: ValidatedConfig,
    pub sources: Vec<ConfigSource>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config_file: Option<Utf8PathBuf>) -> DepvizResult<Self> {
        let loader = ConfigLoader::from_current_dir()?;

        Ok(Self {
            cwd: loader.cwd().to_path_buf(),
            config_file,
            env_overrides: ConfigLayering::collect_env_overrides(),
            output: OutputHandler::new(),
        })
    }

    /// Layer and validate configuration for one command
    pub async fn resolve_config(&self, args: &AnalysisArgs) -> DepvizResult<ResolvedConfig> {
        let loader = ConfigLoader::new(self.cwd.clone());
        let (merged, sources) = loader
            .load_layered(self.config_file.as_deref(), &self.env_overrides, args.to_overrides())
            .await?;
        let validated = validate(&merged)?;
        Ok(ResolvedConfig { validated, sources })
    }

    /// Resolve configuration and report its warnings
    pub async fn run_config(&self, args: &AnalysisArgs) -> DepvizResult<RunConfig> {
        let resolved = self.resolve_config(args).await?;
        for warning in &resolved.validated.warnings {
            self.output.warn(&warning.to_string());
        }
        Ok(resolved.validated.run)
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Open the configured source and explore the graph from the configured package
    pub async fn explore(&self, run: &RunConfig) -> DepvizResult<DependencyGraph> {
        let source = open_source(&run.source, &self.cwd).await?;
        self.output.info(&format!(
            "Exploring {} from {} (max depth {})",
            run.package,
            run.source.describe(),
            run.max_depth
        ));
        let graph = builder_for(run).build(&run.package, &source).await;
        info!(package = %run.package, explored = graph.len(), "Graph explored");
        Ok(graph)
    }
}

/// Graph builder configured from a run configuration
pub fn builder_for(run: &RunConfig) -> GraphBuilder {
    let builder = GraphBuilder::new(run.max_depth);
    match &run.filter {
        Some(filter) => builder.with_filter(filter.clone()),
        None => builder,
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> DepvizResult<()> {
    match command {
        Commands::Deps(args) => {
            info!("Listing direct dependencies");
            deps::execute(&args, ctx).await
        }
        Commands::Graph(args) => {
            info!("Building dependency graph");
            graph::execute(&args, ctx).await
        }
        Commands::Cycles(args) => {
            info!("Detecting dependency cycles");
            cycles::execute(&args, ctx).await
        }
        Commands::Order { args, reference } => {
            info!("Computing load order (reference: {:?})", reference);
            order::execute(&args, reference.as_deref(), ctx).await
        }
        Commands::Analyze { args, json } => {
            info!("Running full analysis (json: {})", json);
            analyze::execute(&args, json, ctx).await
        }
        Commands::Config(args) => {
            info!("Showing configuration");
            config::execute(&args, ctx).await
        }
        Commands::Version => {
            info!("Showing version information");
            show_version(ctx)
        }
    }
}

fn show_version(ctx: &CommandContext) -> DepvizResult<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build_date = env!("BUILD_DATE");

    ctx.output.report(&format!("depviz v{}", version));
    ctx.output.report(&format!("Built: {}", build_date));
    ctx.output.report(&format!("Target: {}", env!("BUILD_TARGET")));
    ctx.output.report(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Serialize a report as pretty JSON
pub fn to_json<T: serde::Serialize>(value: &T) -> DepvizResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| DepvizError::Render {
        message: format!("JSON serialization error: {}", e),
    })
}
