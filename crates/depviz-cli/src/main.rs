//! # depviz
//!
//! Dependency graph explorer for npm-style package ecosystems.
//!
//! This is the main entry point for the depviz CLI. It parses arguments, sets
//! up logging and the panic hook, and dispatches to the command handlers.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use depviz_config::DepvizToml;
use depviz_core::error::{DepvizError, DepvizResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Explore, check and visualize package dependency graphs
#[derive(Parser, Debug)]
#[command(name = "depviz", version, about = "Dependency graph explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the discovered depviz.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the direct dependencies of a package
    Deps(AnalysisArgs),
    /// Explore the dependency graph and write it to a file
    Graph(AnalysisArgs),
    /// List every distinct dependency cycle
    Cycles(AnalysisArgs),
    /// Print a dependencies-first load order
    Order {
        #[command(flatten)]
        args: AnalysisArgs,
        /// File with a reference order to compare against, one name per line
        #[arg(long, value_name = "FILE")]
        reference: Option<Utf8PathBuf>,
    },
    /// Run every analysis over one graph
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Print a machine-readable JSON report
        #[arg(long)]
        json: bool,
    },
    /// Show the resolved configuration
    Config(AnalysisArgs),
    /// Show version information
    Version,
}

/// Flags shared by every analysis command. Unset flags fall back to
/// environment variables and configuration files.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Package to analyze
    #[arg(long)]
    pub package: Option<String>,

    /// npm-compatible registry URL
    #[arg(long, conflicts_with = "repo_path")]
    pub repo_url: Option<String>,

    /// Installed package tree, or test repository file with --test-repo
    #[arg(long)]
    pub repo_path: Option<String>,

    /// Read --repo-path as a test repository file
    #[arg(long)]
    pub test_repo: bool,

    /// Maximum exploration depth
    #[arg(long, allow_negative_numbers = true)]
    pub max_depth: Option<i64>,

    /// Skip dependencies whose name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Graph output file (.png, .svg, .pdf, .jpg or .dot)
    #[arg(long)]
    pub output: Option<String>,

    /// Print the dependency tree as ASCII art
    #[arg(long)]
    pub ascii_tree: bool,
}

impl AnalysisArgs {
    /// Command-line layer of the configuration
    pub fn to_overrides(&self) -> DepvizToml {
        let mut overrides = DepvizToml::default();
        overrides.analysis.package = self.package.clone();
        overrides.analysis.max_depth = self.max_depth;
        overrides.analysis.filter = self.filter.clone();
        overrides.source.repo_url = self.repo_url.clone();
        overrides.source.repo_path = self.repo_path.clone();
        overrides.source.test_repo = self.test_repo.then_some(true);
        overrides.output.file = self.output.clone();
        overrides.output.ascii_tree = self.ascii_tree.then_some(true);
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.log_format);
    setup_panic_handler();

    info!("Starting depviz v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "Command failed");
            eprint!("{}", ErrorFormatter::new().format_error(&error));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> DepvizResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| DepvizError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config)?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool, format: LogFormat) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "depviz={level},depviz_core={level},depviz_config={level},depviz_registry={level},depviz_graph={level}"
        ))
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("depviz encountered an unexpected error: {}", panic_info);
        eprintln!("depviz crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/depviz/depviz/issues");
        eprintln!("Error: {}", panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analysis_flags_become_overrides() {
        let cli = Cli::parse_from([
            "depviz",
            "graph",
            "--package",
            "express",
            "--repo-path",
            "repo.txt",
            "--test-repo",
            "--max-depth",
            "-2",
            "--ascii-tree",
        ]);

        let Commands::Graph(args) = cli.command else {
            panic!("Expected graph command");
        };
        let overrides = args.to_overrides();
        assert_eq!(overrides.analysis.package.as_deref(), Some("express"));
        assert_eq!(overrides.analysis.max_depth, Some(-2));
        assert_eq!(overrides.source.test_repo, Some(true));
        assert_eq!(overrides.output.ascii_tree, Some(true));
        assert_eq!(overrides.output.file, None);
    }

    #[test]
    fn test_unset_switches_do_not_override_files() {
        let overrides = AnalysisArgs::default().to_overrides();
        assert_eq!(overrides, DepvizToml::default());
    }

    #[test]
    fn test_repo_url_conflicts_with_repo_path() {
        let result = Cli::try_parse_from([
            "depviz",
            "deps",
            "--repo-url",
            "https://registry.npmjs.org",
            "--repo-path",
            "repo.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["depviz", "order", "--reference", "npm.txt", "-v", "--config", "ci.toml"]);

        assert!(cli.verbose);
        assert_eq!(cli.config, Some(Utf8PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Commands::Order { reference: Some(_), .. }));
    }
}
