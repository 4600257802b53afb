//! Validation of merged configuration into a runnable form
//!
//! Errors stop the run before any package is explored. Warnings describe
//! settings that are allowed but probably not what the user meant; the CLI
//! prints them and carries on.

use std::fmt;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use url::Url;

use depviz_core::error::DepvizError;
use depviz_core::types::is_valid_name;

use crate::toml::{DepvizToml, ReportFormat};
use crate::ConfigResult;

pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_OUTPUT_FILE: &str = "dependency_graph.png";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Depths above this are accepted with a warning
pub const LARGE_DEPTH_THRESHOLD: usize = 100;

const REPOSITORY_EXTENSIONS: &[&str] = &["json", "txt", "yaml", "yml"];
const OUTPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "pdf", "dot"];

/// Where dependency lists are read from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// npm-compatible HTTP registry
    Registry {
        url: String,
        #[serde(skip)]
        token: Option<String>,
        timeout: Duration,
        max_retries: u32,
    },
    /// Test repository file
    Fixture { path: Utf8PathBuf },
    /// Project directory with an installed `node_modules` tree
    Manifest { root: Utf8PathBuf },
}

/// Where and how results are written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputConfig {
    pub file: Utf8PathBuf,
    pub ascii_tree: bool,
    pub format: ReportFormat,
}

/// Fully validated settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub package: String,
    pub max_depth: usize,
    pub filter: Option<String>,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

/// Non-fatal findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    NonStandardRepositoryExtension { path: String },
    VeryLargeDepth { depth: usize },
    NonStandardOutputExtension { file: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::NonStandardRepositoryExtension { path } => write!(
                f,
                "non-standard repository file extension: {} (expected .json, .txt, .yaml or .yml)",
                path
            ),
            ConfigWarning::VeryLargeDepth { depth } => write!(
                f,
                "very large analysis depth {} (more than {})",
                depth, LARGE_DEPTH_THRESHOLD
            ),
            ConfigWarning::NonStandardOutputExtension { file } => write!(
                f,
                "output file {} does not use a standard image extension (.png, .jpg, .jpeg, .svg, .pdf) or .dot",
                file
            ),
        }
    }
}

/// A run configuration and the warnings raised while building it
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub run: RunConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Check merged settings and build the run configuration
pub fn validate(config: &DepvizToml) -> ConfigResult<ValidatedConfig> {
    let mut warnings = Vec::new();

    let package = config.analysis.package.as_deref().unwrap_or_default().trim();
    if package.is_empty() {
        return Err(DepvizError::config("package", "package name must not be empty"));
    }
    if !is_valid_name(package) {
        return Err(DepvizError::config(
            "package",
            format!("'{}' is not a usable package name", package),
        ));
    }

    let source = validate_source(config, &mut warnings)?;

    let max_depth = match config.analysis.max_depth {
        None => DEFAULT_MAX_DEPTH,
        Some(depth) if depth <= 0 => {
            return Err(DepvizError::config("max_depth", "must be a positive number"));
        }
        Some(depth) => usize::try_from(depth)
            .map_err(|_| DepvizError::config("max_depth", format!("{} is too large", depth)))?,
    };
    if max_depth > LARGE_DEPTH_THRESHOLD {
        warnings.push(ConfigWarning::VeryLargeDepth { depth: max_depth });
    }

    let filter = config
        .analysis
        .filter
        .as_deref()
        .filter(|filter| !filter.trim().is_empty())
        .map(str::to_string);

    let file = config.output.file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE);
    if file.trim().is_empty() {
        return Err(DepvizError::config("output", "output file name must not be empty"));
    }
    if !has_extension(Utf8Path::new(file), OUTPUT_EXTENSIONS) {
        warnings.push(ConfigWarning::NonStandardOutputExtension {
            file: file.to_string(),
        });
    }

    Ok(ValidatedConfig {
        run: RunConfig {
            package: package.to_string(),
            max_depth,
            filter,
            source,
            output: OutputConfig {
                file: Utf8PathBuf::from(file),
                ascii_tree: config.output.ascii_tree.unwrap_or(false),
                format: config.output.format.unwrap_or_default(),
            },
        },
        warnings,
    })
}

fn validate_source(config: &DepvizToml, warnings: &mut Vec<ConfigWarning>) -> ConfigResult<SourceConfig> {
    let source = &config.source;
    let test_repo = source.test_repo.unwrap_or(false);
    let repo_url = source.repo_url.as_deref().filter(|url| !url.trim().is_empty());
    let repo_path = source.repo_path.as_deref().filter(|path| !path.trim().is_empty());

    match (repo_url, repo_path) {
        (None, None) => Err(DepvizError::config(
            "repository",
            "one of repo-url or repo-path is required",
        )),
        (Some(_), Some(_)) => Err(DepvizError::config(
            "repository",
            "repo-url and repo-path are mutually exclusive",
        )),
        (Some(_), None) if test_repo => Err(DepvizError::config(
            "test_repo",
            "test repository mode needs repo-path, not repo-url",
        )),
        (Some(url), None) => {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DepvizError::config(
                    "repo_url",
                    "repository URL must start with http:// or https://",
                ));
            }
            Url::parse(url)
                .map_err(|e| DepvizError::config("repo_url", format!("'{}' is not a valid URL: {}", url, e)))?;

            Ok(SourceConfig::Registry {
                url: url.to_string(),
                token: source.token.clone().filter(|token| !token.is_empty()),
                timeout: Duration::from_secs(source.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                max_retries: source.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            })
        }
        (None, Some(path)) if test_repo => {
            let path = Utf8PathBuf::from(path);
            if !has_extension(&path, REPOSITORY_EXTENSIONS) {
                warnings.push(ConfigWarning::NonStandardRepositoryExtension {
                    path: path.to_string(),
                });
            }
            Ok(SourceConfig::Fixture { path })
        }
        (None, Some(path)) => Ok(SourceConfig::Manifest {
            root: Utf8PathBuf::from(path),
        }),
    }
}

fn has_extension(path: &Utf8Path, allowed: &[&str]) -> bool {
    path.extension()
        .map(|ext| allowed.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl SourceConfig {
    /// Short label for reports
    pub fn describe(&self) -> String {
        match self {
            SourceConfig::Registry { url, .. } => format!("registry {}", url),
            SourceConfig::Fixture { path } => format!("test repository {}", path),
            SourceConfig::Manifest { root } => format!("package tree {}", root),
        }
    }
}

impl RunConfig {
    /// Key/value rows of the configuration table
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("package", self.package.clone()),
            ("max_depth", self.max_depth.to_string()),
        ];
        if let Some(filter) = &self.filter {
            rows.push(("filter", filter.clone()));
        }
        match &self.source {
            SourceConfig::Registry { url, token, timeout, max_retries } => {
                rows.push(("repo_url", url.clone()));
                rows.push(("timeout", format!("{}s", timeout.as_secs())));
                rows.push(("max_retries", max_retries.to_string()));
                if token.is_some() {
                    rows.push(("token", "********".to_string()));
                }
            }
            SourceConfig::Fixture { path } => {
                rows.push(("repo_path", path.to_string()));
                rows.push(("test_repo", "true".to_string()));
            }
            SourceConfig::Manifest { root } => {
                rows.push(("repo_path", root.to_string()));
                rows.push(("test_repo", "false".to_string()));
            }
        }
        rows.push(("output", self.output.file.to_string()));
        rows.push(("ascii_tree", self.output.ascii_tree.to_string()));
        rows.push(("format", self.output.format.to_string()));
        rows
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "{}", "-".repeat(40))?;
        for (key, value) in self.rows() {
            writeln!(f, "{:15}: {}", key, value)?;
        }
        write!(f, "{}", "-".repeat(40))
    }
}
