//! depviz.toml parsing and serialization

use serde::{Deserialize, Serialize};
use depviz_core::error::DepvizError;
use crate::ConfigResult;

/// Complete depviz.toml configuration. Every field is optional so partial
/// files can be layered on top of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepvizToml {
    /// What to analyze
    #[serde(default)]
    pub analysis: AnalysisSection,

    /// Where dependency information comes from
    #[serde(default)]
    pub source: SourceSection,

    /// How results are written
    #[serde(default)]
    pub output: OutputSection,
}

/// `[analysis]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisSection {
    /// Root package to explore
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,

    /// Exploration depth bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<i64>,

    /// Dependencies whose name contains this substring are skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// `[source]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SourceSection {
    /// npm-compatible registry URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    /// Local package tree or test repository file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_path: Option<String>,

    /// Treat `repo-path` as a test repository file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_repo: Option<bool>,

    /// Per-request timeout for registry access
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Retry attempts for failed registry requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,

    /// Bearer token for private registries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `[output]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputSection {
    /// Graph image or DOT file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Print the dependency tree as ASCII art
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascii_tree: Option<bool>,

    /// Report format on stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ReportFormat>,
}

/// Report format for command output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = DepvizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(DepvizError::config(
                "output.format",
                format!("unknown format '{}', expected 'text' or 'json'", other),
            )),
        }
    }
}

impl DepvizToml {
    /// Overlay `other` on top of `self`; values set in `other` win
    pub fn merge(self, other: DepvizToml) -> DepvizToml {
        DepvizToml {
            analysis: AnalysisSection {
                package: other.analysis.package.or(self.analysis.package),
                max_depth: other.analysis.max_depth.or(self.analysis.max_depth),
                filter: other.analysis.filter.or(self.analysis.filter),
            },
            source: SourceSection {
                repo_url: other.source.repo_url.or(self.source.repo_url),
                repo_path: other.source.repo_path.or(self.source.repo_path),
                test_repo: other.source.test_repo.or(self.source.test_repo),
                timeout_secs: other.source.timeout_secs.or(self.source.timeout_secs),
                max_retries: other.source.max_retries.or(self.source.max_retries),
                token: other.source.token.or(self.source.token),
            },
            output: OutputSection {
                file: other.output.file.or(self.output.file),
                ascii_tree: other.output.ascii_tree.or(self.output.ascii_tree),
                format: other.output.format.or(self.output.format),
            },
        }
    }
}

/// Parse TOML string to DepvizToml configuration
pub fn parse_depviz_toml(content: &str) -> ConfigResult<DepvizToml> {
    parse_named(content, "depviz.toml")
}

fn parse_named(content: &str, path: &str) -> ConfigResult<DepvizToml> {
    // First try with toml_edit for better error reporting
    content.parse::<toml_edit::DocumentMut>().map_err(|e| {
        let (line, column) = line_column(content, e.span().map(|span| span.start));
        DepvizError::TomlParse {
            path: path.to_string(),
            message: format!("TOML syntax error: {}", e.message()),
            line,
            column,
        }
    })?;

    // Then parse with serde for type safety
    toml::from_str(content).map_err(|e| {
        let (line, column) = line_column(content, e.span().map(|span| span.start));
        DepvizError::TomlParse {
            path: path.to_string(),
            message: e.message().to_string(),
            line,
            column,
        }
    })
}

/// Serialize DepvizToml to TOML string
pub fn serialize_depviz_toml(config: &DepvizToml) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| DepvizError::Render {
        message: format!("TOML serialization error: {}", e),
    })
}

/// Load and parse a configuration file; parse errors name `path`
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<DepvizToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DepvizError::io(format!("Failed to read {}", path), e))?;

    parse_named(&content, path.as_str())
}

/// One-based line and column of a byte offset
fn line_column(content: &str, offset: Option<usize>) -> (usize, usize) {
    let Some(offset) = offset else {
        return (0, 0);
    };
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |newline| before[newline + 1..].chars().count())
        + 1;
    (line, column)
}
