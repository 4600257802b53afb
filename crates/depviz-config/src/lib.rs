//! Configuration for depviz runs
//!
//! This crate handles parsing of depviz.toml files, layering of global,
//! project, environment and command-line settings, and validation of the
//! merged result into a `RunConfig`.

pub mod toml;
pub mod merge;
pub mod validate;

// Re-export main types
pub use toml::{AnalysisSection, DepvizToml, OutputSection, ReportFormat, SourceSection};
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use validate::{validate, ConfigWarning, OutputConfig, RunConfig, SourceConfig, ValidatedConfig};

use depviz_core::error::DepvizError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, DepvizError>;
