//! Error types and result aliases for depviz operations.
//!
//! Graph exploration itself never fails. These errors cover the layers around
//! it: loading configuration, talking to package sources before their failures
//! are normalized away, and writing reports.

use thiserror::Error;

/// Unified error type for all depviz operations
#[derive(Error, Debug)]
pub enum DepvizError {
    // Config errors
    #[error("Failed to parse {path}: {message} at line {line}, column {column}")]
    TomlParse {
        path: String,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to parse package.json: {message}")]
    JsonParse { message: String },

    #[error("Failed to parse test repository {path} (line {line}): {message}")]
    FixtureParse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Source errors
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Path '{path}' escapes the package tree")]
    PathTraversal { path: String },

    // Output errors
    #[error("Failed to render output: {message}")]
    Render { message: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for depviz operations
pub type DepvizResult<T> = Result<T, DepvizError>;

impl DepvizError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a named configuration field
    pub fn config(field: &str, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is worth retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DepvizError::Network { .. } | DepvizError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            DepvizError::PackageNotFound { .. } => {
                Some("Check the package name spelling; names are case-sensitive")
            },
            DepvizError::Network { .. } => {
                Some("Check your internet connection and the --repo-url value")
            },
            DepvizError::ConfigValidation { .. } => {
                Some("Run 'depviz config' to inspect the resolved configuration")
            },
            DepvizError::FixtureParse { .. } => {
                Some("Test repository lines look like 'A: B, C' or use a JSON object of name -> [deps]")
            },
            DepvizError::Render { .. } => {
                Some("Install Graphviz or choose a .dot output file")
            },
            _ => None,
        }
    }
}
