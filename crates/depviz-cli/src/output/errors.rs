//! Error message formatting with actionable suggestions.

use depviz_core::error::DepvizError;
use super::colors::{ColorSupport, Stream};
use std::error::Error;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter for stderr
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(Stream::Stderr),
        }
    }

    #[cfg(test)]
    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with location, suggestion and cause chain
    pub fn format_error(&self, error: &DepvizError) -> String {
        let mut output = String::new();

        output.push_str(&self.colors.red("error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        match error {
            DepvizError::TomlParse { path, line, column, .. } if *line > 0 => {
                output.push_str(&self.format_location(path, *line, *column));
                output.push('\n');
            }
            DepvizError::FixtureParse { path, line, .. } => {
                output.push_str(&self.format_location(path, *line, 1));
                output.push('\n');
            }
            _ => {}
        }

        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.colors.dim("help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.colors.dim("caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }

    /// Format file location context
    pub fn format_location(&self, file: &str, line: usize, column: usize) -> String {
        format!("  {} {}:{}:{}", self.colors.dim("-->"), file, line, column)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
