//! Terminal output formatting and report rendering.
//!
//! Reports go to stdout. Status lines, warnings and errors go to stderr so a
//! report can be piped without noise.

pub mod colors;
pub mod dot;
pub mod errors;
pub mod stats;
pub mod tree;

use colors::{ColorSupport, Stream};

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    stdout: ColorSupport,
    stderr: ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            stdout: ColorSupport::detect(Stream::Stdout),
            stderr: ColorSupport::detect(Stream::Stderr),
        }
    }

    /// Handler that never emits escape codes
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            stdout: ColorSupport::disabled(),
            stderr: ColorSupport::disabled(),
        }
    }

    /// Print report text
    pub fn report(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a section heading
    pub fn heading(&self, text: &str) {
        println!("{}", self.stdout.bold(text));
    }

    /// Print a status message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.stderr.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.stderr.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.stderr.yellow("warning:"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
