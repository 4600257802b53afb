//! Terminal color support.
//!
//! Colors are used only when the target stream is a terminal and `NO_COLOR`
//! is unset, so redirected reports stay plain text.

use std::env;
use std::io::{self, IsTerminal};

/// Output stream a piece of text is headed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// ANSI styles used by depviz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Red,
    Bold,
    Dim,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Green => "32",
            Style::Yellow => "33",
            Style::Red => "31",
            Style::Bold => "1",
            Style::Dim => "2",
        }
    }
}

/// Color support detection and formatting
#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support for one stream
    pub fn detect(stream: Stream) -> Self {
        let is_terminal = match stream {
            Stream::Stdout => io::stdout().is_terminal(),
            Stream::Stderr => io::stderr().is_terminal(),
        };
        // Respect NO_COLOR environment variable
        let enabled = is_terminal && env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Force disable colors
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Wrap `text` in the escape codes for `style`
    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", style.code(), text)
        } else {
            text.to_string()
        }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(Style::Green, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(Style::Yellow, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(Style::Red, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(Style::Bold, text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(Style::Dim, text)
    }
}
