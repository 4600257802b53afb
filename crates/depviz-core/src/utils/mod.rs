//! Utility functions and helpers.
//!
//! Common functionality used across multiple depviz crates.

pub mod path;

// Re-export commonly used utilities
pub use path::{get_extension, installed_package_dir, is_safe_path, normalize_path};
