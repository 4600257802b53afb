//! Core data types for depviz.
//!
//! Packages are identified purely by name. Versions are never resolved, so the
//! name is the whole identity of a node in every graph depviz builds.

pub mod package;

// Re-export all public types
pub use package::{is_valid_name, PackageName};
