//! # depviz-core
//!
//! Core types and utilities shared across all depviz crates.
//!
//! This crate provides:
//! - `PackageName`, the opaque key used for packages everywhere
//! - The `PackageSource` trait every dependency backend implements
//! - `DepvizError` enum for unified error handling
//! - Path helpers for walking on-disk package trees safely
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageName and name checks)
//! - `source`: The direct-dependency lookup contract
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod source;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{DepvizError, DepvizResult};
pub use source::PackageSource;
pub use types::PackageName;
