//! Package sources for depviz
//!
//! Each source answers "what does this package directly depend on?" from a
//! different place: an npm-compatible HTTP registry, an installed
//! `node_modules` tree, or a hand-written test repository file. All of them
//! implement `depviz_core::PackageSource` and turn lookup failures into empty
//! dependency lists.

pub mod api;
pub mod client;
pub mod fixture;
pub mod manifest;

// Re-export main types
pub use api::{PackageDocument, VersionManifest};
pub use client::{AuthConfig, RegistryClient, RetryConfig};
pub use fixture::FixtureSource;
pub use manifest::{ManifestSource, PackageManifest};

use depviz_core::error::DepvizError;

/// Result type for source operations
pub type RegistryResult<T> = Result<T, DepvizError>;
