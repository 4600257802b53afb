//! npm registry API response types
//!
//! Only the parts of a package document needed to list the latest version's
//! dependencies are modelled. Dependency maps deserialize into `IndexMap` so
//! declaration order survives.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use depviz_core::PackageName;

/// Package document returned by `GET {registry}/{name}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageDocument {
    /// Package name
    pub name: String,
    /// Tag name to version, `latest` is the one explored
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: HashMap<String, String>,
    /// Metadata for every published version
    #[serde(default)]
    pub versions: HashMap<String, VersionManifest>,
}

/// Metadata for a specific package version
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionManifest {
    /// Version string
    pub version: String,
    /// Runtime dependencies, name to version requirement
    #[serde(default)]
    pub dependencies: Option<IndexMap<String, String>>,
}

impl PackageDocument {
    /// Version the `latest` dist-tag points at
    pub fn latest_version(&self) -> Option<&VersionManifest> {
        let latest = self.dist_tags.get("latest")?;
        self.versions.get(latest)
    }

    /// Dependency names of the latest version, in declaration order
    pub fn latest_dependencies(&self) -> Option<Vec<PackageName>> {
        let manifest = self.latest_version()?;
        Some(manifest.dependency_names())
    }
}

impl VersionManifest {
    /// Dependency names in declaration order; version requirements are ignored
    pub fn dependency_names(&self) -> Vec<PackageName> {
        self.dependencies
            .as_ref()
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }
}
