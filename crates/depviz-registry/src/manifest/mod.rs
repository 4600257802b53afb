//! Installed package trees
//!
//! Reads dependencies straight from `package.json` files on disk: the project
//! manifest at the repository root answers for the project itself, every other
//! package is looked up under `node_modules/<name>/package.json`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use depviz_core::error::DepvizError;
use depviz_core::utils::installed_package_dir;
use depviz_core::{PackageName, PackageSource};

use crate::RegistryResult;

/// The fields of a package.json that exploration needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Runtime dependencies, name to version requirement
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    /// Parse a package.json document
    pub fn parse(content: &str) -> RegistryResult<Self> {
        serde_json::from_str(content).map_err(|e| DepvizError::JsonParse {
            message: format!("JSON parsing error: {}", e),
        })
    }

    /// Read and parse a package.json file
    pub async fn load(path: &Path) -> RegistryResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DepvizError::io(format!("Failed to read {}", path.display()), e))?;

        Self::parse(&content).map_err(|e| match e {
            DepvizError::JsonParse { message } => DepvizError::JsonParse {
                message: format!("In file {}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Dependency names in declaration order
    pub fn dependency_names(&self) -> Vec<PackageName> {
        self.dependencies.keys().cloned().collect()
    }
}

/// Package source backed by a project directory and its `node_modules`
#[derive(Debug, Clone)]
pub struct ManifestSource {
    root: PathBuf,
    root_manifest: PackageManifest,
}

impl ManifestSource {
    /// Open a project directory. The root package.json must exist and parse.
    pub async fn open(root: impl Into<PathBuf>) -> RegistryResult<Self> {
        let root = root.into();
        let root_manifest = PackageManifest::load(&root.join("package.json")).await?;
        debug!(
            root = %root.display(),
            name = root_manifest.name.as_deref().unwrap_or("<unnamed>"),
            "Opened package tree"
        );
        Ok(Self { root, root_manifest })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name declared by the root package.json, if any
    pub fn root_name(&self) -> Option<&str> {
        self.root_manifest.name.as_deref()
    }

    async fn lookup(&self, name: &str) -> RegistryResult<Vec<PackageName>> {
        if self.root_name() == Some(name) {
            return Ok(self.root_manifest.dependency_names());
        }

        let manifest_path = installed_package_dir(&self.root, name)?.join("package.json");
        if !tokio::fs::try_exists(&manifest_path).await.unwrap_or(false) {
            return Err(DepvizError::PackageNotFound {
                name: name.to_string(),
            });
        }
        Ok(PackageManifest::load(&manifest_path).await?.dependency_names())
    }
}

impl PackageSource for ManifestSource {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        match self.lookup(name).await {
            Ok(dependencies) => dependencies,
            Err(DepvizError::PackageNotFound { .. }) => {
                debug!(package = name, "Package is not installed");
                Vec::new()
            }
            Err(error) => {
                warn!(package = name, %error, "Treating unreadable manifest as no dependencies");
                Vec::new()
            }
        }
    }
}
