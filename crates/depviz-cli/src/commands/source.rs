//! Package source selection

use camino::Utf8Path;
use depviz_config::SourceConfig;
use depviz_core::error::DepvizResult;
use depviz_core::{PackageName, PackageSource};
use depviz_registry::{AuthConfig, FixtureSource, ManifestSource, RegistryClient, RetryConfig};

/// Whichever source the configuration selected
pub enum AnySource {
    Registry(RegistryClient),
    Fixture(FixtureSource),
    Manifest(ManifestSource),
}

impl PackageSource for AnySource {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        match self {
            AnySource::Registry(source) => source.direct_dependencies(name).await,
            AnySource::Fixture(source) => source.direct_dependencies(name).await,
            AnySource::Manifest(source) => source.direct_dependencies(name).await,
        }
    }
}

/// Open the configured source. Relative paths are taken from `cwd`.
///
/// A test repository is parsed completely here, so a malformed file fails
/// before any exploration starts.
pub async fn open_source(config: &SourceConfig, cwd: &Utf8Path) -> DepvizResult<AnySource> {
    match config {
        SourceConfig::Registry {
            url,
            token,
            timeout,
            max_retries,
        } => {
            let retry = RetryConfig {
                max_retries: *max_retries,
                ..RetryConfig::default()
            };
            let auth = AuthConfig { token: token.clone() };
            Ok(AnySource::Registry(RegistryClient::with_config(url, auth, retry, *timeout)?))
        }
        SourceConfig::Fixture { path } => {
            let path = cwd.join(path);
            Ok(AnySource::Fixture(FixtureSource::load(path.as_std_path()).await?))
        }
        SourceConfig::Manifest { root } => {
            let root = cwd.join(root);
            Ok(AnySource::Manifest(ManifestSource::open(root.into_std_path_buf()).await?))
        }
    }
}
