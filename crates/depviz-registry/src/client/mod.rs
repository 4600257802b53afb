//! HTTP registry client with retry logic

use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use tracing::{debug, warn};
use url::Url;

use depviz_core::error::DepvizError;
use depviz_core::{PackageName, PackageSource};

use crate::api::PackageDocument;
use crate::RegistryResult;

/// Public npm registry used when no URL is configured
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Authentication configuration for registry access
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Bearer token sent with every request
    pub token: Option<String>,
}

/// HTTP client for npm-compatible registries
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Retry configuration
    retry_config: RetryConfig,
    /// Base registry URL, without trailing slash
    base_url: String,
}

impl RegistryClient {
    /// Create a client for the public npm registry
    pub fn new() -> RegistryResult<Self> {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    /// Create a client for a specific registry
    pub fn with_base_url(base_url: &str) -> RegistryResult<Self> {
        Self::with_config(
            base_url,
            AuthConfig::default(),
            RetryConfig::default(),
            Duration::from_secs(30),
        )
    }

    /// Create a client with full configuration
    pub fn with_config(
        base_url: &str,
        auth: AuthConfig,
        retry_config: RetryConfig,
        timeout: Duration,
    ) -> RegistryResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| DepvizError::config("repo_url", format!("'{}' is not a valid URL: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DepvizError::config(
                "repo_url",
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let mut builder = ClientBuilder::new()
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("depviz/", env!("CARGO_PKG_VERSION")));

        if let Some(token) = auth.token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token)
                    .parse()
                    .map_err(|e| DepvizError::network(format!("Invalid auth token: {}", e), e))?,
            );
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| DepvizError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self {
            client,
            retry_config,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute HTTP request with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> RegistryResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = RegistryResult<T>>,
    {
        let mut delay = self.retry_config.initial_delay;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if attempt >= self.retry_config.max_retries || !error.is_recoverable() {
                        return Err(error);
                    }
                    attempt += 1;
                    debug!(attempt, delay_ms = delay.as_millis() as u64, %error, "Retrying registry request");

                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.retry_config.multiplier) as u64,
                        ),
                        self.retry_config.max_delay,
                    );
                }
            }
        }
    }

    /// Fetch the package document with retry logic
    pub async fn fetch_metadata(&self, package_name: &str) -> RegistryResult<PackageDocument> {
        let url = format!("{}/{}", self.base_url, encode_package_name(package_name));
        let url = url.as_str();

        self.with_retry(|| async move {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/vnd.npm.install-v1+json")
                .send()
                .await
                .map_err(|e| DepvizError::network(format!("Failed to fetch metadata: {}", e), e))?;

            match response.status() {
                reqwest::StatusCode::OK => response
                    .json::<PackageDocument>()
                    .await
                    .map_err(|e| DepvizError::JsonParse {
                        message: format!("Malformed registry response for {}: {}", package_name, e),
                    }),
                reqwest::StatusCode::NOT_FOUND => Err(DepvizError::PackageNotFound {
                    name: package_name.to_string(),
                }),
                status => Err(DepvizError::Network {
                    message: format!("Registry returned status {}: {}", status, package_name),
                    source: None,
                }),
            }
        })
        .await
    }

    /// Dependency names of the package's latest version
    pub async fn fetch_dependencies(&self, package_name: &str) -> RegistryResult<Vec<PackageName>> {
        let document = self.fetch_metadata(package_name).await?;
        document
            .latest_dependencies()
            .ok_or_else(|| DepvizError::JsonParse {
                message: format!("{} has no 'latest' version", package_name),
            })
    }
}

impl PackageSource for RegistryClient {
    async fn direct_dependencies(&self, name: &str) -> Vec<PackageName> {
        match self.fetch_dependencies(name).await {
            Ok(dependencies) => dependencies,
            Err(error) => {
                warn!(package = name, %error, "Treating registry lookup failure as no dependencies");
                Vec::new()
            }
        }
    }
}

/// Encode package name for URL (handle scoped packages)
fn encode_package_name(name: &str) -> String {
    if name.starts_with('@') {
        // Scoped package: @org/pkg -> @org%2fpkg
        name.replace('/', "%2f")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests;
