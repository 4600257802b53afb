//! Configuration layering, file discovery, and environment overrides

use std::collections::HashMap;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use depviz_core::error::DepvizError;
use crate::{ConfigResult, toml::DepvizToml};

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "depviz.toml";

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "DEPVIZ_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
}

/// Configuration layering and merging
pub struct ConfigLayering;

/// Where a configuration layer came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// Project depviz.toml file
    Project(Utf8PathBuf),
    /// File passed with --config
    Explicit(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        Self { cwd }
    }

    /// Loader rooted at the process working directory
    pub fn from_current_dir() -> ConfigResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| DepvizError::io("Failed to read current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|e| {
            DepvizError::config("cwd", format!("Working directory is not valid UTF-8: {}", e))
        })?;
        Ok(Self::new(cwd))
    }

    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Find the nearest depviz.toml, walking up the directory tree
    pub fn find_project_config(&self) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load the project configuration if one exists
    pub async fn load_project_config(&self) -> ConfigResult<Option<(DepvizToml, ConfigSource)>> {
        match self.find_project_config() {
            Some(path) => {
                debug!(path = %path, "Loading project configuration");
                let config = crate::toml::load_from_file(&path).await?;
                Ok(Some((config, ConfigSource::Project(path))))
            }
            None => Ok(None),
        }
    }

    /// Load a configuration file named explicitly; it must exist
    pub async fn load_explicit_config(&self, path: &Utf8Path) -> ConfigResult<(DepvizToml, ConfigSource)> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };
        debug!(path = %path, "Loading configuration file");
        let config = crate::toml::load_from_file(&path).await?;
        Ok((config, ConfigSource::Explicit(path)))
    }

    /// Path of the global configuration file
    pub fn global_config_path() -> ConfigResult<Utf8PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| DepvizError::config("home_dir", "Could not determine home directory"))?;

        Ok(Utf8PathBuf::try_from(home_dir)
            .map_err(|e| DepvizError::config("home_dir", format!("Invalid home directory path: {}", e)))?
            .join(".depviz")
            .join("config.toml"))
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(DepvizToml, ConfigSource)>> {
        let global_config_path = match Self::global_config_path() {
            Ok(path) => path,
            Err(error) => {
                debug!(%error, "Skipping global configuration");
                return Ok(None);
            }
        };

        if global_config_path.is_file() {
            debug!(path = %global_config_path, "Loading global configuration");
            let config = crate::toml::load_from_file(&global_config_path).await?;
            Ok(Some((config, ConfigSource::Global(global_config_path))))
        } else {
            Ok(None)
        }
    }

    /// Load every layer and merge them.
    ///
    /// An explicit `--config` file takes the place of the discovered project
    /// file. Returns the merged configuration and the layers that contributed.
    pub async fn load_layered(
        &self,
        explicit: Option<&Utf8Path>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: DepvizToml,
    ) -> ConfigResult<(DepvizToml, Vec<ConfigSource>)> {
        let mut sources = Vec::new();

        let global = self.load_global_config().await?.map(|(config, source)| {
            sources.push(source);
            config
        });

        let project = match explicit {
            Some(path) => Some(self.load_explicit_config(path).await?),
            None => self.load_project_config().await?,
        }
        .map(|(config, source)| {
            sources.push(source);
            config
        });

        let mut env_keys: Vec<&String> = env_overrides.keys().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(|key| ConfigSource::Environment(key.clone())));

        if cli_overrides != DepvizToml::default() {
            sources.push(ConfigSource::CommandLine);
        }

        let merged = ConfigLayering::merge_configs(global, project, env_overrides, cli_overrides)?;
        Ok((merged, sources))
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Global(path) => write!(f, "global {}", path),
            ConfigSource::Project(path) => write!(f, "project {}", path),
            ConfigSource::Explicit(path) => write!(f, "file {}", path),
            ConfigSource::Environment(key) => write!(f, "env {}", key),
            ConfigSource::CommandLine => write!(f, "command line"),
        }
    }
}

impl ConfigLayering {
    /// Merge configuration layers, lowest priority first:
    /// global file, project file, environment, command line
    pub fn merge_configs(
        global_config: Option<DepvizToml>,
        project_config: Option<DepvizToml>,
        env_overrides: &HashMap<String, String>,
        cli_overrides: DepvizToml,
    ) -> ConfigResult<DepvizToml> {
        let mut merged = global_config.unwrap_or_default();

        if let Some(project) = project_config {
            merged = merged.merge(project);
        }

        Self::apply_env_overrides(&mut merged, env_overrides)?;

        Ok(merged.merge(cli_overrides))
    }

    /// Apply `DEPVIZ_*` environment variable overrides
    pub fn apply_env_overrides(config: &mut DepvizToml, overrides: &HashMap<String, String>) -> ConfigResult<()> {
        for (key, value) in overrides {
            match key.as_str() {
                "DEPVIZ_PACKAGE" => {
                    config.analysis.package = Some(value.clone());
                }
                "DEPVIZ_MAX_DEPTH" => {
                    config.analysis.max_depth = Some(value.trim().parse().map_err(|e| {
                        DepvizError::config(key, format!("'{}' is not a number: {}", value, e))
                    })?);
                }
                "DEPVIZ_FILTER" => {
                    config.analysis.filter = Some(value.clone());
                }
                "DEPVIZ_REPO_URL" => {
                    config.source.repo_url = Some(value.clone());
                }
                "DEPVIZ_REPO_PATH" => {
                    config.source.repo_path = Some(value.clone());
                }
                "DEPVIZ_TEST_REPO" => {
                    config.source.test_repo = Some(parse_bool(key, value)?);
                }
                "DEPVIZ_OUTPUT" => {
                    config.output.file = Some(value.clone());
                }
                "DEPVIZ_TOKEN" => {
                    config.source.token = Some(value.clone());
                }
                _ => {
                    // Unknown environment variable, ignore
                }
            }
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        Self::collect_overrides_from(std::env::vars())
    }

    /// Keep only `DEPVIZ_*` entries
    pub fn collect_overrides_from(vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
        vars.into_iter()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(DepvizError::config(key, format!("'{}' is not a boolean", other))),
    }
}
