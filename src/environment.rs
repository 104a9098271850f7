use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::api_client::DEFAULT_API_BASE_URL;

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".recruiter_token")
}

fn default_log_path() -> PathBuf {
    PathBuf::from("/tmp/recruiter-assist.log")
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_path: default_token_path(),
            log_path: default_log_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: Option<EnvironmentConfig>,
    #[serde(default)]
    production: Option<EnvironmentConfig>,
}

/// Where the loaded configuration came from. Loading happens before the
/// log subscriber exists, so the caller reports this once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// The config file was absent and defaults were used.
    Missing(PathBuf),
    /// Built in code, no file involved.
    Provided,
}

impl EnvironmentConfig {
    /// Load configuration for the current environment from `config.yaml`
    pub fn load() -> Result<(Self, ConfigSource)> {
        Self::load_from_file(Path::new(CONFIG_FILE), &Self::get_environment())
    }

    pub fn get_environment() -> String {
        std::env::var("RECRUITER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// A missing file means defaults; a malformed one is an error.
    pub fn load_from_file(config_path: &Path, environment: &str) -> Result<(Self, ConfigSource)> {
        if !config_path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(config_path.to_path_buf())));
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::from_yaml(&config_content, environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok((config, ConfigSource::File(config_path.to_path_buf())))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        }
        .unwrap_or_default();

        Ok(Self {
            token_path: Self::resolve_path(&env_config.token_path)?,
            ..env_config
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}
