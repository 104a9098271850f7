// src/core/config_manager.rs
//! Client configuration: config file, then environment variables, then CLI flags

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::api_client::ApiClient;
use crate::core::token_store::FileTokenStore;
use crate::environment::{ConfigSource, EnvironmentConfig};

pub const API_URL_VAR: &str = "RECRUITER_API_URL";
pub const TOKEN_PATH_VAR: &str = "RECRUITER_TOKEN_PATH";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub source: ConfigSource,
}

impl ConfigManager {
    /// Load all configuration layers from the process environment
    pub fn load() -> Result<Self> {
        let (environment, source) = EnvironmentConfig::load()?;
        let config = Self {
            environment,
            source,
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_environment(environment: EnvironmentConfig) -> Self {
        Self {
            environment,
            source: ConfigSource::Provided,
        }
    }

    /// Report where the configuration came from. Call once logging is set up.
    pub fn log_source(&self) {
        info!(
            "Loaded configuration for environment: {}",
            EnvironmentConfig::get_environment()
        );
        match &self.source {
            ConfigSource::File(path) => info!("Configuration file: {}", path.display()),
            ConfigSource::Missing(path) => {
                warn!("{} not found, using default configuration", path.display())
            }
            ConfigSource::Provided => {}
        }
    }

    /// Apply `RECRUITER_API_URL` / `RECRUITER_TOKEN_PATH` through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            self.environment.api_base_url = url;
        }
        if let Some(path) = lookup(TOKEN_PATH_VAR).filter(|v| !v.trim().is_empty()) {
            self.environment.token_path = PathBuf::from(path);
        }
        self
    }

    /// Flags given on the command line win over everything else
    pub fn with_cli_overrides(
        mut self,
        api_url: Option<String>,
        token_path: Option<PathBuf>,
    ) -> Self {
        if let Some(url) = api_url {
            self.environment.api_base_url = url;
        }
        if let Some(path) = token_path {
            self.environment.token_path = path;
        }
        self
    }

    pub fn build_client(&self) -> Result<ApiClient> {
        info!("API base URL: {}", self.environment.api_base_url);
        info!("Token file: {}", self.environment.token_path.display());

        let tokens = Arc::new(FileTokenStore::new(self.environment.token_path.clone()));
        ApiClient::new(&self.environment.api_base_url, tokens)
            .context("Failed to create HTTP client")
    }
}
