//! Application configuration.
//!
//! Loaded from a TOML file with three optional sections:
//!
//! ```toml
//! [scheduler]
//! horizon_low = 1
//! horizon_high = 100
//! min_gap = 1
//! objective = "satisfy"          # or "minimize_makespan"
//! time_limit_ms = 10000
//!
//! [explainer]
//! base_url = "http://localhost:11434"
//! model = "planning-explainer"
//!
//! [server]
//! bind_addr = "127.0.0.1:8000"
//! ```
//!
//! Missing keys fall back to defaults. Environment variables override
//! the file: `U_SEQUENCE_BIND`, `U_SEQUENCE_OLLAMA_URL`, `U_SEQUENCE_MODEL`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::explain::ExplainerConfig;
use crate::scheduler::SchedulerConfig;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub const ENV_BIND: &str = "U_SEQUENCE_BIND";
pub const ENV_OLLAMA_URL: &str = "U_SEQUENCE_OLLAMA_URL";
pub const ENV_MODEL: &str = "U_SEQUENCE_MODEL";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scheduler: SchedulerConfig,
    pub explainer: ExplainerConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parses TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads from `path` (or defaults), applies environment overrides, validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                debug!(path = %p.display(), "loading config file");
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = non_empty(ENV_BIND) {
            self.server.bind_addr = bind;
        }
        if let Some(url) = non_empty(ENV_OLLAMA_URL) {
            self.explainer.base_url = url;
        }
        if let Some(model) = non_empty(ENV_MODEL) {
            self.explainer.model = model;
        }
    }

    /// Checks every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.explainer.validate().map_err(ConfigError::Invalid)?;
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr is empty".to_string()));
        }
        Ok(())
    }
}
