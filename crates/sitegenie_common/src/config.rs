//! SiteGenie Configuration
//!
//! Settings file: ~/.config/sitegenie/config.toml (or --config)
//! Environment (a local .env file is loaded first):
//!   GEMINI_API_KEY   - model API credential
//!   DATABASE_PATH    - chat history location (default data/chatbot.db)
//!   SITEGENIE_MODEL  - hosted model name

use crate::gateway::GatewayConfig;
use crate::store::DEFAULT_DATABASE_PATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_MODEL: &str = "SITEGENIE_MODEL";

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when the terminal supports it
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

/// Main SiteGenie configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteGenieConfig {
    #[serde(default)]
    pub model: GatewayConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl SiteGenieConfig {
    /// Default user config path: ~/.config/sitegenie/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sitegenie").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// Priority (highest first):
    /// 1. Environment variables (including those from ./.env)
    /// 2. The explicit file, or the user config file if it exists
    /// 3. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        // A missing .env is the normal case
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::user_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiteGenieConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overlay environment settings. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.model.api_key = Some(key);
        }
        if let Some(path) = get(ENV_DATABASE_PATH) {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model.name = model;
        }
    }
}
