//! Configuration management for ragdesk
//!
//! Handles loading, saving, and validating configuration from TOML files.
//! The API endpoint itself is not configured here: it lives in the
//! settings store (see [`crate::settings`]).

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client configuration
    #[serde(default)]
    pub client: ClientConfig,

    /// Document listing and details configuration
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Document pages configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Documents per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Delay before the one-shot refresh after reprocessing
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

/// Search page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default number of results
    #[serde(default = "default_search_limit")]
    pub default_limit: u32,

    /// Characters of chunk text shown per result
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Scores at or above this are shown as high relevance
    #[serde(default = "default_high_score")]
    pub high_score: f64,

    /// Scores at or above this are shown as medium relevance
    #[serde(default = "default_medium_score")]
    pub medium_score: f64,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for ragdesk data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to the persisted settings (API endpoint)
    pub settings_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            refresh_delay_ms: default_refresh_delay_ms(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_search_limit(),
            preview_chars: default_preview_chars(),
            high_score: default_high_score(),
            medium_score: default_medium_score(),
        }
    }
}

impl Config {
    /// Get the default base directory for ragdesk (~/.ragdesk)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ragdesk")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    fn paths_for(config_file: &Path) -> PathsConfig {
        let base = config_file.parent().unwrap_or(Path::new(".")).to_path_buf();
        PathsConfig {
            config_file: config_file.to_path_buf(),
            settings_file: base.join(default_settings_file_name()),
            base_dir: base,
        }
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.paths = Self::paths_for(config_path);

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `config_path` (or the default location),
    /// falling back to defaults when the file does not exist.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            return Self::load(&config_path);
        }

        debug!("No config file at {:?}, using defaults", config_path);
        Ok(Config {
            paths: Self::paths_for(&config_path),
            ..Config::default()
        })
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.documents.page_size == 0 {
            return Err(Error::Config(
                "documents.page_size must be positive".to_string(),
            ));
        }

        if self.search.default_limit == 0 {
            return Err(Error::Config(
                "search.default_limit must be positive".to_string(),
            ));
        }

        if self.search.medium_score > self.search.high_score {
            return Err(Error::Config(
                "search.medium_score must be <= search.high_score".to_string(),
            ));
        }

        Ok(())
    }
}
