//! Configuration manager for loading and saving application configuration
//!
//! This module provides functionality to load and save configuration to
//! `$XDG_CONFIG_HOME/kbd-lightning/config.json` with atomic writes to prevent
//! corruption.

use crate::config::models::AppConfig;
use crate::error::{LightningError, Result, StringError};
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    ///
    /// Returns `$XDG_CONFIG_HOME/kbd-lightning/config.json`, falling back to
    /// `$HOME/.config` and finally the working directory.
    pub fn get_config_path() -> PathBuf {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("kbd-lightning").join("config.json")
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_path = Self::get_config_path();
        let config_dir = config_path
            .parent()
            .ok_or_else(|| LightningError::ConfigError(StringError::new("Invalid config path")))?;

        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist or is corrupt, returns default
    /// configuration. Out-of-range values are clamped.
    pub fn load() -> Result<AppConfig> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            info!(
                "Configuration file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(AppConfig::default());
        }

        let json = std::fs::read_to_string(&config_path)?;

        match serde_json::from_str::<AppConfig>(&json) {
            Ok(config) => {
                info!("Configuration loaded from {}", config_path.display());
                Ok(config.sanitized())
            }
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Save configuration to disk with atomic write
    ///
    /// Uses a temporary file and rename to ensure atomic write operation.
    pub fn save(config: &AppConfig) -> Result<()> {
        let config_path = Self::get_config_path();
        let config_dir = Self::ensure_config_dir()?;

        // Atomic write: write to temp file, then rename
        let temp_path = config_dir.join("config.json.tmp");
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&temp_path, json)?;
        std::fs::rename(temp_path, config_path)?;

        info!("Configuration saved successfully");
        Ok(())
    }
}
