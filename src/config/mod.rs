//! Configuration management module
//!
//! This module handles loading, saving, and managing application configuration.
//! Configuration is stored in `$XDG_CONFIG_HOME/kbd-lightning/config.json`
//! with atomic writes to prevent corruption. The keyboard color itself is
//! never persisted.

pub mod manager;
pub mod models;

pub use manager::ConfigManager;
pub use models::{AppConfig, DeviceSettings, UserPreferences, WindowState};
