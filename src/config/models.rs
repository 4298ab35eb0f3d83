//! Configuration data models
//!
//! This module defines the data structures used for application configuration.
//! Every section is `#[serde(default)]` so older or hand-edited files with
//! missing fields still load.

use crate::device::keyboard::DEFAULT_LED_PATH;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Allowed screen feed interval in milliseconds
pub const CAPTURE_INTERVAL_RANGE_MS: RangeInclusive<u64> = 10..=1000;

/// Allowed saturation multiplier
pub const SATURATION_BOOST_RANGE: RangeInclusive<f32> = 1.0..=4.0;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Keyboard and screen feed settings
    pub device: DeviceSettings,
    /// User preferences
    pub preferences: UserPreferences,
    /// Window state for persistence
    pub window_state: WindowState,
}

impl AppConfig {
    /// Clamp out-of-range values to their allowed ranges
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.device = self.device.sanitized();
        self
    }
}

/// Keyboard device and screen feed settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// sysfs `multi_intensity` file of the keyboard backlight
    pub led_path: PathBuf,
    /// Screen feed update interval in milliseconds (10-1000)
    pub capture_interval_ms: u64,
    /// Saturation multiplier for the screen feed (1.0-4.0)
    pub saturation_boost: f32,
    /// Refuse to start on laptops other than Avell models
    pub require_supported_hardware: bool,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            led_path: PathBuf::from(DEFAULT_LED_PATH),
            capture_interval_ms: 50,
            saturation_boost: 1.85,
            require_supported_hardware: true,
        }
    }
}

impl DeviceSettings {
    /// Clamp out-of-range values to their allowed ranges
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.capture_interval_ms = self.capture_interval_ms.clamp(
            *CAPTURE_INTERVAL_RANGE_MS.start(),
            *CAPTURE_INTERVAL_RANGE_MS.end(),
        );
        self.saturation_boost = if self.saturation_boost.is_nan() {
            Self::default().saturation_boost
        } else {
            self.saturation_boost.clamp(
                *SATURATION_BOOST_RANGE.start(),
                *SATURATION_BOOST_RANGE.end(),
            )
        };
        self
    }

    /// Screen feed interval as a `Duration`
    pub fn capture_interval(&self) -> Duration {
        Duration::from_millis(self.capture_interval_ms)
    }
}

/// User preferences and settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Start hidden in the tray instead of showing the window
    pub start_minimized_to_tray: bool,
    /// Hide to the tray when the window is closed instead of quitting
    pub minimize_to_tray_on_close: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            start_minimized_to_tray: false,
            minimize_to_tray_on_close: true,
        }
    }
}

/// Window size persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowState {
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            width: 420,
            height: 640,
        }
    }
}
