//! `kbd-lightning` - RGB keyboard backlight manager for Linux
//!
//! Sets the color of Avell laptop keyboards either manually or by continuously
//! following the average color of the screen.
//!
//! # Architecture
//!
//! - `color`: canonical color value, RGB/hex conversions, presets
//! - `controller`: `SyncCoordinator` (manual/screen sync state machine) and
//!   `ColorControls` (manual input paths gated on the mode)
//! - `device`: `DeviceControl` boundary, sysfs LED writer, screen color feed,
//!   hardware check
//! - `config`, `utils`: configuration, logging, single instance
//!
//! # Requirements
//!
//! - Kernel LED interface at `/sys/class/leds/rgb:kbd_backlight/multi_intensity`
//! - An X11 session for screen color sync

pub mod color;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{LightningError, Result};
