//! Keyboard backlight writer
//!
//! The Avell keyboard exposes its RGB backlight as a multi-color LED class
//! device. Writing `"R G B"` (decimal, space separated) to `multi_intensity`
//! changes the color immediately.

use crate::color::Color;
use crate::error::{LightningError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default sysfs path of the keyboard backlight intensity file
pub const DEFAULT_LED_PATH: &str = "/sys/class/leds/rgb:kbd_backlight/multi_intensity";

/// Anything that can display a color on the keyboard
///
/// The screen color feed writes through this trait so it can run against a
/// recording sink in tests.
pub trait ColorSink: Send + Sync {
    /// Show `color` on the keyboard
    fn write_color(&self, color: Color) -> Result<()>;
}

/// Writes colors to the sysfs LED interface
#[derive(Debug, Clone)]
pub struct LedController {
    path: PathBuf,
}

impl Default for LedController {
    fn default() -> Self {
        Self::new(DEFAULT_LED_PATH)
    }
}

impl LedController {
    /// Create a controller for the given `multi_intensity` file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the intensity file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the intensity file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl ColorSink for LedController {
    fn write_color(&self, color: Color) -> Result<()> {
        // sysfs attributes must not be created; a missing file means no device
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| LightningError::LedControlFailed(Box::new(e)))?;

        let data = format!("{} {} {}", color.r, color.g, color.b);
        file.write_all(data.as_bytes())
            .map_err(|e| LightningError::LedControlFailed(Box::new(e)))?;

        debug!("Wrote keyboard color {} to {}", color, self.path.display());
        Ok(())
    }
}
