//! Keyboard device control
//!
//! This module is the boundary between the color/mode logic and the hardware:
//!
//! - `keyboard`: writes colors to the sysfs LED interface
//! - `capture`: the screen color feed thread
//! - `hardware`: detection of supported laptops
//!
//! The rest of the crate only talks to the `DeviceControl` trait, so tests
//! can substitute a recording mock for the real keyboard.

pub mod capture;
pub mod hardware;
pub mod keyboard;

pub use capture::{
    CaptureEngine, CaptureSettings, Frame, FrameSource, FrameSourceFactory,
    default_frame_source_factory,
};
pub use hardware::HardwareProbe;
pub use keyboard::{ColorSink, DEFAULT_LED_PATH, LedController};

use crate::color::Color;
use crate::config::DeviceSettings;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Commands the application issues to the keyboard
///
/// Every call blocks until the device has completed the operation.
pub trait DeviceControl: Send + Sync {
    /// Whether the screen color feed is currently running (side-effect free)
    fn is_capture_active(&self) -> Result<bool>;

    /// Start the screen color feed
    fn start_capture(&self) -> Result<()>;

    /// Stop the screen color feed
    fn stop_capture(&self) -> Result<()>;

    /// Show a fixed color on the keyboard
    fn apply_color(&self, color: Color) -> Result<()>;
}

/// The real keyboard: sysfs LED writer plus screen color feed
#[derive(Debug)]
pub struct KeyboardDevice {
    led: Arc<LedController>,
    capture: CaptureEngine,
}

impl KeyboardDevice {
    /// Compose a device from an LED writer and a frame source factory
    pub fn new(led: LedController, settings: CaptureSettings, frames: FrameSourceFactory) -> Self {
        let led = Arc::new(led);
        let sink: Arc<dyn ColorSink> = led.clone();
        Self {
            capture: CaptureEngine::new(settings, frames, sink),
            led,
        }
    }

    /// Build the device described by the configuration, capturing the X11 screen
    pub fn from_settings(settings: &DeviceSettings) -> Self {
        let capture = CaptureSettings {
            interval: settings.capture_interval(),
            saturation_boost: settings.saturation_boost,
        };
        info!(
            "Keyboard device at {} (feed interval {:?}, saturation boost {})",
            settings.led_path.display(),
            capture.interval,
            capture.saturation_boost
        );
        Self::new(
            LedController::new(&settings.led_path),
            capture,
            default_frame_source_factory(),
        )
    }

    /// The LED writer
    pub fn led(&self) -> &LedController {
        &self.led
    }
}

impl DeviceControl for KeyboardDevice {
    fn is_capture_active(&self) -> Result<bool> {
        Ok(self.capture.is_active())
    }

    fn start_capture(&self) -> Result<()> {
        info!("Starting screen color feed");
        self.capture.start()
    }

    fn stop_capture(&self) -> Result<()> {
        info!("Stopping screen color feed");
        self.capture.stop()
    }

    fn apply_color(&self, color: Color) -> Result<()> {
        info!("Applying keyboard color {}", color);
        self.led.write_color(color)
    }
}
