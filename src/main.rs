//! `kbd-lightning` - RGB keyboard backlight manager
//!
//! Desktop entry point: window, tray, and the screen color feed for Avell
//! laptops exposing `/sys/class/leds/rgb:kbd_backlight`.

#![expect(
    missing_docs,
    reason = "Slint-generated code from include_modules! lacks doc comments"
)]
#![allow(clippy::unwrap_used)] // Slint-generated code from include_modules! uses .unwrap() extensively

// GUI module is only in the binary, not the library
mod gui;

use anyhow::{Context, Result};
use kbd_lightning::{
    config::ConfigManager,
    controller::{ColorControls, SyncCoordinator, status_channel},
    device::{DeviceControl, HardwareProbe, KeyboardDevice},
    error::get_user_friendly_error,
    utils,
};
use gui::GuiController;
use std::sync::Arc;
use tracing::{error, info, warn};

// Include Slint-generated code
slint::include_modules!();

/// Main entry point for the application
///
/// Initializes logging, enforces a single instance, loads configuration,
/// checks the hardware, and hands over to the GUI event loop.
fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    info!("kbd-lightning v{} starting...", env!("CARGO_PKG_VERSION"));

    // Must happen before touching the keyboard
    let _single_instance_guard = match utils::SingleInstanceGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Single instance check failed: {}", e);
            show_error_and_exit(&get_user_friendly_error(&e));
        }
    };

    info!("Single instance check passed");

    let config = ConfigManager::load().context("Failed to load application configuration")?;

    if config.device.require_supported_hardware {
        if let Err(e) = HardwareProbe::new(&config.device.led_path).check() {
            error!("Hardware check failed: {}", e);
            show_error_and_exit(&get_user_friendly_error(&e));
        }
        info!("Hardware check passed");
    } else {
        warn!("Hardware check disabled by configuration");
    }

    let device: Arc<dyn DeviceControl> = Arc::new(KeyboardDevice::from_settings(&config.device));
    let (status_tx, status_rx) = status_channel();
    let coordinator = Arc::new(SyncCoordinator::new(device, status_tx));
    let controls = Arc::new(ColorControls::new(coordinator));

    let gui_controller =
        GuiController::new(controls, status_rx, config).context("Failed to initialize GUI")?;

    info!("Starting GUI event loop");
    gui_controller
        .run()
        .context("GUI event loop terminated with error")?;

    info!("kbd-lightning shutting down");

    Ok(())
}

/// Print a fatal startup error and exit with status 1
fn show_error_and_exit(message: &str) -> ! {
    eprintln!("kbd-lightning: {message}");
    std::process::exit(1);
}
