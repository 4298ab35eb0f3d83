//! Supported hardware detection
//!
//! The keyboard interface is only known to behave on Avell laptops (Storm 450R
//! and siblings), identified through the DMI strings the kernel exports.

use crate::device::keyboard::DEFAULT_LED_PATH;
use crate::error::{LightningError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// DMI product name exported by the kernel
pub const DMI_PRODUCT_NAME_PATH: &str = "/sys/class/dmi/id/product_name";

/// DMI system vendor exported by the kernel
pub const DMI_SYS_VENDOR_PATH: &str = "/sys/class/dmi/id/sys_vendor";

/// Files consulted by the hardware check
#[derive(Debug, Clone)]
pub struct HardwareProbe {
    led_path: PathBuf,
    product_name_path: PathBuf,
    sys_vendor_path: PathBuf,
}

impl Default for HardwareProbe {
    fn default() -> Self {
        Self::new(DEFAULT_LED_PATH)
    }
}

impl HardwareProbe {
    /// Probe using the system DMI files and the given LED path
    pub fn new(led_path: impl Into<PathBuf>) -> Self {
        Self {
            led_path: led_path.into(),
            product_name_path: PathBuf::from(DMI_PRODUCT_NAME_PATH),
            sys_vendor_path: PathBuf::from(DMI_SYS_VENDOR_PATH),
        }
    }

    /// Read DMI strings from another directory instead of `/sys/class/dmi/id`
    #[must_use]
    pub fn with_dmi_dir(mut self, dir: &Path) -> Self {
        self.product_name_path = dir.join("product_name");
        self.sys_vendor_path = dir.join("sys_vendor");
        self
    }

    /// Check that this machine exposes a supported keyboard
    pub fn check(&self) -> Result<()> {
        if !self.led_path.exists() {
            return Err(LightningError::UnsupportedHardware(format!(
                "keyboard backlight interface not found at {}",
                self.led_path.display()
            )));
        }

        let product = read_dmi(&self.product_name_path);
        let vendor = read_dmi(&self.sys_vendor_path);
        debug!("DMI product: {:?}, vendor: {:?}", product, vendor);

        let product_matches = product
            .as_deref()
            .is_some_and(|p| p.contains("avell") || p.contains("storm 450r"));
        let vendor_matches = vendor.as_deref().is_some_and(|v| v.contains("avell"));

        if product_matches || vendor_matches {
            info!("Supported hardware detected");
            Ok(())
        } else {
            Err(LightningError::UnsupportedHardware(format!(
                "unrecognized laptop model (vendor: {}, product: {})",
                vendor.as_deref().unwrap_or("unknown"),
                product.as_deref().unwrap_or("unknown"),
            )))
        }
    }
}

/// Lowercased, trimmed DMI value, or `None` when unreadable
fn read_dmi(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_lowercase())
}
