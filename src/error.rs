//! Error types for `kbd-lightning`
//!
//! This module defines all error types used throughout the application,
//! providing clear error messages and proper error propagation.
//!
//! Error variants use `#[source]` to preserve error chains so the log shows
//! the underlying I/O or capture failure next to the user-facing message.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `kbd-lightning`
#[derive(Debug, Error)]
pub enum LightningError {
    /// The machine does not expose a supported keyboard backlight
    #[error("Unsupported hardware: {0}")]
    UnsupportedHardware(String),

    /// Writing a color to the keyboard LED interface failed
    #[error("Failed to update keyboard color: {0}")]
    LedControlFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A start was requested while the screen color feed is running
    #[error("Screen capture is already running")]
    CaptureAlreadyRunning,

    /// A stop was requested while no screen color feed is running
    #[error("Screen capture is not running")]
    CaptureNotRunning,

    /// The screen color feed could not be started, failed, or panicked
    #[error("Screen capture failed: {0}")]
    CaptureFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Another instance holds the single-instance lock
    #[error("Another instance of kbd-lightning is already running")]
    AlreadyRunning,

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `kbd-lightning` operations
pub type Result<T> = std::result::Result<T, LightningError>;

/// Convert an error to a user-friendly message
///
/// Used for the non-blocking notice line in the window and for the fatal
/// startup message printed before exit.
pub fn get_user_friendly_error(error: &LightningError) -> String {
    match error {
        LightningError::UnsupportedHardware(reason) => format!(
            "This application only works on Avell notebooks or the Avell Storm 450r.\n\n\
             {reason}\n\n\
             If your laptop exposes the same keyboard LED interface, set\n\
             \"require_supported_hardware\": false in the configuration file."
        ),
        LightningError::LedControlFailed(e) => format!(
            "Unable to update the keyboard color: {e}\n\n\
             Please ensure you have write permission to the keyboard LED file."
        ),
        LightningError::CaptureAlreadyRunning => "Screen color sync is already running.".to_string(),
        LightningError::CaptureNotRunning => "Screen color sync is not running.".to_string(),
        LightningError::CaptureFailed(e) => format!(
            "Screen color sync failed: {e}\n\n\
             Screen capture requires an X11 session."
        ),
        LightningError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to:\n\
             ~/.config/kbd-lightning"
            .to_string(),
        LightningError::AlreadyRunning => "kbd-lightning is already running.\n\n\
             Check the system tray for the keyboard icon."
            .to_string(),
        LightningError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        LightningError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The application will use default settings."
            )
        }
    }
}
