#![expect(
    clippy::unwrap_used,
    reason = "Test utilities use .unwrap() for brevity"
)]

//! Shared test utilities for `kbd-lightning` unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::color::Color;
use crate::device::{ColorSink, DeviceControl, Frame};
use crate::error::{LightningError, Result, StringError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, mpsc};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `XDG_CONFIG_HOME` environment variable.
static CONFIG_HOME_LOCK: Mutex<()> = Mutex::new(());

/// How long `wait_until` and gates wait before giving up
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Poll `condition` until it holds or the timeout expires
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    condition()
}

/// A BGRA frame filled with one color
pub fn solid_frame(color: Color, width: usize, height: usize) -> Frame {
    let data = [color.b, color.g, color.r, 255].repeat(width * height);
    Frame {
        width,
        height,
        stride: width * 4,
        data,
    }
}

/// RAII guard that points `XDG_CONFIG_HOME` at a temp directory for a test scope
/// and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because other threads
/// may read the environment concurrently. The `CONFIG_HOME_LOCK` mutex serializes
/// every test that touches `XDG_CONFIG_HOME`, and the guard restores the original
/// value on drop (including during a panic).
pub struct ConfigHomeGuard {
    original: Option<std::ffi::OsString>,
    // Held for the lifetime of the guard
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under a global lock"
)]
impl ConfigHomeGuard {
    /// Create a new guard that sets `XDG_CONFIG_HOME` to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        let lock = CONFIG_HOME_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var_os("XDG_CONFIG_HOME");
        // SAFETY: serialized by CONFIG_HOME_LOCK and restored on drop
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under a global lock"
)]
impl Drop for ConfigHomeGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held by this guard
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", original);
            }
        } else {
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }
}

/// Color sink that records every write
#[derive(Default)]
pub struct RecordingSink {
    colors: Mutex<Vec<Color>>,
    fail: bool,
}

impl RecordingSink {
    /// A sink whose writes always fail
    pub fn failing() -> Self {
        Self {
            colors: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Colors written so far
    pub fn colors(&self) -> Vec<Color> {
        self.colors.lock().unwrap().clone()
    }
}

impl ColorSink for RecordingSink {
    fn write_color(&self, color: Color) -> Result<()> {
        if self.fail {
            return Err(LightningError::LedControlFailed(StringError::new(
                "sink unavailable",
            )));
        }
        self.colors.lock().unwrap().push(color);
        Ok(())
    }
}

/// Test side of a held device call, see `RecordingDevice::hold_transitions`
pub struct TransitionGate {
    entered_rx: mpsc::Receiver<()>,
    release_tx: mpsc::Sender<()>,
}

impl TransitionGate {
    /// Block until the device call has been entered
    pub fn wait_entered(&self) {
        self.entered_rx
            .recv_timeout(WAIT_TIMEOUT)
            .expect("device call was never entered");
    }

    /// Let the held device call return
    pub fn release(self) {
        self.release_tx.send(()).unwrap();
    }
}

/// Mock keyboard that counts calls and can be told to fail
#[derive(Default)]
pub struct RecordingDevice {
    capture_active: AtomicBool,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    apply_calls: AtomicUsize,
    applied: Mutex<Vec<Color>>,
    fail_status_query: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
    fail_apply: AtomicBool,
    panic_on_start: AtomicBool,
    gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
}

impl RecordingDevice {
    /// Device whose feed is already running (or not)
    pub fn with_capture_active(active: bool) -> Self {
        let device = Self::default();
        device.set_capture_active(active);
        device
    }

    /// Simulate the feed starting or dying on its own
    pub fn set_capture_active(&self, active: bool) {
        self.capture_active.store(active, Ordering::SeqCst);
    }

    /// Make `is_capture_active` fail
    pub fn fail_status_query(&self, fail: bool) {
        self.fail_status_query.store(fail, Ordering::SeqCst);
    }

    /// Make `start_capture` fail
    pub fn fail_start(&self, fail: bool) {
        self.fail_start.store(fail, Ordering::SeqCst);
    }

    /// Make `stop_capture` fail
    pub fn fail_stop(&self, fail: bool) {
        self.fail_stop.store(fail, Ordering::SeqCst);
    }

    /// Make `apply_color` fail
    pub fn fail_apply(&self, fail: bool) {
        self.fail_apply.store(fail, Ordering::SeqCst);
    }

    /// Make `start_capture` panic
    pub fn panic_on_start(&self, panic: bool) {
        self.panic_on_start.store(panic, Ordering::SeqCst);
    }

    /// Hold the next start, stop, or apply call until the returned gate is released
    pub fn hold_transitions(&self) -> TransitionGate {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.gate.lock().unwrap() = Some((entered_tx, release_rx));
        TransitionGate {
            entered_rx,
            release_tx,
        }
    }

    /// Number of `start_capture` calls
    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    /// Number of `stop_capture` calls
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Number of `apply_color` calls
    pub fn apply_calls(&self) -> usize {
        self.apply_calls.load(Ordering::SeqCst)
    }

    /// Colors successfully applied, in order
    pub fn applied_colors(&self) -> Vec<Color> {
        self.applied.lock().unwrap().clone()
    }

    fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered_tx, release_rx)) = gate {
            entered_tx.send(()).unwrap();
            release_rx.recv_timeout(WAIT_TIMEOUT).unwrap();
        }
    }
}

impl DeviceControl for RecordingDevice {
    fn is_capture_active(&self) -> Result<bool> {
        if self.fail_status_query.load(Ordering::SeqCst) {
            return Err(LightningError::CaptureFailed(StringError::new(
                "status query failed",
            )));
        }
        Ok(self.capture_active.load(Ordering::SeqCst))
    }

    fn start_capture(&self) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate();
        assert!(
            !self.panic_on_start.load(Ordering::SeqCst),
            "device panicked during start"
        );
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(LightningError::CaptureFailed(StringError::new(
                "no display",
            )));
        }
        if self.capture_active.swap(true, Ordering::SeqCst) {
            return Err(LightningError::CaptureAlreadyRunning);
        }
        Ok(())
    }

    fn stop_capture(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate();
        if self.fail_stop.load(Ordering::SeqCst) {
            return Err(LightningError::CaptureFailed(StringError::new(
                "join failed",
            )));
        }
        if !self.capture_active.swap(false, Ordering::SeqCst) {
            return Err(LightningError::CaptureNotRunning);
        }
        Ok(())
    }

    fn apply_color(&self, color: Color) -> Result<()> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate();
        if self.fail_apply.load(Ordering::SeqCst) {
            return Err(LightningError::LedControlFailed(StringError::new(
                "permission denied",
            )));
        }
        self.applied.lock().unwrap().push(color);
        Ok(())
    }
}
