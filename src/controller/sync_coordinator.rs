//! Manual / screen sync mode coordination
//!
//! `SyncCoordinator` owns the mode state machine and is the only component
//! that issues commands to the keyboard. The toggle gate is a check-and-set on
//! `ToggleState` under a mutex; the mutex is released before the device call so
//! snapshots stay readable while a start or stop is in flight.

use crate::color::Color;
use crate::device::DeviceControl;
use crate::error::{LightningError, get_user_friendly_error};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use tracing::{debug, error, info, warn};

/// Capacity of the status channel towards the GUI
pub const STATUS_CHANNEL_CAPACITY: usize = 32;

/// Create the bounded channel carrying `StatusUpdate`s
pub fn status_channel() -> (mpsc::SyncSender<StatusUpdate>, mpsc::Receiver<StatusUpdate>) {
    mpsc::sync_channel(STATUS_CHANNEL_CAPACITY)
}

/// Who decides the keyboard color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// The user picks the color
    #[default]
    Manual,
    /// The screen color feed drives the keyboard
    ScreenCapture,
}

impl SyncMode {
    /// The mode a successful toggle switches to
    pub fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::ScreenCapture,
            Self::ScreenCapture => Self::Manual,
        }
    }
}

/// Whether a mode switch is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleState {
    /// No switch in progress
    #[default]
    Idle,
    /// A start or stop command has been issued and not yet completed
    Pending,
}

/// Immutable view of the coordinator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncSnapshot {
    /// Active mode
    pub mode: SyncMode,
    /// Toggle gate
    pub toggle: ToggleState,
    /// Whether the startup capture status query has completed
    pub resolved: bool,
}

impl SyncSnapshot {
    /// Manual color inputs are honored
    pub fn accepts_manual_edits(&self) -> bool {
        self.resolved && self.mode == SyncMode::Manual
    }

    /// The sync toggle can be clicked
    pub fn toggle_enabled(&self) -> bool {
        self.resolved && self.toggle == ToggleState::Idle
    }

    /// Label of the apply button
    pub fn apply_label(&self) -> &'static str {
        match self.mode {
            SyncMode::Manual => "Apply Configuration",
            SyncMode::ScreenCapture => "Screen Sync Active",
        }
    }
}

/// Severity of a user notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational
    Info,
    /// A device command failed
    Error,
}

/// Non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown in the window
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice with the user-friendly text for `error`
    pub fn from_error(error: &LightningError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: get_user_friendly_error(error),
        }
    }
}

/// State change broadcast to the GUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Coordinator state after the change
    pub sync: SyncSnapshot,
    /// Message to surface, if any
    pub notice: Option<Notice>,
}

/// Result of `SyncCoordinator::request_toggle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Dropped because a switch is already in flight
    Ignored,
    /// Dropped because the startup query has not completed
    NotReady,
    /// The device switched to the given mode
    Switched(SyncMode),
    /// The device command failed; the mode is unchanged
    Failed,
}

/// Result of `SyncCoordinator::apply_color`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The keyboard shows the color
    Applied,
    /// Manual color is not honored right now; no command was issued
    Blocked,
    /// The device command failed
    Failed,
}

/// Resets the toggle gate if the device call never returns normally
struct PendingToggle<'a> {
    state: &'a Mutex<SyncSnapshot>,
    settled: bool,
}

impl PendingToggle<'_> {
    /// Commit the terminal state of the switch
    fn settle(mut self, mode: SyncMode) -> SyncSnapshot {
        self.settled = true;
        let mut state = self.state.lock();
        state.mode = mode;
        state.toggle = ToggleState::Idle;
        *state
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Mode switch aborted, releasing toggle gate");
            self.state.lock().toggle = ToggleState::Idle;
        }
    }
}

/// Mode state machine and sole issuer of device commands
///
/// ```text
/// Manual/Idle --toggle--> Manual/Pending --start ok--> ScreenCapture/Idle
///                                         --start err--> Manual/Idle
/// ScreenCapture/Idle --toggle--> ScreenCapture/Pending --stop ok--> Manual/Idle
///                                                      --stop err--> ScreenCapture/Idle
/// ```
pub struct SyncCoordinator {
    device: Arc<dyn DeviceControl>,
    state: Mutex<SyncSnapshot>,
    status_tx: mpsc::SyncSender<StatusUpdate>,
}

impl SyncCoordinator {
    /// Create an unresolved coordinator
    ///
    /// Call `resolve_initial_mode` before expecting toggles or applies to
    /// take effect.
    pub fn new(device: Arc<dyn DeviceControl>, status_tx: mpsc::SyncSender<StatusUpdate>) -> Self {
        Self {
            device,
            state: Mutex::new(SyncSnapshot::default()),
            status_tx,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> SyncSnapshot {
        *self.state.lock()
    }

    /// Manual color inputs are honored
    pub fn accepts_manual_edits(&self) -> bool {
        self.snapshot().accepts_manual_edits()
    }

    /// Label of the apply button for the current mode
    pub fn apply_label(&self) -> &'static str {
        self.snapshot().apply_label()
    }

    /// Adopt the device's actual feed state at startup
    ///
    /// A failed query resolves to `Manual` and surfaces the error. Calling
    /// this again after resolution only returns the current state.
    pub fn resolve_initial_mode(&self) -> SyncSnapshot {
        if self.state.lock().resolved {
            debug!("Initial mode already resolved");
            return self.snapshot();
        }

        let (mode, notice) = match self.device.is_capture_active() {
            Ok(true) => (SyncMode::ScreenCapture, None),
            Ok(false) => (SyncMode::Manual, None),
            Err(e) => {
                error!("Failed to query screen capture status: {}", e);
                (SyncMode::Manual, Some(Notice::from_error(&e)))
            }
        };

        let snapshot = {
            let mut state = self.state.lock();
            state.mode = mode;
            state.toggle = ToggleState::Idle;
            state.resolved = true;
            *state
        };

        info!("Initial sync mode: {:?}", mode);
        self.send_status_update(snapshot, notice);
        snapshot
    }

    /// Switch between manual and screen sync mode
    ///
    /// Issues exactly one start or stop command. Requests arriving while a
    /// switch is in flight are dropped.
    pub fn request_toggle(&self) -> ToggleOutcome {
        let (from, pending) = {
            let mut state = self.state.lock();
            if !state.resolved {
                debug!("Toggle ignored: initial mode not resolved yet");
                return ToggleOutcome::NotReady;
            }
            if state.toggle == ToggleState::Pending {
                debug!("Toggle ignored: a mode switch is already in flight");
                return ToggleOutcome::Ignored;
            }
            state.toggle = ToggleState::Pending;
            (state.mode, *state)
        };
        self.send_status_update(pending, None);

        let gate = PendingToggle {
            state: &self.state,
            settled: false,
        };

        let result = match from {
            SyncMode::Manual => self.device.start_capture(),
            SyncMode::ScreenCapture => self.device.stop_capture(),
        };

        match result {
            Ok(()) => {
                let to = from.toggled();
                let snapshot = gate.settle(to);
                info!("Sync mode switched: {:?} -> {:?}", from, to);
                self.send_status_update(snapshot, None);
                ToggleOutcome::Switched(to)
            }
            Err(e) => {
                let snapshot = gate.settle(from);
                error!("Failed to switch sync mode from {:?}: {}", from, e);
                self.send_status_update(snapshot, Some(Notice::from_error(&e)));
                ToggleOutcome::Failed
            }
        }
    }

    /// Send `color` to the keyboard if manual color is honored
    pub fn apply_color(&self, color: Color) -> ApplyOutcome {
        let snapshot = self.snapshot();
        if !snapshot.accepts_manual_edits() {
            debug!("Apply blocked in {:?} mode", snapshot.mode);
            return ApplyOutcome::Blocked;
        }

        match self.device.apply_color(color) {
            Ok(()) => {
                info!("Applied keyboard color {}", color);
                ApplyOutcome::Applied
            }
            Err(e) => {
                error!("Failed to apply keyboard color {}: {}", color, e);
                self.send_status_update(self.snapshot(), Some(Notice::from_error(&e)));
                ApplyOutcome::Failed
            }
        }
    }

    /// Re-read the device's feed state and adopt it
    ///
    /// The feed can end on its own (capture error, sink failure). Returns the
    /// new mode when it changed; skipped while unresolved or while a switch is
    /// in flight.
    pub fn resync(&self) -> Option<SyncMode> {
        let before = self.snapshot();
        if !before.resolved || before.toggle == ToggleState::Pending {
            debug!("Resync skipped: {:?}", before);
            return None;
        }

        let active = match self.device.is_capture_active() {
            Ok(active) => active,
            Err(e) => {
                warn!("Failed to query screen capture status: {}", e);
                return None;
            }
        };
        let actual = if active {
            SyncMode::ScreenCapture
        } else {
            SyncMode::Manual
        };

        let snapshot = {
            let mut state = self.state.lock();
            // A toggle may have started while the query ran; it owns the mode
            if state.toggle == ToggleState::Pending || state.mode == actual {
                return None;
            }
            state.mode = actual;
            *state
        };

        info!("Sync mode resynchronized: {:?} -> {:?}", before.mode, actual);
        let notice = (actual == SyncMode::Manual)
            .then(|| Notice::info("Screen color sync stopped"));
        self.send_status_update(snapshot, notice);
        Some(actual)
    }

    fn send_status_update(&self, sync: SyncSnapshot, notice: Option<Notice>) {
        debug!("Sending status update to GUI: {:?}", sync);

        if let Err(e) = self.status_tx.send(StatusUpdate { sync, notice }) {
            warn!("Failed to send status update to GUI: {}", e);
        }
    }
}
