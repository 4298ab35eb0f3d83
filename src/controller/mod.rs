//! Color and mode coordination
//!
//! This module carries the application's invariants; the GUI only renders
//! the snapshots it produces and forwards user input.
//!
//! # Overview
//!
//! - `SyncCoordinator`: manual / screen sync state machine, toggle gate, and
//!   the only issuer of device commands
//! - `ColorControls`: manual input paths, gated on the coordinator's mode
//! - `StatusUpdate`: state snapshot plus optional notice, sent to the GUI
//!
//! # Event Flow
//!
//! ```text
//! UI input → ColorControls → (mode gate) → ColorModel
//!                 ↓ confirm
//!          SyncCoordinator → DeviceControl
//!                 ↓
//!            StatusUpdate → GUI
//! ```
//!
//! # Toggle Gate
//!
//! A toggle moves the coordinator to `Pending` before the start or stop
//! command is issued and back to `Idle` once it returns, whatever the result.
//! Toggles arriving while `Pending` are dropped, never queued.

pub mod color_controls;
pub mod sync_coordinator;

pub use color_controls::ColorControls;
pub use sync_coordinator::{
    ApplyOutcome, Notice, NoticeLevel, STATUS_CHANNEL_CAPACITY, StatusUpdate, SyncCoordinator,
    SyncMode, SyncSnapshot, ToggleOutcome, ToggleState, status_channel,
};
