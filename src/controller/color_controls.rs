//! Color control surface logic
//!
//! Routes every manual input path through the coordinator's mode gate before
//! it may touch the color model. While screen sync is active, or before the
//! startup query has resolved, all edits are inert and return `None`.

use crate::color::{Channel, Color, ColorModel, ColorSnapshot, HexEdit, PRESETS, preset_index};
use crate::controller::sync_coordinator::{ApplyOutcome, SyncCoordinator};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Manual color inputs and the apply command
///
/// The model sits behind its own lock so `confirm` can run on a worker thread
/// without blocking edits from the UI thread during the device call.
pub struct ColorControls {
    coordinator: Arc<SyncCoordinator>,
    model: Mutex<ColorModel>,
}

impl ColorControls {
    /// Controls starting at the default color `#169E69`
    pub fn new(coordinator: Arc<SyncCoordinator>) -> Self {
        Self {
            coordinator,
            model: Mutex::new(ColorModel::default()),
        }
    }

    /// The coordinator gating these controls
    pub fn coordinator(&self) -> &Arc<SyncCoordinator> {
        &self.coordinator
    }

    /// Current color state
    pub fn snapshot(&self) -> ColorSnapshot {
        self.model.lock().snapshot()
    }

    /// Current canonical color
    pub fn canonical(&self) -> Color {
        self.model.lock().canonical()
    }

    /// R, G or B field edited
    pub fn edit_channel(&self, channel: Channel, raw: &str) -> Option<ColorSnapshot> {
        self.edit(|model| {
            model.set_channel(channel, raw);
        })
    }

    /// Hex field edited
    ///
    /// Incomplete text is kept for display without changing the color.
    pub fn edit_hex_text(&self, raw: &str) -> Option<ColorSnapshot> {
        self.edit(|model| {
            if model.set_from_hex_text(raw) == HexEdit::Pending {
                debug!("Hex text {:?} kept pending", model.display_text());
            }
        })
    }

    /// Preset swatch clicked; an unknown index is ignored
    pub fn select_preset(&self, index: usize) -> Option<ColorSnapshot> {
        let preset = PRESETS.get(index)?;
        self.edit(|model| {
            model.set_from_preset(preset);
        })
    }

    /// Color chosen with the picker
    pub fn pick_color(&self, color: Color) -> Option<ColorSnapshot> {
        self.edit(|model| {
            model.set_from_picker(color);
        })
    }

    /// Send the canonical color to the keyboard
    ///
    /// Returns the color that was sent along with the outcome; later edits do
    /// not change what this call applied.
    pub fn confirm(&self) -> (Color, ApplyOutcome) {
        let color = self.canonical();
        (color, self.coordinator.apply_color(color))
    }

    /// Index of the preset matching the canonical color
    pub fn selected_preset(&self) -> Option<usize> {
        preset_index(self.canonical())
    }

    fn edit(&self, apply: impl FnOnce(&mut ColorModel)) -> Option<ColorSnapshot> {
        if !self.coordinator.accepts_manual_edits() {
            debug!("Manual color edit ignored: {:?}", self.coordinator.snapshot());
            return None;
        }

        let mut model = self.model.lock();
        apply(&mut model);
        Some(model.snapshot())
    }
}
