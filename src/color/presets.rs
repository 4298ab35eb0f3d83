//! Predefined color swatches

use crate::color::model::Color;

/// A named preset color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Name shown as the swatch tooltip
    pub name: &'static str,
    /// Preset color
    pub color: Color,
}

impl Preset {
    /// Canonical hex form of the preset color
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// The ten preset swatches, in display order
pub const PRESETS: [Preset; 10] = [
    Preset { name: "Purple", color: Color::new(0x8B, 0x5C, 0xF6) },
    Preset { name: "Blue", color: Color::new(0x3B, 0x82, 0xF6) },
    Preset { name: "Cyan", color: Color::new(0x06, 0xB6, 0xD4) },
    Preset { name: "Green", color: Color::new(0x10, 0xB9, 0x81) },
    Preset { name: "Yellow", color: Color::new(0xF5, 0x9E, 0x0B) },
    Preset { name: "Orange", color: Color::new(0xF9, 0x73, 0x16) },
    Preset { name: "Red", color: Color::new(0xEF, 0x44, 0x44) },
    Preset { name: "Pink", color: Color::new(0xEC, 0x48, 0x99) },
    Preset { name: "Magenta", color: Color::new(0xD9, 0x46, 0xEF) },
    Preset { name: "White", color: Color::new(0xF3, 0xF4, 0xF6) },
];

/// Look up a preset by name, ignoring case
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Index of the preset matching `color`, used to highlight the selected swatch
pub fn preset_index(color: Color) -> Option<usize> {
    PRESETS.iter().position(|p| p.color == color)
}
