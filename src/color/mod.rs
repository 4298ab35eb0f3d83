//! Color value model
//!
//! This module owns the canonical keyboard color and the conversions between
//! the RGB triplet and the `#RRGGBB` text form.
//!
//! # Overview
//!
//! - `Color`: immutable RGB value; its hex form is always derived
//! - `ColorModel`: canonical color plus the hex field's display text
//! - `PRESETS`: the ten fixed swatches
//!
//! # Input Paths
//!
//! | Input        | Operation                        | Invalid input              |
//! |--------------|----------------------------------|----------------------------|
//! | R/G/B fields | `ColorModel::set_channel`        | treated as 0, then clamped |
//! | Hex field    | `ColorModel::set_from_hex_text`  | kept as pending text       |
//! | Preset       | `ColorModel::set_from_preset`    | n/a                        |
//! | Picker       | `ColorModel::set_from_picker`    | n/a                        |
//!
//! Invalid input is never reported as an error; it is ordinary typing state.

pub mod model;
pub mod presets;

pub use model::{
    Channel, Color, ColorModel, ColorSnapshot, DEFAULT_COLOR, HEX_TEXT_MAX_LEN, HexEdit,
    hex_to_rgb, rgb_to_hex,
};
pub use presets::{PRESETS, Preset, find_preset, preset_index};
