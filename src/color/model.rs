//! Canonical color value and RGB/hex conversions
//!
//! `ColorModel` owns the one canonical [`Color`] plus the text currently shown in
//! the hex field. The two are allowed to diverge while the user is typing: the
//! display text follows every keystroke, the canonical color only changes when
//! the text is a complete `#RRGGBB` value.

use crate::color::presets::Preset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color shown when the application starts
pub const DEFAULT_COLOR: Color = Color::new(0x16, 0x9E, 0x69);

/// Maximum number of characters accepted by the hex field (`#RRGGBB`)
pub const HEX_TEXT_MAX_LEN: usize = 7;

/// An RGB color as sent to the keyboard LEDs
///
/// The hex form is derived, never stored, so the two representations cannot
/// disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

/// One of the three color channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Red
    Red,
    /// Green
    Green,
    /// Blue
    Blue,
}

impl Channel {
    /// Map the channel index used by the UI (0 = red, 1 = green, 2 = blue)
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Red),
            1 => Some(Self::Green),
            2 => Some(Self::Blue),
            _ => None,
        }
    }
}

impl Color {
    /// Creates a color from individual channel values
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical `#RRGGBB` form with uppercase digits
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Strict hex parser: six hex digits with an optional leading `#`, any case
    ///
    /// Returns `None` for anything else. See [`hex_to_rgb`] for the lenient form.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Value of a single channel
    pub const fn channel(self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    /// Copy of this color with one channel replaced
    #[must_use]
    pub const fn with_channel(self, channel: Channel, value: u8) -> Self {
        match channel {
            Channel::Red => Self::new(value, self.g, self.b),
            Channel::Green => Self::new(self.r, value, self.b),
            Channel::Blue => Self::new(self.r, self.g, value),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Lenient hex parser: unparsable input yields black instead of an error
pub fn hex_to_rgb(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or_default()
}

/// Format a triplet as `#RRGGBB`, clamping each channel to 0-255 first
pub fn rgb_to_hex(r: i64, g: i64, b: i64) -> String {
    Color::new(clamp_channel(r), clamp_channel(g), clamp_channel(b)).to_hex()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to 0..=255 before the cast"
)]
fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Parse the leading integer of a numeric field the way browsers do for
/// `parseInt`: optional sign, then digits, trailing text ignored
///
/// Returns 0 when there are no digits. Very long digit runs saturate.
pub fn parse_channel_input(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(digit - b'0'));
    }

    if !seen_digit {
        return 0;
    }
    if negative { -value } else { value }
}

/// Result of feeding text into the hex field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexEdit {
    /// The text was a complete `#RRGGBB` value and is now canonical
    Promoted(Color),
    /// The text is incomplete or invalid; canonical color unchanged
    Pending,
}

/// Immutable view of the color state handed to the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSnapshot {
    /// Canonical color
    pub canonical: Color,
    /// Text shown in the hex field
    pub display_text: String,
}

impl ColorSnapshot {
    /// Canonical hex string
    pub fn hex(&self) -> String {
        self.canonical.to_hex()
    }

    /// Whether the hex field holds text that has not been promoted
    pub fn is_text_pending(&self) -> bool {
        self.display_text != self.canonical.to_hex()
    }
}

/// Owner of the canonical color and the hex field text
#[derive(Debug, Clone)]
pub struct ColorModel {
    canonical: Color,
    display_text: String,
}

impl Default for ColorModel {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR)
    }
}

impl ColorModel {
    /// Create a model whose canonical color and display text agree on `initial`
    pub fn new(initial: Color) -> Self {
        Self {
            canonical: initial,
            display_text: initial.to_hex(),
        }
    }

    /// Current canonical color
    pub fn canonical(&self) -> Color {
        self.canonical
    }

    /// Text shown in the hex field
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Snapshot for rendering
    pub fn snapshot(&self) -> ColorSnapshot {
        ColorSnapshot {
            canonical: self.canonical,
            display_text: self.display_text.clone(),
        }
    }

    /// Set one channel from raw field text
    ///
    /// Non-numeric text counts as 0 and the value is clamped to 0-255. The
    /// other two channels keep their last accepted values.
    pub fn set_channel(&mut self, channel: Channel, raw: &str) -> Color {
        let value = clamp_channel(parse_channel_input(raw));
        self.promote(self.canonical.with_channel(channel, value))
    }

    /// Feed the hex field text
    ///
    /// The text is uppercased, capped at [`HEX_TEXT_MAX_LEN`] characters and
    /// always kept as display text. It only replaces the canonical color when it
    /// is exactly `#` followed by six hex digits.
    pub fn set_from_hex_text(&mut self, raw: &str) -> HexEdit {
        let text: String = raw.to_uppercase().chars().take(HEX_TEXT_MAX_LEN).collect();

        let promoted = text
            .strip_prefix('#')
            .and_then(|_| Color::from_hex(&text));

        self.display_text = text;
        match promoted {
            Some(color) => {
                self.canonical = color;
                HexEdit::Promoted(color)
            }
            None => HexEdit::Pending,
        }
    }

    /// Select a preset swatch
    pub fn set_from_preset(&mut self, preset: &Preset) -> Color {
        self.promote(preset.color)
    }

    /// Set the color chosen with the picker
    pub fn set_from_picker(&mut self, color: Color) -> Color {
        self.promote(color)
    }

    fn promote(&mut self, color: Color) -> Color {
        self.canonical = color;
        self.display_text = color.to_hex();
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::presets::PRESETS;

    #[test]
    fn test_default_color() {
        let model = ColorModel::default();
        assert_eq!(model.canonical(), Color::new(22, 158, 105));
        assert_eq!(model.display_text(), "#169E69");
    }

    #[test]
    fn test_rgb_to_hex_uppercase_and_padded() {
        assert_eq!(rgb_to_hex(59, 130, 246), "#3B82F6");
        assert_eq!(rgb_to_hex(0, 10, 255), "#000AFF");
    }

    #[test]
    fn test_rgb_to_hex_clamps_each_channel() {
        assert_eq!(rgb_to_hex(-20, 300, 128), "#00FF80");
    }

    #[test]
    fn test_hex_to_rgb_accepts_optional_hash_and_any_case() {
        assert_eq!(hex_to_rgb("#3b82f6"), Color::new(59, 130, 246));
        assert_eq!(hex_to_rgb("3B82F6"), Color::new(59, 130, 246));
    }

    #[test]
    fn test_hex_to_rgb_defaults_to_black() {
        for input in ["", "#", "#3B82F", "#3B82F6A", "#GGGGGG", "##3B82F6", " #3B82F6", "+F+F+F"]
        {
            assert_eq!(hex_to_rgb(input), Color::default(), "input {input:?}");
        }
    }

    #[test]
    fn test_parse_channel_input_follows_leading_integer_rules() {
        assert_eq!(parse_channel_input("42"), 42);
        assert_eq!(parse_channel_input("  7"), 7);
        assert_eq!(parse_channel_input("-5"), -5);
        assert_eq!(parse_channel_input("12abc"), 12);
        assert_eq!(parse_channel_input("abc"), 0);
        assert_eq!(parse_channel_input(""), 0);
        assert_eq!(parse_channel_input("-"), 0);
        assert_eq!(parse_channel_input("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn test_set_channel_clamps_and_defaults() {
        let mut model = ColorModel::default();

        assert_eq!(model.set_channel(Channel::Red, "999").r, 255);
        assert_eq!(model.set_channel(Channel::Red, "-5").r, 0);
        assert_eq!(model.set_channel(Channel::Red, "abc").r, 0);
    }

    #[test]
    fn test_set_channel_keeps_other_channels_and_updates_hex() {
        let mut model = ColorModel::default();
        let color = model.set_channel(Channel::Blue, "255");

        assert_eq!(color, Color::new(22, 158, 255));
        assert_eq!(model.display_text(), "#169EFF");
        assert!(!model.snapshot().is_text_pending());
    }

    #[test]
    fn test_partial_hex_text_stays_pending() {
        let mut model = ColorModel::default();

        assert_eq!(model.set_from_hex_text("#3B82F"), HexEdit::Pending);
        assert_eq!(model.canonical(), DEFAULT_COLOR);
        assert_eq!(model.display_text(), "#3B82F");
        assert!(model.snapshot().is_text_pending());

        assert_eq!(
            model.set_from_hex_text("#3B82F6"),
            HexEdit::Promoted(Color::new(59, 130, 246))
        );
        assert_eq!(model.canonical().to_hex(), "#3B82F6");
        assert!(!model.snapshot().is_text_pending());
    }

    #[test]
    fn test_hex_text_is_uppercased() {
        let mut model = ColorModel::default();

        assert_eq!(
            model.set_from_hex_text("#ec4899"),
            HexEdit::Promoted(Color::new(236, 72, 153))
        );
        assert_eq!(model.display_text(), "#EC4899");
    }

    #[test]
    fn test_hex_text_requires_leading_hash() {
        let mut model = ColorModel::default();

        assert_eq!(model.set_from_hex_text("3B82F6"), HexEdit::Pending);
        assert_eq!(model.canonical(), DEFAULT_COLOR);
        assert_eq!(model.display_text(), "3B82F6");
    }

    #[test]
    fn test_hex_text_is_capped_at_field_length() {
        let mut model = ColorModel::default();

        assert_eq!(
            model.set_from_hex_text("#3B82F6FF"),
            HexEdit::Promoted(Color::new(59, 130, 246))
        );
        assert_eq!(model.display_text(), "#3B82F6");
    }

    #[test]
    fn test_invalid_hex_text_keeps_canonical() {
        let mut model = ColorModel::default();
        model.set_from_hex_text("#ZZZZZZ");

        assert_eq!(model.canonical(), DEFAULT_COLOR);
        assert_eq!(model.display_text(), "#ZZZZZZ");
    }

    #[test]
    fn test_preset_and_picker_reset_display_text() {
        let mut model = ColorModel::default();
        model.set_from_hex_text("#12");

        let blue = &PRESETS[1];
        assert_eq!(model.set_from_preset(blue), Color::new(59, 130, 246));
        assert_eq!(model.display_text(), "#3B82F6");

        model.set_from_hex_text("#AB");
        assert_eq!(model.set_from_picker(Color::new(1, 2, 3)), Color::new(1, 2, 3));
        assert_eq!(model.display_text(), "#010203");
    }

    #[test]
    fn test_channel_from_index() {
        assert_eq!(Channel::from_index(0), Some(Channel::Red));
        assert_eq!(Channel::from_index(2), Some(Channel::Blue));
        assert_eq!(Channel::from_index(3), None);
    }

    // Property-based tests using proptest
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn is_hex_color(s: &str) -> bool {
            let digits = s.strip_prefix('#').unwrap_or(s);
            digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
        }

        proptest! {
            /// Property: hex formatting and lenient parsing are inverse for every triplet
            #[test]
            fn hex_round_trips_every_triplet(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let hex = rgb_to_hex(i64::from(r), i64::from(g), i64::from(b));
                prop_assert_eq!(hex_to_rgb(&hex), Color::new(r, g, b));
            }

            /// Property: canonical hex is always `#` plus six uppercase digits
            #[test]
            fn hex_is_always_canonical(r in any::<i64>(), g in any::<i64>(), b in any::<i64>()) {
                let hex = rgb_to_hex(r, g, b);
                prop_assert_eq!(hex.len(), 7);
                prop_assert!(hex.starts_with('#'));
                prop_assert!(hex[1..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            }

            /// Property: anything that is not a hex color parses to black without panicking
            #[test]
            fn non_hex_input_parses_to_black(s in "\\PC{0,10}") {
                prop_assume!(!is_hex_color(&s));
                prop_assert_eq!(hex_to_rgb(&s), Color::default());
            }

            /// Property: channel edits always land inside 0-255
            #[test]
            fn channel_edit_is_clamped(value in any::<i64>()) {
                let mut model = ColorModel::default();
                let color = model.set_channel(Channel::Green, &value.to_string());
                let expected = value.clamp(0, 255);
                prop_assert_eq!(i64::from(color.g), expected);
            }

            /// Property: invalid hex text never changes the canonical color
            #[test]
            fn rejected_hex_text_keeps_canonical(s in "\\PC{0,12}") {
                let mut model = ColorModel::default();
                if model.set_from_hex_text(&s) == HexEdit::Pending {
                    prop_assert_eq!(model.canonical(), DEFAULT_COLOR);
                }
            }
        }
    }
}
