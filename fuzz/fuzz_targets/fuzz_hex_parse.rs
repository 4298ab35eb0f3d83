#![no_main]

use kbd_lightning::color::{Color, ColorModel, hex_to_rgb};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Lenient parser never panics; strict parser agrees whenever it succeeds
    let lenient = hex_to_rgb(text);
    if let Some(strict) = Color::from_hex(text) {
        assert_eq!(strict, lenient);
        assert_eq!(hex_to_rgb(&strict.to_hex()), strict);
    }

    // Hex field text is capped and uppercased; the canonical hex stays valid
    let mut model = ColorModel::default();
    model.set_from_hex_text(text);
    assert!(model.display_text().chars().count() <= 7);
    assert_eq!(model.snapshot().hex().len(), 7);
});
