#![no_main]

use kbd_lightning::config::AppConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON must either fail to parse or sanitize into range
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(config) = serde_json::from_str::<AppConfig>(s)
    {
        let device = config.sanitized().device;
        assert!((10..=1000).contains(&device.capture_interval_ms));
        assert!((1.0..=4.0).contains(&device.saturation_boost));
    }
});
