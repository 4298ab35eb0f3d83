#![allow(clippy::unwrap_used)]
//! Benchmarks for color parsing, formatting, and the hex field path

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use kbd_lightning::color::{Channel, Color, ColorModel, PRESETS, hex_to_rgb, rgb_to_hex};
use kbd_lightning::device::capture::boost_saturation;
use std::hint::black_box;

fn bench_hex_parsing(c: &mut Criterion) {
    let inputs = ["#169E69", "3b82f6", "#3B82F", "not a color", "#GGGGGG"];

    c.bench_function("hex_to_rgb", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(hex_to_rgb(black_box(input)));
            }
        });
    });

    c.bench_function("color_from_hex_strict", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(Color::from_hex(black_box(input)));
            }
        });
    });
}

fn bench_hex_formatting(c: &mut Criterion) {
    c.bench_function("rgb_to_hex", |b| {
        b.iter(|| black_box(rgb_to_hex(black_box(59), black_box(130), black_box(246))));
    });
}

fn bench_model_edits(c: &mut Criterion) {
    // Typing "#3b82f6" one character at a time
    let keystrokes: Vec<String> = (1..=7).map(|n| "#3b82f6"[..n].to_string()).collect();

    c.bench_function("hex_field_typing", |b| {
        b.iter(|| {
            let mut model = ColorModel::default();
            for text in &keystrokes {
                black_box(model.set_from_hex_text(black_box(text)));
            }
            black_box(model.canonical());
        });
    });

    c.bench_function("channel_edits", |b| {
        b.iter(|| {
            let mut model = ColorModel::default();
            model.set_channel(Channel::Red, black_box("999"));
            model.set_channel(Channel::Green, black_box("12abc"));
            model.set_channel(Channel::Blue, black_box("-5"));
            black_box(model.snapshot());
        });
    });

    c.bench_function("preset_selection", |b| {
        b.iter(|| {
            let mut model = ColorModel::default();
            for preset in &PRESETS {
                black_box(model.set_from_preset(preset));
            }
        });
    });
}

fn bench_saturation_boost(c: &mut Criterion) {
    let colors: Vec<Color> = (0u8..=255)
        .step_by(17)
        .map(|v| Color::new(v, 255 - v, v / 2))
        .collect();

    c.bench_function("boost_saturation", |b| {
        b.iter(|| {
            for color in &colors {
                black_box(boost_saturation(black_box(*color), 1.85));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_hex_parsing,
    bench_hex_formatting,
    bench_model_edits,
    bench_saturation_boost
);
criterion_main!(benches);
