use std::f64::consts::PI;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nsdf_pitch::{
    config::TrackerConfig,
    detector::{mcleod::McLeodDetector, PitchDetector},
    tracker::PitchTracker,
    utils::peak::choose_key_maximum,
};

pub fn utils_benchmark(c: &mut Criterion) {
    let v = (0..1024)
        .into_iter()
        .map(|v| ((v as f64) / PI / 30.).cos())
        .collect::<Vec<f64>>();
    let vv = v.as_slice();

    c.bench_function("choose_key_maximum", |b| {
        b.iter(|| choose_key_maximum(black_box(vv), 0.8))
    });
}

pub fn pitch_detect_benchmark(c: &mut Criterion) {
    const SAMPLE_RATE: f64 = 44100.0;
    const SIZE: usize = 2048;
    const HOP: usize = 512;

    // Signal coming from some source (microphone, generated, etc...)
    let dt = 1.0 / SAMPLE_RATE;
    let freq = 300.0;
    let signal: Vec<f32> = (0..SIZE)
        .map(|x| (2.0 * PI * x as f64 * dt * freq).sin() as f32)
        .collect();

    let mut mcleod_detector = McLeodDetector::<f32>::new(SIZE);

    c.bench_function("McLeod get_pitch", |b| {
        b.iter(|| {
            mcleod_detector
                .get_pitch(black_box(&signal), SAMPLE_RATE as f32)
                .unwrap()
        });
    });

    let config = TrackerConfig::default()
        .sample_rate(SAMPLE_RATE)
        .window_size(SIZE)
        .hop_size(HOP);
    let mut tracker = PitchTracker::<f32>::new(config).unwrap();
    let block = &signal[..HOP];

    // Once the first window is full, every block of `HOP` samples analyzes one window.
    tracker.feed(&signal);
    c.bench_function("PitchTracker feed", |b| {
        b.iter(|| tracker.feed(black_box(block)));
    });
}

criterion_group!(benches, pitch_detect_benchmark, utils_benchmark);
criterion_main!(benches);
