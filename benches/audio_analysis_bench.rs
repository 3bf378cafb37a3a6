//! Performance benchmarks for audio analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prism_dsp::preprocessing::butterworth::DEFAULT_FILTER_ORDER;
use prism_dsp::preprocessing::filter_chain;
use prism_dsp::{analyze_audio, AnalysisConfig, FilterSettings, SampleBuffer};

const SR: u32 = 22050;

fn test_signal(seconds: usize) -> Vec<f32> {
    (0..SR as usize * seconds)
        .map(|i| {
            let t = i as f32 / SR as f32;
            0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                + 0.25 * (2.0 * std::f32::consts::PI * 3520.0 * t).sin()
        })
        .collect()
}

fn bench_analyze_audio(c: &mut Criterion) {
    let samples = test_signal(30);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_audio_30s", |b| {
        b.iter(|| {
            let _ = analyze_audio(
                black_box(&samples),
                black_box(SR),
                FilterSettings::disabled(),
                black_box(config.clone()),
            );
        });
    });

    let no_tempo = AnalysisConfig {
        compute_tempo: false,
        ..Default::default()
    };
    c.bench_function("analyze_audio_30s_no_tempo", |b| {
        b.iter(|| {
            let _ = analyze_audio(
                black_box(&samples),
                black_box(SR),
                FilterSettings::disabled(),
                black_box(no_tempo.clone()),
            );
        });
    });
}

fn bench_filter_chain(c: &mut Criterion) {
    let buffer = SampleBuffer::new(test_signal(30), SR);
    let settings = FilterSettings {
        highpass: 80,
        lowpass: 8000,
        bandpass_low: 200,
        bandpass_high: 4000,
    };

    c.bench_function("filter_chain_30s_three_stages", |b| {
        b.iter(|| {
            let _ = filter_chain::run(
                black_box(&buffer),
                black_box(&settings),
                DEFAULT_FILTER_ORDER,
            );
        });
    });
}

criterion_group!(benches, bench_analyze_audio, bench_filter_chain);
criterion_main!(benches);
