//! # Prism DSP
//!
//! Audio feature extraction for interactive exploration: a configurable
//! Butterworth filter chain followed by the usual short-time descriptors, each
//! returned as a time series ready to plot.
//!
//! ## Features
//!
//! - **Filtering**: high-pass, low-pass and band-pass Butterworth stages applied in cascade
//! - **Spectral**: dB spectrogram, MFCC, centroid, bandwidth, contrast, rolloff
//! - **Temporal**: zero-crossing rate, RMS energy
//! - **Tempo**: onset strength, autocorrelation tempogram, per-frame tempo
//!
//! ## Quick Start
//!
//! ```no_run
//! use prism_dsp::{analyze_audio, AnalysisConfig, FeatureKind, FilterSettings};
//!
//! // Load audio samples (mono, f32)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 22050;
//!
//! let result = analyze_audio(
//!     &samples,
//!     sample_rate,
//!     FilterSettings::highpass(80),
//!     AnalysisConfig::default(),
//! )?;
//!
//! if let Some(centroid) = result.get(FeatureKind::SpectralCentroid) {
//!     println!("{}: {:.1} Hz on average", centroid.kind.title(), centroid.mean());
//! }
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Samples → Filter chain → ┬ Spectral (STFT → dB, mel, MFCC, descriptors, contrast)
//!                          │        └ Onset strength → Tempogram, Tempo
//!                          └ Temporal (ZCR, RMS)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::result::{
    AnalysisFlag, AnalysisMetadata, AnalysisResult, FeatureData, FeatureKind, FeatureSeries,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::SampleBuffer;
pub use preprocessing::filter_chain::{FilterSettings, FilterStage};

use features::period::{self, TempoParams};
use features::spectral::{self, SpectralFeatures};
use features::{onset, temporal};

/// Main analysis function
///
/// Filters the samples once, then computes every feature on the filtered
/// signal. Spectral (with onset and tempo) and temporal analyses run in parallel.
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `filters` - Filter chain cutoffs (use `FilterSettings::disabled()` for none)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` with features in the order waveform, spectrogram, MFCC,
/// ZCR, spectral centroid, spectral bandwidth, RMS, spectral contrast,
/// spectral rolloff, then tempo and tempogram when `config.compute_tempo` is set.
///
/// # Errors
///
/// - `AnalysisError::DecodeUnavailable` for an empty buffer or zero sample rate
/// - `AnalysisError::InvalidInput` for an invalid configuration, or when an
///   inner spectral contrast band edge (`contrast_fmin · 2^k`, `k < contrast_bands`)
///   reaches Nyquist. With the default 6 bands from 200 Hz this rejects every
///   sample rate at or below 12800 Hz; lower `contrast_bands` or `contrast_fmin`
///   for such material.
/// - `AnalysisError::InvalidCutoff` for a filter stage that cannot be designed
///
/// # Example
///
/// ```no_run
/// use prism_dsp::{analyze_audio, AnalysisConfig, FilterSettings};
///
/// let samples = vec![0.0f32; 22050 * 5]; // 5 seconds of silence
/// let filters = FilterSettings::disabled();
/// let result = analyze_audio(&samples, 22050, filters, AnalysisConfig::default())?;
/// assert_eq!(result.features.len(), 11);
/// # Ok::<(), prism_dsp::AnalysisError>(())
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    filters: FilterSettings,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting audio analysis: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::DecodeUnavailable(
            "Empty audio samples".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::DecodeUnavailable(
            "Invalid sample rate".to_string(),
        ));
    }

    config.validate()?;

    let buffer = SampleBuffer::new(samples.to_vec(), sample_rate);
    let filtered = preprocessing::filter_chain::run(&buffer, &filters, config.filter_order)?;
    let signal = filtered.buffer.samples();

    let mut flags = Vec::new();
    if signal.len() < config.frame_size {
        log::warn!(
            "Only {} samples for a {}-sample analysis window",
            signal.len(),
            config.frame_size
        );
        flags.push(AnalysisFlag::InsufficientSamples);
    }
    if signal.iter().all(|&x| x == 0.0) {
        log::warn!("Filtered signal is silent");
        flags.push(AnalysisFlag::SilentSignal);
    }

    let (frame_size, hop, center) = (config.frame_size, config.hop_size, config.center);
    let (spectral_result, (zcr, rms)) = rayon::join(
        || spectral_and_tempo(signal, sample_rate, &config),
        || {
            (
                temporal::zero_crossing_rate(signal, frame_size, hop, center),
                temporal::rms(signal, frame_size, hop, center),
            )
        },
    );
    let (spectral, tempo) = spectral_result?;

    let series = |kind, values| FeatureSeries::series(kind, values, hop, sample_rate);
    let matrix =
        |kind, frames: &[Vec<f32>]| FeatureSeries::from_frames(kind, frames, hop, sample_rate);

    let mut features = vec![
        FeatureSeries::series(
            FeatureKind::Waveform,
            filtered.buffer.into_samples(),
            1,
            sample_rate,
        ),
        matrix(FeatureKind::Spectrogram, &spectral.spectrogram_db),
        matrix(FeatureKind::Mfcc, &spectral.mfcc),
        series(FeatureKind::ZeroCrossingRate, zcr),
        series(FeatureKind::SpectralCentroid, spectral.centroid),
        series(FeatureKind::SpectralBandwidth, spectral.bandwidth),
        series(FeatureKind::Rms, rms),
        matrix(FeatureKind::SpectralContrast, &spectral.contrast),
        series(FeatureKind::SpectralRolloff, spectral.rolloff),
    ];

    if let Some((tempo, tempogram)) = tempo {
        features.push(series(FeatureKind::Tempo, tempo));
        features.push(matrix(FeatureKind::Tempogram, &tempogram));
    }

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;
    log::info!(
        "Analysis complete: {} features, {} filter stage(s), {:.2} ms",
        features.len(),
        filtered.stages.len(),
        processing_time_ms
    );

    Ok(AnalysisResult {
        features,
        metadata: AnalysisMetadata {
            duration_seconds: buffer.duration_seconds(),
            sample_rate,
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            filters_applied: filtered.stages,
            flags,
        },
    })
}

/// Per-frame tempo and tempogram, both frame-major
type TempoFeatures = (Vec<f32>, Vec<Vec<f32>>);

fn spectral_and_tempo(
    signal: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<(SpectralFeatures, Option<TempoFeatures>), AnalysisError> {
    let spectral = spectral::analyze_spectral(signal, sample_rate, config)?;

    if !config.compute_tempo {
        return Ok((spectral, None));
    }

    let onset_env = onset::onset_strength(
        &spectral.log_mel,
        config.frame_size,
        config.hop_size,
        config.center,
    );
    let params = TempoParams {
        start_bpm: config.start_bpm,
        std_bpm: config.std_bpm,
        max_tempo: config.max_tempo,
        ac_size_seconds: config.tempo_ac_size_seconds,
        center: config.center,
    };
    let tempo = period::frame_tempo(&onset_env, sample_rate, config.hop_size, &params)?;
    let tempogram =
        period::autocorrelation_tempogram(&onset_env, config.tempogram_win_length, config.center)?;

    log::debug!(
        "Tempo analysis: {} onset frames, tempogram window {}",
        onset_env.len(),
        config.tempogram_win_length
    );

    Ok((spectral, Some((tempo, tempogram))))
}
