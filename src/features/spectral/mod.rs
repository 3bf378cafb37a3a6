//! Frequency-domain features
//!
//! Every feature here derives from one STFT so they share a time axis:
//! - Spectrogram in dB (relative to its peak)
//! - MFCC
//! - Spectral centroid, bandwidth, rolloff
//! - Spectral contrast
//!
//! The log-power mel spectrogram computed for MFCC is also exposed for onset
//! strength estimation.

pub mod contrast;
pub mod descriptors;
pub mod mel;
pub mod mfcc;
pub mod stft;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

use stft::Stft;

/// Amplitude floor for the dB spectrogram
const AMPLITUDE_AMIN: f32 = 1e-5;

/// Exponent of the bandwidth deviation
const BANDWIDTH_POWER: f32 = 2.0;

/// Spectral features, each frame-major (`[frame][...]`)
#[derive(Debug, Clone)]
pub struct SpectralFeatures {
    /// Magnitude spectrogram in dB, `[frame][bin]`
    pub spectrogram_db: Vec<Vec<f32>>,
    /// `[frame][coefficient]`
    pub mfcc: Vec<Vec<f32>>,
    /// Hz per frame
    pub centroid: Vec<f32>,
    /// Hz per frame
    pub bandwidth: Vec<f32>,
    /// `[frame][band]`, dB
    pub contrast: Vec<Vec<f32>>,
    /// Hz per frame
    pub rolloff: Vec<f32>,
    /// Log-power mel spectrogram, `[frame][mel]`, dB
    pub log_mel: Vec<Vec<f32>>,
}

/// Run all spectral analyses on `samples`
///
/// # Errors
///
/// Returns `AnalysisError` for invalid framing parameters or a contrast band
/// layout that does not fit below Nyquist.
pub fn analyze_spectral(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<SpectralFeatures, AnalysisError> {
    let n_fft = config.frame_size;
    let stft = Stft::compute(samples, n_fft, config.hop_size, config.center)?;
    let magnitudes = stft.magnitudes();
    let frequencies = stft::fft_frequencies(sample_rate, n_fft);

    if stft.n_frames() == 0 {
        log::warn!(
            "Signal of {} samples shorter than one {}-sample window, spectral features are empty",
            samples.len(),
            n_fft
        );
    }

    let spectrogram_db = stft::amplitude_to_db(magnitudes, AMPLITUDE_AMIN, config.top_db);

    let filterbank = mel::mel_filterbank(
        sample_rate,
        n_fft,
        config.n_mels,
        0.0,
        sample_rate as f32 / 2.0,
    );
    let mel_power = mel::apply_filterbank(&stft.power(), &filterbank);
    let log_mel = mel::power_to_db(&mel_power, mel::POWER_AMIN, config.top_db);
    let mfcc = mfcc::mfcc_from_log_mel(&log_mel, config.n_mfcc);

    let centroid = descriptors::spectral_centroid(magnitudes, &frequencies);
    let bandwidth = descriptors::spectral_bandwidth(magnitudes, &frequencies, BANDWIDTH_POWER);
    let rolloff = descriptors::spectral_rolloff(magnitudes, &frequencies, config.rolloff_percent);
    let contrast = contrast::spectral_contrast(
        magnitudes,
        &frequencies,
        sample_rate,
        config.contrast_bands,
        config.contrast_fmin,
        config.contrast_quantile,
        config.top_db,
    )?;

    log::debug!(
        "Spectral analysis: {} frames, {} bins, {} mels, {} MFCC",
        stft.n_frames(),
        stft.n_bins(),
        config.n_mels,
        config.n_mfcc
    );

    Ok(SpectralFeatures {
        spectrogram_db,
        mfcc,
        centroid,
        bandwidth,
        contrast,
        rolloff,
        log_mel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect()
    }

    #[test]
    fn test_shapes_are_aligned() {
        let config = AnalysisConfig::default();
        let features = analyze_spectral(&sine(440.0, 22050, 22050), 22050, &config).unwrap();
        let n = 44;
        assert_eq!(features.spectrogram_db.len(), n);
        assert_eq!(features.mfcc.len(), n);
        assert_eq!(features.centroid.len(), n);
        assert_eq!(features.bandwidth.len(), n);
        assert_eq!(features.contrast.len(), n);
        assert_eq!(features.rolloff.len(), n);
        assert_eq!(features.log_mel.len(), n);
        assert_eq!(features.mfcc[0].len(), 13);
        assert_eq!(features.contrast[0].len(), 7);
        assert_eq!(features.log_mel[0].len(), 128);
    }

    #[test]
    fn test_sine_centroid() {
        let config = AnalysisConfig::default();
        let features = analyze_spectral(&sine(440.0, 22050, 22050), 22050, &config).unwrap();
        let c = features.centroid[20];
        assert!((c - 440.0).abs() / 440.0 < 0.05, "centroid {}", c);
        assert!(features.rolloff[20] < 1000.0);
    }

    #[test]
    fn test_short_uncentered_signal_is_empty() {
        let config = AnalysisConfig {
            center: false,
            ..Default::default()
        };
        let features = analyze_spectral(&[0.1; 500], 22050, &config).unwrap();
        assert!(features.spectrogram_db.is_empty());
        assert!(features.mfcc.is_empty());
        assert!(features.contrast.is_empty());
    }
}
