//! Configuration parameters for filtering and feature analysis

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::preprocessing::butterworth::DEFAULT_FILTER_ORDER;

/// Analysis configuration parameters
///
/// Defaults follow the conventional short-time analysis setup (2048-sample Hann
/// window, hop of 512, centered frames) so that every spectral and temporal
/// feature shares one time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Framing
    /// Frame (FFT window) size in samples (default: 2048)
    pub frame_size: usize,

    /// Hop size between frames in samples (default: 512)
    pub hop_size: usize,

    /// Center frames on their timestamps by padding half a frame on each side (default: true)
    pub center: bool,

    // Filtering
    /// Butterworth filter order for every filter stage (default: 5)
    pub filter_order: usize,

    // Spectral features
    /// Number of MFCC coefficients per frame (default: 13)
    pub n_mfcc: usize,

    /// Number of mel bands backing MFCC and onset strength (default: 128)
    pub n_mels: usize,

    /// Fraction of spectral energy below the rolloff frequency (default: 0.85)
    pub rolloff_percent: f32,

    /// Number of octave sub-bands for spectral contrast (default: 6)
    pub contrast_bands: usize,

    /// Lower edge of the first contrast sub-band in Hz (default: 200.0)
    pub contrast_fmin: f32,

    /// Quantile used to pick peak/valley bins per contrast sub-band (default: 0.02)
    pub contrast_quantile: f32,

    /// Dynamic range floor for dB conversions (default: 80.0)
    pub top_db: f32,

    // Tempo
    /// Compute per-frame tempo and tempogram (default: true)
    pub compute_tempo: bool,

    /// Centre of the log-normal tempo prior in BPM (default: 120.0)
    pub start_bpm: f32,

    /// Width of the tempo prior in octaves (default: 1.0)
    pub std_bpm: f32,

    /// Tempi at or above this value are never selected (default: 320.0)
    pub max_tempo: f32,

    /// Autocorrelation window used for tempo estimation, in seconds (default: 8.0)
    pub tempo_ac_size_seconds: f32,

    /// Window length of the tempogram in onset frames (default: 384)
    pub tempogram_win_length: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            center: true,
            filter_order: DEFAULT_FILTER_ORDER,
            n_mfcc: 13,
            n_mels: 128,
            rolloff_percent: 0.85,
            contrast_bands: 6,
            contrast_fmin: 200.0,
            contrast_quantile: 0.02,
            top_db: 80.0,
            compute_tempo: true,
            start_bpm: 120.0,
            std_bpm: 1.0,
            max_tempo: 320.0,
            tempo_ac_size_seconds: 8.0,
            tempogram_win_length: 384,
        }
    }
}

impl AnalysisConfig {
    /// Check parameter ranges before any computation starts
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size must be >= 2, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if self.filter_order == 0 {
            return Err(AnalysisError::InvalidInput(
                "Filter order must be > 0".to_string(),
            ));
        }
        if self.n_mels == 0 || self.n_mfcc == 0 || self.n_mfcc > self.n_mels {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid MFCC setup: n_mfcc={}, n_mels={}",
                self.n_mfcc, self.n_mels
            )));
        }
        if !(self.rolloff_percent > 0.0 && self.rolloff_percent < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Rolloff percent must be in (0, 1), got {}",
                self.rolloff_percent
            )));
        }
        if self.contrast_bands == 0 || self.contrast_fmin <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid contrast setup: bands={}, fmin={}",
                self.contrast_bands, self.contrast_fmin
            )));
        }
        if !(self.contrast_quantile > 0.0 && self.contrast_quantile < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Contrast quantile must be in (0, 1), got {}",
                self.contrast_quantile
            )));
        }
        if self.top_db <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "top_db must be > 0, got {}",
                self.top_db
            )));
        }
        if self.compute_tempo {
            if self.start_bpm <= 0.0 || self.std_bpm <= 0.0 || self.max_tempo <= 0.0 {
                return Err(AnalysisError::InvalidInput(format!(
                    "Invalid tempo prior: start={}, std={}, max={}",
                    self.start_bpm, self.std_bpm, self.max_tempo
                )));
            }
            if self.tempo_ac_size_seconds <= 0.0 || self.tempogram_win_length < 2 {
                return Err(AnalysisError::InvalidInput(format!(
                    "Invalid tempo windows: ac_size={}s, tempogram_win_length={}",
                    self.tempo_ac_size_seconds, self.tempogram_win_length
                )));
            }
        }
        Ok(())
    }
}
