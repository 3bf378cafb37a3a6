//! Feature extraction modules
//!
//! This module contains all feature extraction algorithms:
//! - Spectral features (spectrogram, MFCC, centroid, bandwidth, contrast, rolloff)
//! - Temporal features (zero-crossing rate, RMS)
//! - Onset strength
//! - Periodicity (tempogram, per-frame tempo)

pub mod onset;
pub mod period;
pub mod spectral;
pub mod temporal;
