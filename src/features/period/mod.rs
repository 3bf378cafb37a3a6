//! Periodicity analysis of the onset strength envelope
//!
//! - FFT autocorrelation
//! - Autocorrelation tempogram (lag × time)
//! - Per-frame tempo with a log-normal prior

pub mod autocorrelation;
pub mod tempo;
pub mod tempogram;

pub use tempo::{frame_tempo, tempo_frequencies, TempoParams};
pub use tempogram::autocorrelation_tempogram;
