//! Per-frame tempo estimation
//!
//! Picks, for every onset frame, the tempogram lag that maximizes
//! `ln(1 + 1e6·T[lag]) + prior(lag)`, where the prior is log-normal in BPM
//! around `start_bpm` with a width of `std_bpm` octaves. Lags whose tempo is at or
//! above `max_tempo` are never chosen. The result is one BPM value per frame with
//! no aggregation across time.
//!
//! # Example
//!
//! ```no_run
//! use prism_dsp::features::period::tempo::{frame_tempo, TempoParams};
//!
//! let onset_env = vec![0.0f32; 1000];
//! let tempo = frame_tempo(&onset_env, 22050, 512, &TempoParams::default())?;
//! assert_eq!(tempo.len(), 1000);
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```

use super::tempogram::autocorrelation_tempogram;
use crate::error::AnalysisError;

/// Gain inside the log compression of tempogram values
const LOG_COMPRESSION: f32 = 1e6;

/// Parameters of the per-frame tempo estimator
#[derive(Debug, Clone, PartialEq)]
pub struct TempoParams {
    /// Prior centre in BPM (default: 120.0)
    pub start_bpm: f32,
    /// Prior width in octaves (default: 1.0)
    pub std_bpm: f32,
    /// Exclusive upper tempo limit in BPM (default: 320.0)
    pub max_tempo: f32,
    /// Autocorrelation window in seconds (default: 8.0)
    pub ac_size_seconds: f32,
    /// Centre the tempogram windows on their frames (default: true)
    pub center: bool,
}

impl Default for TempoParams {
    fn default() -> Self {
        Self {
            start_bpm: 120.0,
            std_bpm: 1.0,
            max_tempo: 320.0,
            ac_size_seconds: 8.0,
            center: true,
        }
    }
}

/// Tempo in BPM represented by each tempogram lag (`f32::INFINITY` at lag 0)
pub fn tempo_frequencies(n_lags: usize, hop_size: usize, sample_rate: u32) -> Vec<f32> {
    (0..n_lags)
        .map(|lag| {
            if lag == 0 {
                f32::INFINITY
            } else {
                60.0 * sample_rate as f32 / (hop_size * lag) as f32
            }
        })
        .collect()
}

/// Local tempo estimate for every onset frame
///
/// Frames where no lag is admissible report 0.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a zero sample rate or hop size, or
/// an autocorrelation window shorter than two frames.
pub fn frame_tempo(
    onset_env: &[f32],
    sample_rate: u32,
    hop_size: usize,
    params: &TempoParams,
) -> Result<Vec<f32>, AnalysisError> {
    if sample_rate == 0 || hop_size == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Sample rate and hop size must be > 0 (sample_rate={}, hop={})",
            sample_rate, hop_size
        )));
    }

    let win_length =
        (params.ac_size_seconds * sample_rate as f32 / hop_size as f32).floor() as usize;
    if win_length < 2 {
        return Err(AnalysisError::InvalidInput(format!(
            "Tempo window of {:.2}s covers {} frame(s), need at least 2",
            params.ac_size_seconds, win_length
        )));
    }

    if onset_env.is_empty() {
        return Ok(Vec::new());
    }

    let tempogram = autocorrelation_tempogram(onset_env, win_length, params.center)?;
    let bpms = tempo_frequencies(win_length, hop_size, sample_rate);
    let log_prior = log_prior(&bpms, params);

    let tempo: Vec<f32> = tempogram
        .iter()
        .map(|column| {
            let mut best: Option<(usize, f32)> = None;
            for (lag, (&strength, &prior)) in column.iter().zip(log_prior.iter()).enumerate() {
                if prior == f32::NEG_INFINITY {
                    continue;
                }
                // FFT round-off can leave tiny negative correlations
                let score = (LOG_COMPRESSION * strength.max(0.0)).ln_1p() + prior;
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((lag, score));
                }
            }
            best.map(|(lag, _)| bpms[lag]).unwrap_or(0.0)
        })
        .collect();

    log::debug!(
        "Frame tempo: {} frames, win_length={}, median={:.1} BPM",
        tempo.len(),
        win_length,
        median(&tempo)
    );

    Ok(tempo)
}

/// Log-normal prior over lags, `-inf` for lag 0 and tempi at or above `max_tempo`
fn log_prior(bpms: &[f32], params: &TempoParams) -> Vec<f32> {
    let log_start = params.start_bpm.log2();
    // First lag slower than max_tempo; everything before it is excluded
    let max_idx = bpms
        .iter()
        .position(|&bpm| bpm < params.max_tempo)
        .unwrap_or(0);

    bpms.iter()
        .enumerate()
        .map(|(lag, &bpm)| {
            if lag < max_idx || !bpm.is_finite() {
                f32::NEG_INFINITY
            } else {
                -0.5 * ((bpm.log2() - log_start) / params.std_bpm).powi(2)
            }
        })
        .collect()
}

fn median(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted[sorted.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 22050;
    const HOP: usize = 512;

    #[test]
    fn test_tempo_frequencies() {
        let bpms = tempo_frequencies(4, HOP, SR);
        assert!(bpms[0].is_infinite());
        assert!((bpms[1] - 60.0 * 22050.0 / 512.0).abs() < 1e-2);
        assert!((bpms[2] - bpms[1] / 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_prior_excludes_fast_lags() {
        let bpms = tempo_frequencies(344, HOP, SR);
        let prior = log_prior(&bpms, &TempoParams::default());
        for (bpm, p) in bpms.iter().zip(prior.iter()) {
            if *bpm >= 320.0 {
                assert_eq!(*p, f32::NEG_INFINITY);
            }
        }
        // Prior peaks at the lag closest to 120 BPM
        let best = prior
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!((bpms[best] - 120.0).abs() < 3.0);
    }

    #[test]
    fn test_click_track_tempo() {
        // 120 BPM: one click every 0.5 s ≈ 21.5 frames; use an exact 21-frame period
        let period = 21;
        let env: Vec<f32> = (0..1000).map(|i| if i % period == 0 { 1.0 } else { 0.0 }).collect();
        let tempo = frame_tempo(&env, SR, HOP, &TempoParams::default()).unwrap();
        assert_eq!(tempo.len(), 1000);
        let expected = 60.0 * SR as f32 / (HOP * period) as f32;
        let mid = tempo[500];
        assert!((mid - expected).abs() < 1.0, "tempo {} vs {}", mid, expected);
    }

    #[test]
    fn test_silence_falls_back_to_prior() {
        let tempo = frame_tempo(&[0.0; 100], SR, HOP, &TempoParams::default()).unwrap();
        assert!(tempo.iter().all(|&t| (t - 120.0).abs() < 3.0));
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(frame_tempo(&[], SR, HOP, &TempoParams::default()).unwrap().is_empty());
        assert!(frame_tempo(&[1.0], 0, HOP, &TempoParams::default()).is_err());
        let tiny = TempoParams {
            ac_size_seconds: 0.01,
            ..Default::default()
        };
        assert!(frame_tempo(&[1.0], SR, HOP, &tiny).is_err());
    }
}
