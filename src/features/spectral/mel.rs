//! Mel filterbank and log-power conversion
//!
//! Uses the Slaney mel scale (linear below 1 kHz, logarithmic above) and
//! Slaney area normalization, so each triangular filter has unit area in Hz.
//!
//! # Reference
//!
//! Slaney, M. (1998). Auditory Toolbox, Version 2. Interval Research Corporation
//! Technical Report #1998-010.

use super::stft::{clip_top_db, fft_frequencies};

/// Hz per mel in the linear region
const F_SP: f64 = 200.0 / 3.0;

/// Start of the logarithmic region (Hz)
const MIN_LOG_HZ: f64 = 1000.0;

/// Amplitude floor for power-to-dB conversion
pub const POWER_AMIN: f32 = 1e-10;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to Slaney mels
pub fn hz_to_mel(hz: f64) -> f64 {
    let min_log_mel = MIN_LOG_HZ / F_SP;
    if hz >= MIN_LOG_HZ {
        min_log_mel + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mels to Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    let min_log_mel = MIN_LOG_HZ / F_SP;
    if mel >= min_log_mel {
        MIN_LOG_HZ * (log_step() * (mel - min_log_mel)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular mel filterbank, `n_mels × (n_fft / 2 + 1)`
pub fn mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    fmin: f32,
    fmax: f32,
) -> Vec<Vec<f32>> {
    let fft_freqs: Vec<f64> = fft_frequencies(sample_rate, n_fft)
        .into_iter()
        .map(|f| f as f64)
        .collect();

    // n_mels + 2 band edges evenly spaced in mel
    let (mel_min, mel_max) = (hz_to_mel(fmin as f64), hz_to_mel(fmax as f64));
    let edges: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_min + (mel_max - mel_min) * i as f64 / (n_mels + 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
            let enorm = 2.0 / (right - left);
            fft_freqs
                .iter()
                .map(|&f| {
                    let lower = (f - left) / (center - left);
                    let upper = (right - f) / (right - center);
                    (lower.min(upper).max(0.0) * enorm) as f32
                })
                .collect()
        })
        .collect()
}

/// Project power spectra (`[frame][bin]`) onto the filterbank → `[frame][mel]`
pub fn apply_filterbank(power: &[Vec<f32>], filterbank: &[Vec<f32>]) -> Vec<Vec<f32>> {
    power
        .iter()
        .map(|frame| {
            filterbank
                .iter()
                .map(|weights| {
                    weights
                        .iter()
                        .zip(frame.iter())
                        .filter(|(&w, _)| w > 0.0)
                        .map(|(&w, &p)| w * p)
                        .sum()
                })
                .collect()
        })
        .collect()
}

/// Power to dB with unit reference: `10·log10(max(amin, S))`, floored at `peak - top_db`
pub fn power_to_db(power: &[Vec<f32>], amin: f32, top_db: f32) -> Vec<Vec<f32>> {
    let mut db: Vec<Vec<f32>> = power
        .iter()
        .map(|row| row.iter().map(|&p| 10.0 * p.max(amin).log10()).collect())
        .collect();
    clip_top_db(&mut db, top_db);
    db
}
