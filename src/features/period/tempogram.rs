//! Autocorrelation tempogram
//!
//! Local periodicity of the onset strength envelope: for every onset frame, a
//! Hann-windowed excerpt of `win_length` frames centred on it is autocorrelated,
//! and each column is scaled so its largest value is 1.
//!
//! # Reference
//!
//! Grosche, P., Müller, M., & Kurth, F. (2010). Cyclic Tempogram - A Mid-Level Tempo
//! Representation for Music Signals. *IEEE International Conference on Acoustics,
//! Speech and Signal Processing (ICASSP)*.
//!
//! # Algorithm
//!
//! 1. Pad the envelope by `win_length / 2` on each side with linear ramps to zero
//! 2. Slice one `win_length` window per onset frame (hop 1)
//! 3. Multiply by a periodic Hann window
//! 4. Autocorrelate (FFT) and keep lags `0..win_length`
//! 5. Max-normalize each frame
//!
//! # Example
//!
//! ```no_run
//! use prism_dsp::features::period::tempogram::autocorrelation_tempogram;
//!
//! let onset_env = vec![0.0f32; 500];
//! let tempogram = autocorrelation_tempogram(&onset_env, 384, true)?;
//! assert_eq!(tempogram.len(), 500);
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```

use rayon::prelude::*;

use super::autocorrelation::Autocorrelator;
use crate::error::AnalysisError;
use crate::features::spectral::stft::hann_window;

/// Tempogram (`[frame][lag]`) of an onset strength envelope
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `win_length` is 0. An empty envelope
/// yields an empty tempogram.
pub fn autocorrelation_tempogram(
    onset_env: &[f32],
    win_length: usize,
    center: bool,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    if win_length == 0 {
        return Err(AnalysisError::InvalidInput(
            "Tempogram window length must be > 0".to_string(),
        ));
    }

    let n = onset_env.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let padded = if center {
        linear_ramp_pad(onset_env, win_length / 2)
    } else {
        onset_env.to_vec()
    };

    let n_frames = if padded.len() >= win_length {
        (padded.len() - win_length + 1).min(n)
    } else {
        0
    };

    log::debug!(
        "Computing autocorrelation tempogram: {} onset frames, win_length={}, {} columns",
        n,
        win_length,
        n_frames
    );

    let window = hann_window(win_length);
    let autocorrelator = Autocorrelator::new(win_length);

    let tempogram = (0..n_frames)
        .into_par_iter()
        .map(|t| {
            let excerpt: Vec<f32> = padded[t..t + win_length]
                .iter()
                .zip(window.iter())
                .map(|(&x, &w)| x * w)
                .collect();
            let mut acf = autocorrelator.compute(&excerpt);
            normalize_max(&mut acf);
            acf
        })
        .collect();

    Ok(tempogram)
}

/// Pad with ramps from 0 at the outer ends to the edge values
fn linear_ramp_pad(signal: &[f32], pad: usize) -> Vec<f32> {
    let first = signal.first().copied().unwrap_or(0.0);
    let last = signal.last().copied().unwrap_or(0.0);
    let mut padded = Vec::with_capacity(signal.len() + 2 * pad);
    padded.extend((0..pad).map(|i| first * i as f32 / pad as f32));
    padded.extend_from_slice(signal);
    padded.extend((0..pad).map(|j| last * (pad - 1 - j) as f32 / pad as f32));
    padded
}

/// Scale so the largest magnitude is 1; near-silent columns are left untouched
fn normalize_max(values: &mut [f32]) {
    let peak = values.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if peak > f32::MIN_POSITIVE {
        for v in values.iter_mut() {
            *v /= peak;
        }
    }
}
