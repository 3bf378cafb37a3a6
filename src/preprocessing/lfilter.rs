//! Causal linear recursive filtering
//!
//! Runs a designed filter once, start to end, over a sample buffer using the
//! Direct Form II transposed structure with zero initial state. No phase
//! correction is applied.
//!
//! # Example
//!
//! ```no_run
//! use prism_dsp::io::SampleBuffer;
//! use prism_dsp::preprocessing::butterworth::{design, Cutoff, FilterType};
//! use prism_dsp::preprocessing::lfilter::apply;
//!
//! let buffer = SampleBuffer::new(vec![0.0f32; 22050], 22050);
//! let coeffs = design(5, Cutoff::Single(1000.0), 22050, FilterType::Lowpass)?;
//! let filtered = apply(&buffer, &coeffs)?;
//! assert_eq!(filtered.len(), buffer.len());
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```

use super::butterworth::FilterCoefficients;
use crate::error::AnalysisError;
use crate::io::SampleBuffer;

/// Filter a buffer, producing a new buffer of the same length and sample rate
pub fn apply(
    buffer: &SampleBuffer,
    coefficients: &FilterCoefficients,
) -> Result<SampleBuffer, AnalysisError> {
    let output = lfilter(&coefficients.b, &coefficients.a, buffer.samples())?;
    Ok(SampleBuffer::new(output, buffer.sample_rate()))
}

/// Filter a slice with feed-forward `b` and feedback `a` coefficients
///
/// `y[n] = (Σ b[k]·x[n-k] - Σ_{k>=1} a[k]·y[n-k]) / a[0]`
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if either coefficient vector is empty
/// or `a[0]` is zero, and `AnalysisError::NumericalError` if the output diverges.
pub fn lfilter(b: &[f64], a: &[f64], x: &[f32]) -> Result<Vec<f32>, AnalysisError> {
    if b.is_empty() || a.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Filter coefficients must not be empty".to_string(),
        ));
    }

    let a0 = a[0];
    if a0 == 0.0 {
        return Err(AnalysisError::InvalidInput(
            "Leading feedback coefficient must be non-zero".to_string(),
        ));
    }

    // Pad both sides to a common length so the state update is uniform
    let n = b.len().max(a.len());
    let mut b_norm = vec![0.0f64; n];
    let mut a_norm = vec![0.0f64; n];
    for (dst, &src) in b_norm.iter_mut().zip(b) {
        *dst = src / a0;
    }
    for (dst, &src) in a_norm.iter_mut().zip(a) {
        *dst = src / a0;
    }

    log::debug!("Filtering {} samples with {} taps", x.len(), n);

    // Direct Form II transposed: state holds n-1 delayed partial sums
    let mut state = vec![0.0f64; n - 1];
    let mut y = Vec::with_capacity(x.len());

    for &sample in x {
        let xi = sample as f64;
        let yi = b_norm[0] * xi + state.first().copied().unwrap_or(0.0);

        for k in 0..state.len() {
            let next = state.get(k + 1).copied().unwrap_or(0.0);
            state[k] = b_norm[k + 1] * xi - a_norm[k + 1] * yi + next;
        }

        y.push(yi as f32);
    }

    if y.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::NumericalError(
            "Filter output diverged (non-finite samples)".to_string(),
        ));
    }

    Ok(y)
}
