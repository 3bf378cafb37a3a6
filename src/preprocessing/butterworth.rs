//! Digital Butterworth filter design
//!
//! Produces transfer-function coefficients `(b, a)` for low-pass, high-pass and
//! band-pass Butterworth filters of arbitrary order.
//!
//! # Algorithm
//!
//! 1. Normalize cutoff(s) by the Nyquist frequency: `Wn = cutoff / (sample_rate / 2)`
//! 2. Place the analog prototype poles on the unit circle:
//!    `p_k = -exp(j·π·m / 2N)` for `m = -N+1, -N+3, ..., N-1`
//! 3. Pre-warp the cutoff(s): `w = 4·tan(π·Wn / 2)`
//! 4. Transform the prototype to the requested type in zero-pole-gain form
//! 5. Map to the z-plane with the bilinear transform and expand to polynomials
//!
//! All arithmetic runs in `f64`; a band-pass of order N has 2N+1 coefficients and
//! loses precision quickly in single precision.
//!
//! # Example
//!
//! ```no_run
//! use prism_dsp::preprocessing::butterworth::{design, Cutoff, FilterType};
//!
//! let coeffs = design(5, Cutoff::Single(1000.0), 22050, FilterType::Highpass)?;
//! assert_eq!(coeffs.b.len(), 6);
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Filter order used when none is configured
pub const DEFAULT_FILTER_ORDER: usize = 5;

/// Sampling rate of the normalized digital design (Nyquist = 1)
const DESIGN_FS: f64 = 2.0;

/// Butterworth response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    /// Passes frequencies below the cutoff
    Lowpass,
    /// Passes frequencies above the cutoff
    Highpass,
    /// Passes frequencies between two cutoffs
    Bandpass,
}

/// Cutoff frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cutoff {
    /// Single edge (low-pass, high-pass)
    Single(f64),
    /// Band edges `(low, high)` (band-pass)
    Band(f64, f64),
}

/// Transfer-function coefficients of a designed filter
///
/// `b` holds the feed-forward coefficients and `a` the feedback coefficients,
/// with `a[0] == 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Feed-forward (numerator) coefficients
    pub b: Vec<f64>,
    /// Feedback (denominator) coefficients
    pub a: Vec<f64>,
}

impl FilterCoefficients {
    /// Polynomial order of the transfer function
    pub fn order(&self) -> usize {
        self.a.len().saturating_sub(1)
    }

    /// Magnitude of the frequency response at `freq_hz`
    pub fn magnitude_response(&self, freq_hz: f64, sample_rate: u32) -> f64 {
        let omega = 2.0 * std::f64::consts::PI * freq_hz / sample_rate as f64;
        let eval = |coeffs: &[f64]| -> Complex<f64> {
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| Complex::from_polar(c, -omega * k as f64))
                .sum()
        };
        let den = eval(&self.a);
        if den.norm() == 0.0 {
            return f64::INFINITY;
        }
        (eval(&self.b) / den).norm()
    }
}

/// Design a digital Butterworth filter
///
/// # Arguments
///
/// * `order` - Filter order (N)
/// * `cutoff` - Cutoff in Hz; `Cutoff::Band` for band-pass, `Cutoff::Single` otherwise
/// * `sample_rate` - Sample rate in Hz
/// * `filter_type` - Low-pass, high-pass or band-pass
///
/// # Errors
///
/// Returns `AnalysisError::InvalidCutoff` if a normalized cutoff is outside (0, 1),
/// if band low >= band high, or if the cutoff shape does not match the filter type.
/// Returns `AnalysisError::InvalidInput` for order 0 or sample rate 0.
pub fn design(
    order: usize,
    cutoff: Cutoff,
    sample_rate: u32,
    filter_type: FilterType,
) -> Result<FilterCoefficients, AnalysisError> {
    if order == 0 {
        return Err(AnalysisError::InvalidInput(
            "Filter order must be > 0".to_string(),
        ));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    let nyquist = sample_rate as f64 / 2.0;

    log::debug!(
        "Designing {:?} Butterworth filter: order={}, cutoff={:?}, nyquist={:.1} Hz",
        filter_type,
        order,
        cutoff,
        nyquist
    );

    let prototype = prototype_poles(order);

    let (zeros, poles, gain) = match (filter_type, cutoff) {
        (FilterType::Lowpass, Cutoff::Single(hz)) => {
            let wo = prewarp(normalize(hz, nyquist)?);
            let poles: Vec<Complex<f64>> = prototype.iter().map(|&p| p * wo).collect();
            (Vec::new(), poles, wo.powi(order as i32))
        }
        (FilterType::Highpass, Cutoff::Single(hz)) => {
            let wo = prewarp(normalize(hz, nyquist)?);
            let poles: Vec<Complex<f64>> = prototype.iter().map(|&p| wo / p).collect();
            let neg_prod: Complex<f64> = prototype.iter().map(|&p| -p).product();
            let gain = (Complex::new(1.0, 0.0) / neg_prod).re;
            (vec![Complex::new(0.0, 0.0); order], poles, gain)
        }
        (FilterType::Bandpass, Cutoff::Band(low_hz, high_hz)) => {
            let low = normalize(low_hz, nyquist)?;
            let high = normalize(high_hz, nyquist)?;
            if low >= high {
                return Err(AnalysisError::InvalidCutoff(format!(
                    "Band-pass low cutoff ({} Hz) must be below high cutoff ({} Hz)",
                    low_hz, high_hz
                )));
            }
            let (w_low, w_high) = (prewarp(low), prewarp(high));
            let wo = (w_low * w_high).sqrt();
            let bw = w_high - w_low;

            let mut poles = Vec::with_capacity(2 * order);
            let scaled: Vec<Complex<f64>> = prototype.iter().map(|&p| p * (bw / 2.0)).collect();
            for &p in &scaled {
                poles.push(p + (p * p - wo * wo).sqrt());
            }
            for &p in &scaled {
                poles.push(p - (p * p - wo * wo).sqrt());
            }
            (vec![Complex::new(0.0, 0.0); order], poles, bw.powi(order as i32))
        }
        (filter_type, cutoff) => {
            return Err(AnalysisError::InvalidCutoff(format!(
                "Cutoff {:?} does not fit a {:?} filter",
                cutoff, filter_type
            )));
        }
    };

    let (zeros, poles, gain) = bilinear(zeros, poles, gain);

    let b: Vec<f64> = poly(&zeros).into_iter().map(|c| c.re * gain).collect();
    let a: Vec<f64> = poly(&poles).into_iter().map(|c| c.re).collect();

    if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
        return Err(AnalysisError::NumericalError(format!(
            "Non-finite coefficients for {:?} filter at {:?}",
            filter_type, cutoff
        )));
    }

    Ok(FilterCoefficients { b, a })
}

fn normalize(cutoff_hz: f64, nyquist: f64) -> Result<f64, AnalysisError> {
    let normalized = cutoff_hz / nyquist;
    if !(normalized > 0.0 && normalized < 1.0) {
        return Err(AnalysisError::InvalidCutoff(format!(
            "Cutoff {} Hz must lie strictly between 0 and Nyquist ({} Hz)",
            cutoff_hz, nyquist
        )));
    }
    Ok(normalized)
}

fn prewarp(normalized: f64) -> f64 {
    2.0 * DESIGN_FS * (std::f64::consts::PI * normalized / DESIGN_FS).tan()
}

fn prototype_poles(order: usize) -> Vec<Complex<f64>> {
    let n = order as i64;
    (0..n)
        .map(|k| {
            let m = -n + 1 + 2 * k;
            let theta = std::f64::consts::PI * m as f64 / (2 * n) as f64;
            -Complex::from_polar(1.0, theta)
        })
        .collect()
}

/// Bilinear transform of a zero-pole-gain system
///
/// Zeros at infinity (degree = #poles - #zeros) land on z = -1.
fn bilinear(
    zeros: Vec<Complex<f64>>,
    poles: Vec<Complex<f64>>,
    gain: f64,
) -> (Vec<Complex<f64>>, Vec<Complex<f64>>, f64) {
    let fs2 = Complex::new(2.0 * DESIGN_FS, 0.0);
    let degree = poles.len() - zeros.len();

    let num: Complex<f64> = zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex<f64> = poles.iter().map(|&p| fs2 - p).product();

    let mut zeros_z: Vec<Complex<f64>> = zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    zeros_z.extend(std::iter::repeat(Complex::new(-1.0, 0.0)).take(degree));
    let poles_z: Vec<Complex<f64>> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    (zeros_z, poles_z, gain * (num / den).re)
}

/// Expand roots into monic polynomial coefficients (highest power first)
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &r in roots {
        let mut next = coeffs.clone();
        next.push(Complex::new(0.0, 0.0));
        for i in 1..next.len() {
            next[i] -= r * coeffs[i - 1];
        }
        coeffs = next;
    }
    coeffs
}
