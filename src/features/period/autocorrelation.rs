//! FFT-accelerated autocorrelation
//!
//! Uses the identity `ACF = IFFT(|FFT(signal)|²)` with zero padding to at least
//! `2n - 1` points, so the result is the linear (not circular) autocorrelation.
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Autocorrelation engine planned once for a fixed signal length
pub struct Autocorrelator {
    len: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    fft_size: usize,
}

impl Autocorrelator {
    /// Plan transforms for signals of `len` samples
    pub fn new(len: usize) -> Self {
        let fft_size = (2 * len.max(1) - 1).next_power_of_two();
        let mut planner = FftPlanner::new();
        Self {
            len,
            forward: planner.plan_fft_forward(fft_size),
            inverse: planner.plan_fft_inverse(fft_size),
            fft_size,
        }
    }

    /// Autocorrelation at lags `0..len`
    ///
    /// Inputs shorter than the planned length are zero padded; longer inputs are truncated.
    pub fn compute(&self, signal: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = signal
            .iter()
            .take(self.len)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.forward.process(&mut buffer);
        for x in &mut buffer {
            *x = Complex::new(x.norm_sqr(), 0.0);
        }
        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.fft_size as f32;
        buffer[..self.len].iter().map(|x| x.re * scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(signal: &[f32]) -> Vec<f32> {
        (0..signal.len())
            .map(|lag| {
                signal[..signal.len() - lag]
                    .iter()
                    .zip(signal[lag..].iter())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_matches_direct_computation() {
        let signal: Vec<f32> = (0..37).map(|i| ((i * 7) % 11) as f32 - 5.0).collect();
        let fast = Autocorrelator::new(signal.len()).compute(&signal);
        let slow = direct(&signal);
        for (a, b) in fast.iter().zip(slow.iter()) {
            assert!((a - b).abs() < 1e-2, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_periodic_pulse_train() {
        let mut signal = vec![0.0f32; 64];
        for i in (0..64).step_by(8) {
            signal[i] = 1.0;
        }
        let acf = Autocorrelator::new(64).compute(&signal);
        assert!((acf[0] - 8.0).abs() < 1e-4);
        assert!((acf[8] - 7.0).abs() < 1e-4);
        assert!(acf[4].abs() < 1e-4);
    }

    #[test]
    fn test_single_sample() {
        let acf = Autocorrelator::new(1).compute(&[3.0]);
        assert_eq!(acf.len(), 1);
        assert!((acf[0] - 9.0).abs() < 1e-5);
    }
}
