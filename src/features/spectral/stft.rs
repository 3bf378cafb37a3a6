//! Short-time Fourier transform magnitude
//!
//! One STFT configuration backs every spectral feature: periodic Hann window of
//! `n_fft` samples, hop of `hop_size`, optional centring with zero padding.
//!
//! # Example
//!
//! ```no_run
//! use prism_dsp::features::spectral::stft::Stft;
//!
//! let samples = vec![0.0f32; 22050];
//! let stft = Stft::compute(&samples, 2048, 512, true)?;
//! assert_eq!(stft.n_bins(), 1025);
//! # Ok::<(), prism_dsp::AnalysisError>(())
//! ```

use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;
use crate::features::temporal::framing::{analysis_signal, frame_count, PadMode};

/// Magnitude spectrogram, stored frame-major (`[frame][bin]`)
#[derive(Debug, Clone, PartialEq)]
pub struct Stft {
    magnitudes: Vec<Vec<f32>>,
    n_fft: usize,
    hop_size: usize,
}

impl Stft {
    /// Compute the magnitude STFT of `samples`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `n_fft < 2` or `hop_size == 0`.
    pub fn compute(
        samples: &[f32],
        n_fft: usize,
        hop_size: usize,
        center: bool,
    ) -> Result<Self, AnalysisError> {
        if n_fft < 2 {
            return Err(AnalysisError::InvalidInput(format!(
                "FFT size must be >= 2, got {}",
                n_fft
            )));
        }
        if hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }

        let signal = analysis_signal(samples, n_fft, center, PadMode::Constant);
        let n_frames = frame_count(signal.len(), n_fft, hop_size, false);
        let n_bins = n_fft / 2 + 1;

        log::debug!(
            "Computing STFT: {} samples, n_fft={}, hop={}, center={}, {} frames",
            samples.len(),
            n_fft,
            hop_size,
            center,
            n_frames
        );

        let window = hann_window(n_fft);
        let fft = FftPlanner::<f32>::new().plan_fft_forward(n_fft);

        let magnitudes: Vec<Vec<f32>> = (0..n_frames)
            .into_par_iter()
            .map(|i| {
                let start = i * hop_size;
                let mut buffer: Vec<Complex<f32>> = signal[start..start + n_fft]
                    .iter()
                    .zip(window.iter())
                    .map(|(&s, &w)| Complex::new(s * w, 0.0))
                    .collect();
                fft.process(&mut buffer);
                buffer[..n_bins].iter().map(|c| c.norm()).collect()
            })
            .collect();

        Ok(Self {
            magnitudes,
            n_fft,
            hop_size,
        })
    }

    /// Magnitudes per frame
    pub fn magnitudes(&self) -> &[Vec<f32>] {
        &self.magnitudes
    }

    /// Squared magnitudes per frame
    pub fn power(&self) -> Vec<Vec<f32>> {
        self.magnitudes
            .iter()
            .map(|frame| frame.iter().map(|&m| m * m).collect())
            .collect()
    }

    /// Number of frames
    pub fn n_frames(&self) -> usize {
        self.magnitudes.len()
    }

    /// Number of frequency bins (`n_fft / 2 + 1`)
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// FFT size
    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Hop size in samples
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }
}

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos() as f32
        })
        .collect()
}

/// Centre frequency in Hz of each FFT bin
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f32> {
    let n_bins = n_fft / 2 + 1;
    (0..n_bins)
        .map(|k| k as f32 * sample_rate as f32 / n_fft as f32)
        .collect()
}

/// Convert a magnitude spectrogram to dB relative to its own peak
///
/// `20·log10(max(amin, S)) - 20·log10(max(amin, max(S)))`, then floored at
/// `peak_db - top_db`. Output has the same layout as the input.
pub fn amplitude_to_db(magnitudes: &[Vec<f32>], amin: f32, top_db: f32) -> Vec<Vec<f32>> {
    let reference = magnitudes
        .iter()
        .flat_map(|frame| frame.iter().copied())
        .fold(0.0f32, f32::max);
    let ref_db = 20.0 * reference.max(amin).log10();

    let mut db: Vec<Vec<f32>> = magnitudes
        .iter()
        .map(|frame| {
            frame
                .iter()
                .map(|&m| 20.0 * m.max(amin).log10() - ref_db)
                .collect()
        })
        .collect();

    clip_top_db(&mut db, top_db);
    db
}

/// Floor every value at `max - top_db`
pub(crate) fn clip_top_db(values: &mut [Vec<f32>], top_db: f32) {
    let peak = values
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(f32::NEG_INFINITY, f32::max);
    if !peak.is_finite() {
        return;
    }
    let floor = peak - top_db;
    for row in values.iter_mut() {
        for v in row.iter_mut() {
            *v = v.max(floor);
        }
    }
}
