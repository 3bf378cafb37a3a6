//! Octave-band spectral contrast
//!
//! Splits the spectrum into `n_bands + 1` sub-bands (`[0, fmin]`, then octaves
//! `[fmin·2^(k-1), fmin·2^k]`, the last running to Nyquist) and reports, per band
//! and frame, the difference in dB between the mean of the strongest and weakest
//! `quantile` fraction of bins.
//!
//! # Reference
//!
//! Jiang, D.-N., Lu, L., Zhang, H.-J., Tao, J.-H., & Cai, L.-H. (2002).
//! Music type classification by spectral contrast feature.
//! *IEEE International Conference on Multimedia and Expo*.

use super::mel::{power_to_db, POWER_AMIN};
use crate::error::AnalysisError;

/// Per-frame spectral contrast (`[frame][band]`, `n_bands + 1` bands, dB)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if a band edge below the top one
/// reaches Nyquist, or a band contains no bins.
pub fn spectral_contrast(
    magnitudes: &[Vec<f32>],
    freqs: &[f32],
    sample_rate: u32,
    n_bands: usize,
    fmin: f32,
    quantile: f32,
    top_db: f32,
) -> Result<Vec<Vec<f32>>, AnalysisError> {
    let nyquist = sample_rate as f32 / 2.0;

    let mut edges = vec![0.0f32];
    edges.extend((0..=n_bands).map(|k| fmin * 2f32.powi(k as i32)));

    if edges[..edges.len() - 1].iter().any(|&e| e >= nyquist) {
        return Err(AnalysisError::InvalidInput(format!(
            "Contrast band edges exceed Nyquist ({} Hz): reduce fmin ({}) or band count ({})",
            nyquist, fmin, n_bands
        )));
    }

    let bands = band_bins(freqs, &edges, n_bands)?;

    let mut peaks = Vec::with_capacity(magnitudes.len());
    let mut valleys = Vec::with_capacity(magnitudes.len());

    for frame in magnitudes {
        let mut frame_peaks = Vec::with_capacity(bands.len());
        let mut frame_valleys = Vec::with_capacity(bands.len());
        for band in &bands {
            let mut values: Vec<f32> = frame[band.start..band.end].to_vec();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n_q = (quantile * band.width as f32).round_ties_even().max(1.0) as usize;
            let n_q = n_q.min(values.len()).max(1);
            let valley = values[..n_q].iter().sum::<f32>() / n_q as f32;
            let peak = values[values.len() - n_q..].iter().sum::<f32>() / n_q as f32;
            frame_valleys.push(valley);
            frame_peaks.push(peak);
        }
        peaks.push(frame_peaks);
        valleys.push(frame_valleys);
    }

    let peaks_db = power_to_db(&peaks, POWER_AMIN, top_db);
    let valleys_db = power_to_db(&valleys, POWER_AMIN, top_db);

    Ok(peaks_db
        .iter()
        .zip(valleys_db.iter())
        .map(|(p, v)| p.iter().zip(v.iter()).map(|(a, b)| a - b).collect())
        .collect())
}

/// Bin range of one sub-band
///
/// `width` counts the bins used for the quantile, which for all but the top band
/// includes one more bin than `start..end` covers.
struct BandBins {
    start: usize,
    end: usize,
    width: usize,
}

fn band_bins(freqs: &[f32], edges: &[f32], n_bands: usize) -> Result<Vec<BandBins>, AnalysisError> {
    let n_bins = freqs.len();
    let mut bands = Vec::with_capacity(n_bands + 1);

    for k in 0..=n_bands {
        let (low, high) = (edges[k], edges[k + 1]);
        let first = freqs.iter().position(|&f| f >= low && f <= high);
        let last = freqs.iter().rposition(|&f| f >= low && f <= high);
        let (first, last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(AnalysisError::InvalidInput(format!(
                    "Contrast band [{}, {}] Hz contains no FFT bins",
                    low, high
                )))
            }
        };

        // Overlap the previous band by one bin; the top band runs to Nyquist
        let start = if k > 0 { first.saturating_sub(1) } else { first };
        let stop = if k == n_bands { n_bins } else { last + 1 };
        let width = stop - start;
        // All but the top band drop their highest bin
        let end = if k < n_bands { stop - 1 } else { stop };

        if end <= start {
            return Err(AnalysisError::InvalidInput(format!(
                "Contrast band [{}, {}] Hz is too narrow for the FFT resolution",
                low, high
            )));
        }

        bands.push(BandBins { start, end, width });
    }

    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::spectral::stft::fft_frequencies;

    #[test]
    fn test_output_shape() {
        let freqs = fft_frequencies(22050, 2048);
        let mags = vec![vec![1.0f32; 1025]; 4];
        let contrast = spectral_contrast(&mags, &freqs, 22050, 6, 200.0, 0.02, 80.0).unwrap();
        assert_eq!(contrast.len(), 4);
        assert!(contrast.iter().all(|f| f.len() == 7));
    }

    #[test]
    fn test_flat_spectrum_has_no_contrast() {
        let freqs = fft_frequencies(22050, 2048);
        let mags = vec![vec![0.5f32; 1025]; 2];
        let contrast = spectral_contrast(&mags, &freqs, 22050, 6, 200.0, 0.02, 80.0).unwrap();
        assert!(contrast.iter().flatten().all(|v| v.abs() < 1e-4));
    }

    #[test]
    fn test_peaky_spectrum_has_contrast() {
        let freqs = fft_frequencies(22050, 2048);
        let mut frame = vec![0.01f32; 1025];
        // Strong bin inside the 400-800 Hz band
        frame[50] = 10.0;
        let contrast = spectral_contrast(&[frame], &freqs, 22050, 6, 200.0, 0.02, 80.0).unwrap();
        assert!(contrast[0][2] > 20.0);
    }

    #[test]
    fn test_rejects_bands_above_nyquist() {
        let freqs = fft_frequencies(8000, 2048);
        let mags = vec![vec![1.0f32; 1025]];
        let result = spectral_contrast(&mags, &freqs, 8000, 6, 200.0, 0.02, 80.0);
        assert!(result.is_err());
    }
}
