//! Per-frame spectral shape descriptors
//!
//! All three operate on magnitude spectra (`[frame][bin]`) with bin frequencies
//! from `fft_frequencies`. A frame whose magnitudes sum to (near) zero yields 0.

/// Frames with a total magnitude below this are treated as silent
const EPSILON: f32 = 1e-10;

/// Magnitude-weighted mean frequency per frame
pub fn spectral_centroid(magnitudes: &[Vec<f32>], freqs: &[f32]) -> Vec<f32> {
    magnitudes
        .iter()
        .map(|frame| centroid_of(frame, freqs))
        .collect()
}

/// Magnitude-weighted spread around the centroid: `(Σ ŝ_k |f_k - c|^p)^(1/p)`
pub fn spectral_bandwidth(magnitudes: &[Vec<f32>], freqs: &[f32], p: f32) -> Vec<f32> {
    magnitudes
        .iter()
        .map(|frame| {
            let total: f32 = frame.iter().sum();
            if total < EPSILON {
                return 0.0;
            }
            let centroid = centroid_of(frame, freqs);
            let spread: f64 = frame
                .iter()
                .zip(freqs.iter())
                .map(|(&m, &f)| (m / total) as f64 * ((f - centroid).abs() as f64).powf(p as f64))
                .sum();
            spread.powf(1.0 / p as f64) as f32
        })
        .collect()
}

/// Lowest frequency below which `roll_percent` of the frame's magnitude lies
pub fn spectral_rolloff(magnitudes: &[Vec<f32>], freqs: &[f32], roll_percent: f32) -> Vec<f32> {
    magnitudes
        .iter()
        .map(|frame| {
            let total: f64 = frame.iter().map(|&m| m as f64).sum();
            let threshold = roll_percent as f64 * total;
            let mut cumulative = 0.0f64;
            for (&m, &f) in frame.iter().zip(freqs.iter()) {
                cumulative += m as f64;
                if cumulative >= threshold {
                    return f;
                }
            }
            freqs.last().copied().unwrap_or(0.0)
        })
        .collect()
}

fn centroid_of(frame: &[f32], freqs: &[f32]) -> f32 {
    let total: f32 = frame.iter().sum();
    if total < EPSILON {
        return 0.0;
    }
    let weighted: f64 = frame
        .iter()
        .zip(freqs.iter())
        .map(|(&m, &f)| m as f64 * f as f64)
        .sum();
    (weighted / total as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freqs() -> Vec<f32> {
        (0..5).map(|k| k as f32 * 100.0).collect()
    }

    #[test]
    fn test_centroid_single_bin() {
        let c = spectral_centroid(&[vec![0.0, 0.0, 3.0, 0.0, 0.0]], &freqs());
        assert!((c[0] - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_centroid_two_bins() {
        let c = spectral_centroid(&[vec![1.0, 0.0, 0.0, 0.0, 1.0]], &freqs());
        assert!((c[0] - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_bandwidth() {
        let bw = spectral_bandwidth(&[vec![1.0, 0.0, 0.0, 0.0, 1.0]], &freqs(), 2.0);
        assert!((bw[0] - 200.0).abs() < 1e-3);
        let bw = spectral_bandwidth(&[vec![0.0, 0.0, 5.0, 0.0, 0.0]], &freqs(), 2.0);
        assert!(bw[0].abs() < 1e-4);
    }

    #[test]
    fn test_rolloff() {
        let r = spectral_rolloff(&[vec![1.0, 1.0, 1.0, 1.0, 1.0]], &freqs(), 0.85);
        // cumulative 5 * 0.85 = 4.25 first reached at bin 4
        assert_eq!(r[0], 400.0);
        let r = spectral_rolloff(&[vec![10.0, 0.0, 0.0, 0.0, 1.0]], &freqs(), 0.85);
        assert_eq!(r[0], 0.0);
    }

    #[test]
    fn test_silent_frame() {
        let silent = vec![vec![0.0f32; 5]];
        assert_eq!(spectral_centroid(&silent, &freqs()), vec![0.0]);
        assert_eq!(spectral_bandwidth(&silent, &freqs(), 2.0), vec![0.0]);
        assert_eq!(spectral_rolloff(&silent, &freqs(), 0.85), vec![0.0]);
    }
}
