//! Mel-frequency cepstral coefficients
//!
//! Log-power mel spectrogram followed by an orthonormal DCT-II across mel bands;
//! the first `n_mfcc` coefficients are kept.

use std::f64::consts::PI;

/// MFCC matrix (`[frame][coefficient]`) from a log-power mel spectrogram (`[frame][mel]`)
pub fn mfcc_from_log_mel(log_mel: &[Vec<f32>], n_mfcc: usize) -> Vec<Vec<f32>> {
    let n_mels = match log_mel.first() {
        Some(frame) => frame.len(),
        None => return Vec::new(),
    };
    let basis = dct_basis(n_mfcc.min(n_mels), n_mels);

    log_mel
        .iter()
        .map(|frame| {
            basis
                .iter()
                .map(|row| row.iter().zip(frame.iter()).map(|(&b, &x)| b * x).sum())
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II rows: `c_k = s_k Σ x_n cos(π k (2n + 1) / 2N)`
fn dct_basis(n_coeffs: usize, n: usize) -> Vec<Vec<f32>> {
    (0..n_coeffs)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n as f64).sqrt()
            } else {
                (2.0 / n as f64).sqrt()
            };
            (0..n)
                .map(|i| {
                    (scale * (PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64).cos()) as f32
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input_only_has_dc() {
        let log_mel = vec![vec![2.0f32; 16]; 3];
        let coeffs = mfcc_from_log_mel(&log_mel, 13);
        assert_eq!(coeffs.len(), 3);
        assert_eq!(coeffs[0].len(), 13);
        // c0 = sqrt(1/N) * N * 2 = 2 * sqrt(N)
        assert!((coeffs[0][0] - 2.0 * 4.0).abs() < 1e-4);
        assert!(coeffs[0][1..].iter().all(|c| c.abs() < 1e-4));
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let basis = dct_basis(8, 8);
        for i in 0..8 {
            for j in 0..8 {
                let dot: f32 = basis[i].iter().zip(basis[j].iter()).map(|(a, b)| a * b).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_empty() {
        assert!(mfcc_from_log_mel(&[], 13).is_empty());
    }
}
