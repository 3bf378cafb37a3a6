//! Onset strength envelope
//!
//! Positive spectral flux of the log-power mel spectrogram:
//!
//! 1. `flux[t][m] = max(0, S[t][m] - S[t - 1][m])`
//! 2. Average across mel bands
//! 3. Shift right by `lag` frames, plus `n_fft / (2·hop)` frames when frames are
//!    centred, so each value lines up with the frame where the change lands
//!
//! The envelope has exactly one value per analysis frame; the leading values are 0.
//!
//! # Reference
//!
//! Böck, S., & Widmer, G. (2013). Maximum Filter Vibrato Suppression for Onset Detection.
//! *Proceedings of the 16th International Conference on Digital Audio Effects (DAFx)*.

/// Frame distance of the spectral difference
const LAG: usize = 1;

/// Onset strength per frame from a log-power mel spectrogram (`[frame][mel]`, dB)
pub fn onset_strength(
    log_mel: &[Vec<f32>],
    n_fft: usize,
    hop_size: usize,
    center: bool,
) -> Vec<f32> {
    let n_frames = log_mel.len();
    if n_frames == 0 {
        return Vec::new();
    }

    let mut pad = LAG;
    if center && hop_size > 0 {
        pad += n_fft / (2 * hop_size);
    }

    let mut envelope = vec![0.0f32; pad.min(n_frames)];

    for t in LAG..n_frames {
        if envelope.len() >= n_frames {
            break;
        }
        let (prev, curr) = (&log_mel[t - LAG], &log_mel[t]);
        let n_mels = curr.len().max(1);
        let flux: f32 = curr
            .iter()
            .zip(prev.iter())
            .map(|(&c, &p)| (c - p).max(0.0))
            .sum();
        envelope.push(flux / n_mels as f32);
    }

    log::debug!(
        "Onset strength: {} frames, max={:.4}",
        envelope.len(),
        envelope.iter().copied().fold(0.0f32, f32::max)
    );

    envelope
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_matches_frames() {
        let log_mel = vec![vec![0.0f32; 8]; 20];
        assert_eq!(onset_strength(&log_mel, 2048, 512, true).len(), 20);
        assert_eq!(onset_strength(&log_mel, 2048, 512, false).len(), 20);
    }

    #[test]
    fn test_step_lands_after_padding() {
        // Energy jumps at frame 5
        let mut log_mel = vec![vec![-80.0f32; 4]; 12];
        for frame in log_mel.iter_mut().skip(5) {
            frame.iter_mut().for_each(|v| *v = -20.0);
        }
        let env = onset_strength(&log_mel, 2048, 512, true);
        // Flux index 4 (frames 4 -> 5) shifted by 3 lands at 7
        let peak = env
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 7);
        assert!((env[7] - 60.0).abs() < 1e-4);
        assert!(env[..3].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_decreases_are_ignored() {
        let log_mel = vec![vec![0.0f32; 4], vec![-10.0; 4], vec![-20.0; 4]];
        let env = onset_strength(&log_mel, 2048, 512, false);
        assert!(env.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_empty() {
        assert!(onset_strength(&[], 2048, 512, true).is_empty());
    }

    #[test]
    fn test_single_frame() {
        assert_eq!(onset_strength(&[vec![1.0; 4]], 2048, 512, true), vec![0.0]);
    }
}
