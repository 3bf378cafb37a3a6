//! Zero-crossing rate
//!
//! Fraction of adjacent-sample sign changes per frame. Samples with magnitude at
//! or below `ZERO_THRESHOLD` are treated as zero, and zero counts as positive.
//! Centred frames use edge padding.

use super::framing::{analysis_signal, frames, PadMode};

/// Magnitudes at or below this are clamped to zero before sign comparison
const ZERO_THRESHOLD: f32 = 1e-10;

/// Per-frame zero-crossing rate
///
/// Returns one value in [0, 1] per frame; empty if no frame fits.
pub fn zero_crossing_rate(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
    center: bool,
) -> Vec<f32> {
    if frame_size == 0 || hop_size == 0 {
        return Vec::new();
    }

    let signal = analysis_signal(samples, frame_size, center, PadMode::Edge);

    let zcr: Vec<f32> = frames(&signal, frame_size, hop_size)
        .map(|frame| {
            let crossings = frame
                .windows(2)
                .filter(|w| is_negative(w[0]) != is_negative(w[1]))
                .count();
            crossings as f32 / frame_size as f32
        })
        .collect();

    log::debug!(
        "Zero-crossing rate: {} samples -> {} frames (frame={}, hop={})",
        samples.len(),
        zcr.len(),
        frame_size,
        hop_size
    );

    zcr
}

fn is_negative(x: f32) -> bool {
    x.abs() > ZERO_THRESHOLD && x.is_sign_negative()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_signal() {
        let x: Vec<f32> = (0..64).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let zcr = zero_crossing_rate(&x, 16, 16, false);
        assert_eq!(zcr.len(), 4);
        // 15 crossings in 16 samples
        for v in zcr {
            assert!((v - 15.0 / 16.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_constant_signal_has_no_crossings() {
        let zcr = zero_crossing_rate(&[0.3; 4096], 2048, 512, true);
        assert!(zcr.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_tiny_values_count_as_zero() {
        let x = [1.0, -1e-12, 1.0, -1e-12];
        let zcr = zero_crossing_rate(&x, 4, 4, false);
        assert_eq!(zcr, vec![0.0]);
    }

    #[test]
    fn test_sine_rate() {
        let sr = 22050.0;
        let x: Vec<f32> = (0..22050)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr).sin())
            .collect();
        let zcr = zero_crossing_rate(&x, 2048, 512, true);
        assert_eq!(zcr.len(), 44);
        let expected = 2.0 * 440.0 / sr;
        let mid = zcr[10];
        assert!((mid - expected).abs() / expected < 0.1);
    }

    #[test]
    fn test_short_uncentered_is_empty() {
        assert!(zero_crossing_rate(&[1.0; 100], 2048, 512, false).is_empty());
    }
}
