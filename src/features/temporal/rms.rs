//! Root-mean-square energy per frame
//!
//! Centred frames use zero padding, so the first and last frames of a steady
//! signal read lower than the interior.

use super::framing::{analysis_signal, frames, PadMode};

/// Per-frame RMS amplitude
pub fn rms(samples: &[f32], frame_size: usize, hop_size: usize, center: bool) -> Vec<f32> {
    if frame_size == 0 || hop_size == 0 {
        return Vec::new();
    }

    let signal = analysis_signal(samples, frame_size, center, PadMode::Constant);

    let energy: Vec<f32> = frames(&signal, frame_size, hop_size)
        .map(|frame| {
            // Accumulate in f64; long frames of small values lose precision in f32
            let sum_sq: f64 = frame.iter().map(|&x| (x as f64) * (x as f64)).sum();
            (sum_sq / frame_size as f64).sqrt() as f32
        })
        .collect();

    log::debug!("RMS: {} frames", energy.len());

    energy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_signal() {
        let values = rms(&[0.5; 4096], 1024, 512, false);
        assert_eq!(values.len(), 7);
        assert!(values.iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_unit_sine_rms() {
        let x: Vec<f32> = (0..22050)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 22050.0).sin())
            .collect();
        let values = rms(&x, 2048, 512, true);
        assert_eq!(values.len(), 44);
        let interior = values[20];
        assert!((interior - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.02);
        // Zero padding pulls the first frame down
        assert!(values[0] < interior);
    }

    #[test]
    fn test_silence() {
        let values = rms(&[0.0; 3000], 2048, 512, true);
        assert!(values.iter().all(|&v| v == 0.0));
    }
}
