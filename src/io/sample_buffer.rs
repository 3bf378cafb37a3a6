//! Immutable mono sample buffer

/// Mono audio samples at a fixed sample rate
///
/// Filter stages never modify a buffer in place; each stage produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap decoded samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Sample data
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Half the sample rate
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Duration in seconds (0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Take ownership of the sample data
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_nyquist() {
        let buffer = SampleBuffer::new(vec![0.0; 22050], 22050);
        assert_eq!(buffer.len(), 22050);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-6);
        assert_eq!(buffer.nyquist(), 11025.0);
    }

    #[test]
    fn test_into_samples_returns_data() {
        let buffer = SampleBuffer::new(vec![0.25, -0.5, 1.0], 8000);
        assert_eq!(buffer.into_samples(), vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn test_zero_rate_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 10], 0);
        assert_eq!(buffer.duration_seconds(), 0.0);
    }
}
