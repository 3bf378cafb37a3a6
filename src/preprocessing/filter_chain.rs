//! Conditional high-pass / low-pass / band-pass filter chain
//!
//! Stages run in a fixed order, each filtering the output of the previous one:
//!
//! 1. High-pass when `highpass > FILTER_LOWER_BOUND`
//! 2. Low-pass when `lowpass > FILTER_LOWER_BOUND` and `lowpass < sample_rate / 2`
//! 3. Band-pass when `bandpass_low > FILTER_LOWER_BOUND` and `bandpass_high < sample_rate / 2`
//!
//! The band-pass guard checks neither `bandpass_low < bandpass_high` nor
//! `bandpass_low < sample_rate / 2`; those cases reach the designer and fail there
//! with `AnalysisError::InvalidCutoff`. The high-pass guard has no Nyquist check
//! either. Design errors propagate unmodified.

use serde::{Deserialize, Serialize};

use super::butterworth::{design, Cutoff, FilterType};
use super::lfilter::apply;
use crate::error::AnalysisError;
use crate::io::SampleBuffer;

/// Lowest cutoff a caller may select (Hz)
pub const FILTER_LOWER_BOUND: i32 = 0;

/// Highest cutoff a caller may select (Hz)
pub const FILTER_UPPER_BOUND: i32 = 20000;

/// Sentinel presented to callers as "filter off"
pub const DISABLED_CUTOFF: i32 = FILTER_LOWER_BOUND - 1;

/// Caller-supplied cutoffs in Hz; any value `<= FILTER_LOWER_BOUND` disables its stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// High-pass cutoff
    pub highpass: i32,
    /// Low-pass cutoff
    pub lowpass: i32,
    /// Band-pass lower edge
    pub bandpass_low: i32,
    /// Band-pass upper edge
    pub bandpass_high: i32,
}

impl FilterSettings {
    /// All stages disabled
    pub fn disabled() -> Self {
        Self {
            highpass: DISABLED_CUTOFF,
            lowpass: DISABLED_CUTOFF,
            bandpass_low: DISABLED_CUTOFF,
            bandpass_high: DISABLED_CUTOFF,
        }
    }

    /// Only a high-pass stage
    pub fn highpass(cutoff: i32) -> Self {
        Self {
            highpass: cutoff,
            ..Self::disabled()
        }
    }

    /// Only a low-pass stage
    pub fn lowpass(cutoff: i32) -> Self {
        Self {
            lowpass: cutoff,
            ..Self::disabled()
        }
    }

    /// Only a band-pass stage
    pub fn bandpass(low: i32, high: i32) -> Self {
        Self {
            bandpass_low: low,
            bandpass_high: high,
            ..Self::disabled()
        }
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

/// A filter stage that was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterStage {
    /// Response shape
    pub filter_type: FilterType,
    /// Lower (or only) cutoff in Hz
    pub low_hz: f64,
    /// Upper cutoff in Hz (band-pass only)
    pub high_hz: Option<f64>,
}

/// Output of the filter chain
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSignal {
    /// Filtered samples
    pub buffer: SampleBuffer,
    /// Stages that ran, in order
    pub stages: Vec<FilterStage>,
}

/// Run the filter chain over `buffer`
///
/// # Arguments
///
/// * `buffer` - Input samples (not modified)
/// * `settings` - Cutoffs for each stage
/// * `order` - Butterworth order used for every stage
///
/// # Errors
///
/// Propagates `AnalysisError::InvalidCutoff` from the designer for any stage that
/// passes its guard but describes an invalid filter.
pub fn run(
    buffer: &SampleBuffer,
    settings: &FilterSettings,
    order: usize,
) -> Result<FilteredSignal, AnalysisError> {
    let sample_rate = buffer.sample_rate();
    let nyquist = buffer.nyquist();

    let mut current = buffer.clone();
    let mut stages = Vec::new();

    if settings.highpass > FILTER_LOWER_BOUND {
        let stage = FilterStage {
            filter_type: FilterType::Highpass,
            low_hz: settings.highpass as f64,
            high_hz: None,
        };
        current = run_stage(&current, &stage, sample_rate, order)?;
        stages.push(stage);
    }

    if settings.lowpass > FILTER_LOWER_BOUND && (settings.lowpass as f64) < nyquist {
        let stage = FilterStage {
            filter_type: FilterType::Lowpass,
            low_hz: settings.lowpass as f64,
            high_hz: None,
        };
        current = run_stage(&current, &stage, sample_rate, order)?;
        stages.push(stage);
    }

    if settings.bandpass_low > FILTER_LOWER_BOUND && (settings.bandpass_high as f64) < nyquist {
        let stage = FilterStage {
            filter_type: FilterType::Bandpass,
            low_hz: settings.bandpass_low as f64,
            high_hz: Some(settings.bandpass_high as f64),
        };
        current = run_stage(&current, &stage, sample_rate, order)?;
        stages.push(stage);
    }

    if stages.is_empty() {
        log::debug!("Filter chain: all stages disabled, passing signal through");
    } else {
        log::debug!("Filter chain: applied {} stage(s): {:?}", stages.len(), stages);
    }

    Ok(FilteredSignal {
        buffer: current,
        stages,
    })
}

fn run_stage(
    buffer: &SampleBuffer,
    stage: &FilterStage,
    sample_rate: u32,
    order: usize,
) -> Result<SampleBuffer, AnalysisError> {
    let cutoff = match stage.high_hz {
        Some(high) => Cutoff::Band(stage.low_hz, high),
        None => Cutoff::Single(stage.low_hz),
    };
    let coefficients = design(order, cutoff, sample_rate, stage.filter_type)?;
    apply(buffer, &coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::butterworth::DEFAULT_FILTER_ORDER;

    const SR: u32 = 22050;

    fn sine(freq: f32, len: usize) -> SampleBuffer {
        let samples = (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect();
        SampleBuffer::new(samples, SR)
    }

    fn tail_rms(buffer: &SampleBuffer) -> f32 {
        let tail = &buffer.samples()[buffer.len() / 2..];
        (tail.iter().map(|v| v * v).sum::<f32>() / tail.len() as f32).sqrt()
    }

    #[test]
    fn test_disabled_passthrough() {
        let input = sine(440.0, 4096);
        let out = run(&input, &FilterSettings::disabled(), DEFAULT_FILTER_ORDER).unwrap();
        assert_eq!(out.buffer, input);
        assert!(out.stages.is_empty());
    }

    #[test]
    fn test_zero_cutoff_counts_as_disabled() {
        let input = sine(440.0, 1024);
        let settings = FilterSettings {
            highpass: 0,
            lowpass: 0,
            bandpass_low: 0,
            bandpass_high: 0,
        };
        let out = run(&input, &settings, DEFAULT_FILTER_ORDER).unwrap();
        assert_eq!(out.buffer, input);
    }

    #[test]
    fn test_lowpass_at_nyquist_is_skipped() {
        let input = sine(440.0, 1024);
        let out = run(&input, &FilterSettings::lowpass(11025), DEFAULT_FILTER_ORDER).unwrap();
        assert_eq!(out.buffer, input);
        assert!(out.stages.is_empty());
    }

    #[test]
    fn test_bandpass_high_at_nyquist_is_skipped() {
        let input = sine(440.0, 1024);
        let out = run(&input, &FilterSettings::bandpass(100, 15000), DEFAULT_FILTER_ORDER).unwrap();
        assert_eq!(out.buffer, input);
    }

    #[test]
    fn test_highpass_above_nyquist_is_rejected() {
        // The high-pass guard has no Nyquist check
        let input = sine(440.0, 1024);
        let result = run(&input, &FilterSettings::highpass(15000), DEFAULT_FILTER_ORDER);
        assert!(matches!(result, Err(AnalysisError::InvalidCutoff(_))));
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let input = sine(440.0, 1024);
        let result = run(&input, &FilterSettings::bandpass(100, 50), DEFAULT_FILTER_ORDER);
        assert!(matches!(result, Err(AnalysisError::InvalidCutoff(_))));
    }

    #[test]
    fn test_bandpass_with_disabled_high_is_rejected() {
        // high = -1 passes the "< Nyquist" guard, the designer rejects it
        let input = sine(440.0, 1024);
        let settings = FilterSettings::bandpass(100, DISABLED_CUTOFF);
        let result = run(&input, &settings, DEFAULT_FILTER_ORDER);
        assert!(matches!(result, Err(AnalysisError::InvalidCutoff(_))));
    }

    #[test]
    fn test_stage_order_and_length() {
        let input = sine(440.0, 8192);
        let settings = FilterSettings {
            highpass: 100,
            lowpass: 5000,
            bandpass_low: 200,
            bandpass_high: 3000,
        };
        let out = run(&input, &settings, DEFAULT_FILTER_ORDER).unwrap();
        assert_eq!(out.buffer.len(), input.len());
        let kinds: Vec<FilterType> = out.stages.iter().map(|s| s.filter_type).collect();
        assert_eq!(
            kinds,
            vec![FilterType::Highpass, FilterType::Lowpass, FilterType::Bandpass]
        );
    }

    #[test]
    fn test_cascaded_highpass_attenuates_more() {
        let input = sine(440.0, SR as usize);
        let settings = FilterSettings::highpass(1000);
        let once = run(&input, &settings, DEFAULT_FILTER_ORDER).unwrap();
        let twice = run(&once.buffer, &settings, DEFAULT_FILTER_ORDER).unwrap();
        let (r0, r1, r2) = (tail_rms(&input), tail_rms(&once.buffer), tail_rms(&twice.buffer));
        assert!(r1 < r0);
        assert!(r2 < r1);
    }
}
