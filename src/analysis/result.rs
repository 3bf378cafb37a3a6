//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::features::temporal::framing::frames_to_time;
use crate::preprocessing::filter_chain::FilterStage;

/// Feature kinds in result order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Filtered signal itself
    Waveform,
    /// Magnitude spectrogram in dB (bins × frames)
    Spectrogram,
    /// Mel-frequency cepstral coefficients (coefficients × frames)
    Mfcc,
    /// Zero-crossing rate per frame
    ZeroCrossingRate,
    /// Spectral centroid per frame (Hz)
    SpectralCentroid,
    /// Spectral bandwidth per frame (Hz)
    SpectralBandwidth,
    /// RMS energy per frame
    Rms,
    /// Spectral contrast (bands × frames, dB)
    SpectralContrast,
    /// Spectral rolloff per frame (Hz)
    SpectralRolloff,
    /// Local tempo per frame (BPM)
    Tempo,
    /// Tempogram (lags × frames)
    Tempogram,
}

impl FeatureKind {
    /// Every kind, in result order
    pub const ALL: [FeatureKind; 11] = [
        FeatureKind::Waveform,
        FeatureKind::Spectrogram,
        FeatureKind::Mfcc,
        FeatureKind::ZeroCrossingRate,
        FeatureKind::SpectralCentroid,
        FeatureKind::SpectralBandwidth,
        FeatureKind::Rms,
        FeatureKind::SpectralContrast,
        FeatureKind::SpectralRolloff,
        FeatureKind::Tempo,
        FeatureKind::Tempogram,
    ];

    /// Display title
    ///
    /// # Example
    ///
    /// ```
    /// use prism_dsp::FeatureKind;
    ///
    /// assert_eq!(FeatureKind::Rms.title(), "RMS Energy");
    /// ```
    pub fn title(&self) -> &'static str {
        match self {
            FeatureKind::Waveform => "Waveform",
            FeatureKind::Spectrogram => "Spectrogram",
            FeatureKind::Mfcc => "MFCC",
            FeatureKind::ZeroCrossingRate => "Zero Crossing Rate",
            FeatureKind::SpectralCentroid => "Spectral Centroid",
            FeatureKind::SpectralBandwidth => "Spectral Bandwidth",
            FeatureKind::Rms => "RMS Energy",
            FeatureKind::SpectralContrast => "Spectral Contrast",
            FeatureKind::SpectralRolloff => "Spectral Rolloff",
            FeatureKind::Tempo => "Tempo",
            FeatureKind::Tempogram => "Tempogram",
        }
    }

    /// One-line description for display next to the title
    pub fn description(&self) -> &'static str {
        match self {
            FeatureKind::Waveform => "Visual representation of the audio signal over time.",
            FeatureKind::Spectrogram => {
                "Graphical representation of the spectrum of frequencies in a sound signal \
                 as they vary with time."
            }
            FeatureKind::Mfcc => {
                "Mel-frequency cepstral coefficients, representing the short-term power \
                 spectrum of a sound."
            }
            FeatureKind::ZeroCrossingRate => {
                "Rate at which the signal changes from positive to negative or back."
            }
            FeatureKind::SpectralCentroid => {
                "Indicates where the center of mass of the spectrum is located."
            }
            FeatureKind::SpectralBandwidth => "The width of a range of frequencies.",
            FeatureKind::Rms => "Root Mean Square energy of the audio signal.",
            FeatureKind::SpectralContrast => {
                "Difference in amplitude between peaks and valleys in a sound spectrum."
            }
            FeatureKind::SpectralRolloff => {
                "Frequency below which a specified percentage of the total spectral energy lies."
            }
            FeatureKind::Tempo => "Estimated tempo of the audio signal.",
            FeatureKind::Tempogram => {
                "Localized autocorrelation of the onset strength envelope."
            }
        }
    }
}

/// Feature values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureData {
    /// One value per frame (or per sample for the waveform)
    Series(Vec<f32>),
    /// Row-major `rows × frames` (coefficient / bin / lag × time)
    Matrix(Vec<Vec<f32>>),
}

/// A named feature with the metadata needed to place it on a time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSeries {
    /// Feature kind
    pub kind: FeatureKind,
    /// Values
    pub data: FeatureData,
    /// Samples between consecutive frames (1 for the waveform)
    pub hop_length: usize,
    /// Sample rate of the analysed signal in Hz
    pub sample_rate: u32,
}

impl FeatureSeries {
    /// 1-D feature
    pub fn series(
        kind: FeatureKind,
        values: Vec<f32>,
        hop_length: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            kind,
            data: FeatureData::Series(values),
            hop_length,
            sample_rate,
        }
    }

    /// 2-D feature from frame-major values (`[frame][row]`), stored as `rows × frames`
    pub fn from_frames(
        kind: FeatureKind,
        frames: &[Vec<f32>],
        hop_length: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            kind,
            data: FeatureData::Matrix(transpose(frames)),
            hop_length,
            sample_rate,
        }
    }

    /// Number of time steps
    pub fn n_frames(&self) -> usize {
        match &self.data {
            FeatureData::Series(values) => values.len(),
            FeatureData::Matrix(rows) => rows.first().map_or(0, |row| row.len()),
        }
    }

    /// Number of rows (1 for a series)
    pub fn n_rows(&self) -> usize {
        match &self.data {
            FeatureData::Series(_) => 1,
            FeatureData::Matrix(rows) => rows.len(),
        }
    }

    /// Time in seconds of each frame: `i · hop / sample_rate`
    pub fn frame_times(&self) -> Vec<f32> {
        frames_to_time(self.n_frames(), self.hop_length, self.sample_rate)
    }

    /// Values of a 1-D feature
    pub fn as_series(&self) -> Option<&[f32]> {
        match &self.data {
            FeatureData::Series(values) => Some(values),
            FeatureData::Matrix(_) => None,
        }
    }

    /// Rows of a 2-D feature
    pub fn as_matrix(&self) -> Option<&[Vec<f32>]> {
        match &self.data {
            FeatureData::Matrix(rows) => Some(rows),
            FeatureData::Series(_) => None,
        }
    }

    /// Mean over all values (0 when empty)
    pub fn mean(&self) -> f32 {
        let (sum, count) = match &self.data {
            FeatureData::Series(values) => (values.iter().sum::<f32>(), values.len()),
            FeatureData::Matrix(rows) => (
                rows.iter().flatten().sum::<f32>(),
                rows.iter().map(|r| r.len()).sum(),
            ),
        };
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }
}

/// Soft conditions noticed during analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Fewer samples than one analysis window; frame features are padding-dominated or empty
    InsufficientSamples,
    /// The filtered signal is all zeros
    SilentSignal,
}

/// Run-level facts about an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Input length in seconds
    pub duration_seconds: f32,
    /// Hz
    pub sample_rate: u32,
    /// Wall-clock time spent in `analyze_audio`
    pub processing_time_ms: f32,
    /// Crate version that produced the result
    pub algorithm_version: String,
    /// Filter stages that ran, in order
    pub filters_applied: Vec<FilterStage>,
    /// Soft conditions noticed along the way
    pub flags: Vec<AnalysisFlag>,
}

/// Complete analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Features in fixed order
    pub features: Vec<FeatureSeries>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Feature of the given kind, if it was computed
    pub fn get(&self, kind: FeatureKind) -> Option<&FeatureSeries> {
        self.features.iter().find(|f| f.kind == kind)
    }

    /// Features in result order
    pub fn iter(&self) -> impl Iterator<Item = &FeatureSeries> {
        self.features.iter()
    }

    /// Kinds present, in result order
    pub fn kinds(&self) -> Vec<FeatureKind> {
        self.features.iter().map(|f| f.kind).collect()
    }
}

fn transpose(frames: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n_rows = frames.first().map_or(0, |f| f.len());
    (0..n_rows)
        .map(|r| frames.iter().map(|frame| frame[r]).collect())
        .collect()
}
