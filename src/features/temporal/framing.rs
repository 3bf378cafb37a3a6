//! Frame slicing shared by temporal and spectral analysis
//!
//! With `center = true` the signal is padded by `frame_size / 2` on both sides so
//! frame `i` is centred on sample `i * hop`, giving `1 + len / hop` frames.
//! Without centering, frames start at sample `i * hop` and only whole frames are
//! kept: `1 + (len - frame_size) / hop`, or none when `len < frame_size`.

/// Padding applied to both ends of a centred signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Zeros
    Constant,
    /// Repeat the first / last sample
    Edge,
}

/// Number of frames for a signal of `len` samples
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize, center: bool) -> usize {
    if hop_size == 0 {
        return 0;
    }
    if center {
        let padded = len + 2 * (frame_size / 2);
        if padded < frame_size {
            return 0;
        }
        1 + (padded - frame_size) / hop_size
    } else if len < frame_size {
        0
    } else {
        1 + (len - frame_size) / hop_size
    }
}

/// Pad `samples` by `pad` on both sides
pub fn pad_both(samples: &[f32], pad: usize, mode: PadMode) -> Vec<f32> {
    let (left, right) = match mode {
        PadMode::Constant => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };
    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    padded.extend(std::iter::repeat(left).take(pad));
    padded.extend_from_slice(samples);
    padded.extend(std::iter::repeat(right).take(pad));
    padded
}

/// Prepare the analysis signal: padded copy when centring, plain copy otherwise
pub fn analysis_signal(
    samples: &[f32],
    frame_size: usize,
    center: bool,
    mode: PadMode,
) -> Vec<f32> {
    if center {
        pad_both(samples, frame_size / 2, mode)
    } else {
        samples.to_vec()
    }
}

/// Iterate over the frames of an already padded signal
pub fn frames<'a>(
    signal: &'a [f32],
    frame_size: usize,
    hop_size: usize,
) -> impl Iterator<Item = &'a [f32]> + 'a {
    let n_frames = frame_count(signal.len(), frame_size, hop_size, false);
    (0..n_frames).map(move |i| &signal[i * hop_size..i * hop_size + frame_size])
}

/// Time in seconds of each frame index
pub fn frames_to_time(n_frames: usize, hop_size: usize, sample_rate: u32) -> Vec<f32> {
    if sample_rate == 0 {
        return vec![0.0; n_frames];
    }
    (0..n_frames)
        .map(|i| (i * hop_size) as f32 / sample_rate as f32)
        .collect()
}
