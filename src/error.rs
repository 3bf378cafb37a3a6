//! Error types for the filtering and feature-extraction pipeline

use thiserror::Error;

/// Errors that can occur during filtering or feature analysis
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A cutoff frequency lies outside (0, Nyquist), or a band has low >= high
    #[error("Invalid cutoff: {0}")]
    InvalidCutoff(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The sample buffer or sample rate handed over by the decoder is unusable
    #[error("Decoded audio unavailable: {0}")]
    DecodeUnavailable(String),

    /// Numerical error (overflow, unstable filter, etc.)
    #[error("Numerical error: {0}")]
    NumericalError(String),
}
