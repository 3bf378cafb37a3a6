//! Time-domain features
//!
//! Computed directly from samples with the same frame/hop layout as the
//! spectral features so all time axes line up:
//! - Zero-crossing rate
//! - RMS energy

pub mod framing;
pub mod rms;
pub mod zcr;

pub use rms::rms;
pub use zcr::zero_crossing_rate;
