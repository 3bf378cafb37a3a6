//! Onset detection
//!
//! Onset strength envelope from positive log-mel spectral flux, one value per
//! analysis frame.

pub mod strength;

pub use strength::onset_strength;
