//! Signal preprocessing
//!
//! This module reshapes the frequency content of a signal before analysis:
//! - Butterworth filter design (low-pass, high-pass, band-pass)
//! - Causal recursive filtering
//! - The conditional high-pass → low-pass → band-pass chain

pub mod butterworth;
pub mod filter_chain;
pub mod lfilter;
