//! Sample buffer handed over by the (external) decoder

pub mod sample_buffer;

pub use sample_buffer::SampleBuffer;
