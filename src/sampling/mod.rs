//! Randomness sources for lattice noise.

pub mod noise;

pub use noise::{NoiseSampler, SampleError};
