//! # I/O Module
//!
//! File boundaries of the sampler. Converts between on-disk snapshots and the
//! in-memory call store, copying states and posterior accumulator.

pub mod snapshot;

pub use snapshot::{SampleCall, SamplerInputs, SamplerOutput, SamplerSnapshot};
