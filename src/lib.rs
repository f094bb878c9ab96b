//! # rephase Library
//!
//! Gibbs-sampling re-phaser for rare and missing genotypes. Given current
//! diploid calls and a copying model over a scaffold haplotype panel, it
//! resamples ambiguous genotypes and emits a consensus phased call from the
//! accumulated posterior.
//!
//! ## Modules
//! - `config`: CLI argument parsing and validation
//! - `data`: call store, copying states, posterior accumulator
//! - `error`: Error types and result aliases
//! - `io`: JSON sampler snapshots
//! - `model`: allele estimator, Gibbs step, sampler driver
//! - `pipelines`: High-level workflow orchestration
//! - `utils`: telemetry and threading

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use data::{
    CallStore, CopyingSlot, CopyingStates, GenotypeClass, HapIdx, PosteriorAccumulator, SampleIdx,
};
pub use error::{RephaseError, Result};
pub use io::{SamplerOutput, SamplerSnapshot};
pub use model::{GibbsSampler, RandomSource, RunSummary, SamplerParams, SeededRandom, HAP_PROB_FLOOR};
pub use pipelines::RephasePipeline;
