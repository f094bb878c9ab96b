//! # Model Module
//!
//! The Gibbs re-phasing model.
//!
//! ## Core Algorithms
//! - `allele_lookup`: allele carried by a copying state
//! - `estimator`: per-haplotype allele probabilities from copying states
//! - `gibbs`: genotype prior, posterior and the categorical draw
//! - `sampler`: sweep driver and consensus finalization
//! - `random`: injectable random source
//! - `parameters`: iteration and burn-in schedule

pub mod allele_lookup;
pub mod estimator;
pub mod gibbs;
pub mod parameters;
pub mod random;
pub mod sampler;

pub use allele_lookup::AlleleLookup;
pub use estimator::{estimate_haplotypes, HaplotypeProbs, HAP_PROB_FLOOR};
pub use gibbs::{draw_genotype, genotype_posterior, genotype_prior, GibbsDraw};
pub use parameters::SamplerParams;
pub use random::{RandomSource, SeededRandom};
pub use sampler::{GibbsSampler, RunSummary, SweepStats};
