//! # Data Module
//!
//! In-memory state the sampler reads and mutates.
//!
//! - **Zero-cost newtypes:** `SampleIdx`, `HapIdx` keep sample and haplotype
//!   indices apart at compile time.
//! - **Packed calls:** one bit per haplotype allele in `CallStore`.
//! - **Aligned slots:** copying states and probabilities are stored together
//!   per haplotype slot.

pub mod calls;
pub mod copying;
pub mod genotype;
pub mod haplotype;
pub mod posterior;

// Re-export commonly used types
pub use calls::CallStore;
pub use copying::{CopyingSlot, CopyingStates};
pub use genotype::{GenotypeClass, N_GENOTYPE_CLASSES};
pub use haplotype::{HapIdx, SampleIdx};
pub use posterior::PosteriorAccumulator;
