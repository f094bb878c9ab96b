//! # Centralized Error Handling
//!
//! Unified error types for the entire crate using `thiserror`.
//!
//! The sampler has no recoverable failure modes: every variant below that
//! originates in `model` is a broken input contract, and the run that
//! produced it must be abandoned.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for rephase operations
#[derive(Error, Debug)]
pub enum RephaseError {
    /// I/O errors (file missing, permission denied, read/write failures)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid data errors (length mismatches, out-of-range indices)
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Configuration errors (invalid CLI arguments)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File not found errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The copying probabilities of a haplotype slot sum to zero or overflow
    #[error(
        "Degenerate haplotype mass: sample {sample} haplotype {hap} has no usable copying probability over {states} states"
    )]
    DegenerateHaplotypeMass { sample: u32, hap: u8, states: usize },

    /// The genotype prior and haplotype likelihoods leave no admissible class
    #[error("Degenerate genotype posterior: sample {sample} (missing={missing}) has zero posterior mass")]
    DegenerateGenotypePosterior { sample: u32, missing: bool },

    /// An ambiguous individual has no candidate copying states for a haplotype
    #[error("Sample {sample} haplotype {hap} has no candidate copying states")]
    EmptyCopyingStates { sample: u32, hap: u8 },

    /// A non-missing ambiguous individual is not heterozygous
    #[error("Sample {sample} is neither missing nor heterozygous")]
    NotHeterozygous { sample: u32 },
}

/// Type alias for Results using RephaseError
pub type Result<T> = std::result::Result<T, RephaseError>;

impl RephaseError {
    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error is a violated sampler precondition (as opposed to I/O or setup)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::DegenerateHaplotypeMass { .. }
                | Self::DegenerateGenotypePosterior { .. }
                | Self::EmptyCopyingStates { .. }
                | Self::NotHeterozygous { .. }
        )
    }
}
