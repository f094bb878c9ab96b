//! # Configuration Logic
//!
//! CLI argument parsing and validation.
//!
//! ## Example CLI
//! ```bash
//! rephase --input snapshot.json --out rephased.json --iterations 10 --burnin 5 --seed 42
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::error::{RephaseError, Result};
use crate::model::parameters::SamplerParams;
use crate::utils::threading::default_threads;

/// Gibbs re-phasing of rare and missing genotypes
#[derive(Parser, Debug, Clone)]
#[command(name = "rephase", version, about)]
pub struct Config {
    /// Sampler input snapshot (JSON)
    #[arg(long)]
    pub input: PathBuf,

    /// Output path for the rephased snapshot (JSON)
    #[arg(long)]
    pub out: PathBuf,

    /// Total MCMC iterations
    #[arg(long, default_value_t = 10)]
    pub iterations: usize,

    /// Leading iterations excluded from the posterior
    #[arg(long, default_value_t = 5)]
    pub burnin: usize,

    /// Random seed
    #[arg(long, default_value_t = 15052011)]
    pub seed: u64,

    /// Worker threads for the finalization pass (default: all cores)
    #[arg(long)]
    pub nthreads: Option<usize>,

    /// Seconds between progress heartbeats (0 disables)
    #[arg(long, default_value_t = 30)]
    pub heartbeat: u64,

    /// Print span timings
    #[arg(long)]
    pub profile: bool,

    /// Debug-level logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Config {
    /// Parse from the process arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(RephaseError::config("--iterations must be at least 1"));
        }
        if self.burnin > self.iterations {
            return Err(RephaseError::config(format!(
                "--burnin ({}) must not exceed --iterations ({})",
                self.burnin, self.iterations
            )));
        }
        if self.nthreads == Some(0) {
            return Err(RephaseError::config("--nthreads must be at least 1"));
        }
        if !self.input.exists() {
            return Err(RephaseError::FileNotFound {
                path: self.input.clone(),
            });
        }
        Ok(())
    }

    pub fn nthreads(&self) -> usize {
        self.nthreads.unwrap_or_else(default_threads)
    }

    pub fn sampler_params(&self) -> Result<SamplerParams> {
        SamplerParams::new(self.iterations, self.burnin)
    }
}
