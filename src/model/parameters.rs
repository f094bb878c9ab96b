//! # Sampler Parameters
//!
//! Iteration schedule of the Gibbs sampler. The first `n_burnin` iterations
//! move the chain but contribute nothing to the posterior accumulator.

use crate::error::{RephaseError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerParams {
    n_iterations: usize,
    n_burnin: usize,
}

impl SamplerParams {
    /// Requires `n_burnin <= n_iterations`
    pub fn new(n_iterations: usize, n_burnin: usize) -> Result<Self> {
        if n_burnin > n_iterations {
            return Err(RephaseError::config(format!(
                "burn-in ({}) exceeds total iterations ({})",
                n_burnin, n_iterations
            )));
        }
        Ok(Self {
            n_iterations,
            n_burnin,
        })
    }

    #[inline]
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Whether iteration `iter` (0-based) is discarded
    #[inline]
    pub fn is_burnin(&self, iter: usize) -> bool {
        iter < self.n_burnin
    }

    /// Iterations whose posteriors are accumulated
    pub fn n_main(&self) -> usize {
        self.n_iterations - self.n_burnin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule() {
        let params = SamplerParams::new(10, 4).unwrap();
        assert!(params.is_burnin(3));
        assert!(!params.is_burnin(4));
        assert_eq!(params.n_main(), 6);
    }

    #[test]
    fn test_burnin_bounds() {
        assert!(SamplerParams::new(5, 5).is_ok());
        assert!(SamplerParams::new(0, 0).is_ok());
        assert!(SamplerParams::new(5, 6).is_err());
    }
}
