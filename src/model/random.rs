//! # Random Source
//!
//! The two random operations the sampler needs: shuffling the visitation order
//! and drawing a categorical index. Injected as a trait so tests can replay a
//! fixed script of draws.
//!
//! A run is reproducible when the source is seeded once and consumed in the
//! fixed order shuffle, then one draw per visited sample, per iteration.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniformly permute `items` in place
    fn shuffle(&mut self, items: &mut [u32]);

    /// Index `k` with probability `weights[k] / sum`; `sum` must be the
    /// (positive) sum of `weights`.
    fn sample(&mut self, weights: &[f32], sum: f32) -> usize;
}

/// Seeded pseudo-random source
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn shuffle(&mut self, items: &mut [u32]) {
        items.shuffle(&mut self.rng);
    }

    fn sample(&mut self, weights: &[f32], sum: f32) -> usize {
        let threshold = self.rng.random::<f32>() * sum;
        pick_by_threshold(weights, threshold)
    }
}

/// Walk the cumulative weights and return the first index whose interval
/// contains `threshold`.
///
/// Zero-weight entries are never returned. If rounding pushes `threshold` past
/// the total, the last positive-weight index is returned.
pub fn pick_by_threshold(weights: &[f32], mut threshold: f32) -> usize {
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if threshold < w {
            return i;
        }
        threshold -= w;
        last_positive = i;
    }
    last_positive
}
