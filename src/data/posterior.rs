//! # Posterior Accumulator
//!
//! Running sum of unnormalized genotype posteriors, four slots per sample in
//! `GenotypeClass` index order. Only the sampler adds to it, and only after
//! burn-in.

use crate::data::genotype::{GenotypeClass, N_GENOTYPE_CLASSES};
use crate::data::haplotype::SampleIdx;

#[derive(Clone, Debug, PartialEq)]
pub struct PosteriorAccumulator {
    pprobs: Vec<f32>,
}

impl PosteriorAccumulator {
    /// Zeroed accumulator for `n_samples`
    pub fn new(n_samples: usize) -> Self {
        Self {
            pprobs: vec![0.0; n_samples * N_GENOTYPE_CLASSES],
        }
    }

    pub fn n_samples(&self) -> usize {
        self.pprobs.len() / N_GENOTYPE_CLASSES
    }

    pub fn reset(&mut self) {
        self.pprobs.fill(0.0);
    }

    /// Accumulated weights of one sample
    #[inline]
    pub fn get(&self, sample: SampleIdx) -> &[f32] {
        let off = sample.posterior_offset();
        &self.pprobs[off..off + N_GENOTYPE_CLASSES]
    }

    /// Add one posterior weight vector element-wise
    #[inline]
    pub fn add(&mut self, sample: SampleIdx, weights: &[f32; N_GENOTYPE_CLASSES]) {
        let off = sample.posterior_offset();
        for (acc, w) in self.pprobs[off..off + N_GENOTYPE_CLASSES].iter_mut().zip(weights) {
            *acc += *w;
        }
    }

    /// Whether nothing has been accumulated for this sample
    pub fn is_empty(&self, sample: SampleIdx) -> bool {
        self.get(sample).iter().all(|&w| w == 0.0)
    }

    /// Class with the largest accumulated weight; the lowest index wins ties.
    pub fn argmax(&self, sample: SampleIdx) -> GenotypeClass {
        let acc = self.get(sample);
        let mut best = 0;
        for (k, &w) in acc.iter().enumerate().skip(1) {
            if w > acc[best] {
                best = k;
            }
        }
        GenotypeClass::ALL[best]
    }

    /// Accumulated weights normalized to sum to one, `None` if empty
    pub fn normalized(&self, sample: SampleIdx) -> Option<[f32; N_GENOTYPE_CLASSES]> {
        let acc = self.get(sample);
        let sum: f32 = acc.iter().sum();
        if sum <= 0.0 {
            return None;
        }
        let mut out = [0.0f32; N_GENOTYPE_CLASSES];
        for (o, &w) in out.iter_mut().zip(acc) {
            *o = w / sum;
        }
        Some(out)
    }

    /// Normalized mass of the winning class
    pub fn confidence(&self, sample: SampleIdx) -> Option<f32> {
        let best = self.argmax(sample);
        self.normalized(sample).map(|p| p[best.index()])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.pprobs
    }
}
