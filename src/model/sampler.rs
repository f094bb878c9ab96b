//! # Gibbs Sampler
//!
//! Iteratively resamples the genotypes of ambiguous samples (known
//! heterozygotes of unknown phase, and missing calls), then replaces each
//! call by the genotype class with the largest accumulated posterior.
//!
//! ## Sweep
//! Every iteration shuffles the ambiguous samples and visits each once:
//! 1. estimate both haplotypes' allele distributions from their copying states
//!    (looked up in the call store, so earlier visits of the sweep are seen)
//! 2. draw a genotype from prior x haplotype likelihoods and write it back
//! 3. past burn-in, add the unnormalized posterior to the accumulator
//!
//! ## Finalization
//! Visits the ambiguous samples in ascending order, independent of any
//! shuffle, and writes the argmax class of each accumulator (lowest class
//! index wins ties, so an empty accumulator resolves to `0|0`).

use std::sync::Arc;

use bitvec::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, instrument, warn};

use crate::data::calls::CallStore;
use crate::data::copying::CopyingStates;
use crate::data::genotype::GenotypeClass;
use crate::data::haplotype::SampleIdx;
use crate::data::posterior::PosteriorAccumulator;
use crate::error::{RephaseError, Result};
use crate::model::estimator::estimate_haplotypes;
use crate::model::gibbs::{draw_genotype, GibbsDraw};
use crate::model::parameters::SamplerParams;
use crate::model::random::RandomSource;
use crate::utils::telemetry::{Stage, TelemetryBlackboard};

/// Samples per rayon task in the finalization argmax
const FINALIZE_MIN_CHUNK: usize = 4096;

/// Samples between telemetry counter updates
const TELEMETRY_BATCH: usize = 256;

/// Statistics of one sweep over the ambiguous samples
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepStats {
    pub iteration: usize,
    pub visited: usize,
    /// Samples whose call differs from the one they entered the sweep with
    pub changed: usize,
    /// Whether posteriors were added to the accumulator
    pub accumulated: bool,
}

/// Outcome of a complete run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub n_resampled: usize,
    pub n_missing: usize,
    /// Final calls that differ from the call before the run
    pub n_changed: usize,
    /// Non-missing samples whose phase was swapped
    pub n_phase_flips: usize,
    /// Samples finalized without post-burn-in posterior mass
    pub n_without_evidence: usize,
}

pub struct GibbsSampler<'a> {
    params: SamplerParams,
    copying: &'a CopyingStates,
    /// Ambiguous samples; reshuffled in place each sweep
    order: Vec<u32>,
    telemetry: Option<Arc<TelemetryBlackboard>>,
}

impl<'a> GibbsSampler<'a> {
    pub fn new(params: SamplerParams, copying: &'a CopyingStates, unphased: &[u32]) -> Self {
        Self {
            params,
            copying,
            order: unphased.to_vec(),
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<TelemetryBlackboard>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Check array shapes, index ranges and copying probabilities.
    pub fn validate(&self, calls: &CallStore, posterior: &PosteriorAccumulator) -> Result<()> {
        let n_samples = calls.n_samples();
        if self.copying.n_slots() != calls.n_haps() {
            return Err(RephaseError::invalid_data(format!(
                "{} copying slots for {} haplotypes",
                self.copying.n_slots(),
                calls.n_haps()
            )));
        }
        if posterior.n_samples() != n_samples {
            return Err(RephaseError::invalid_data(format!(
                "posterior accumulator sized for {} samples, call store has {}",
                posterior.n_samples(),
                n_samples
            )));
        }
        self.copying.validate(calls.n_haps())?;

        let mut seen = bitvec![u64, Lsb0; 0; n_samples];
        for &s in &self.order {
            let s = s as usize;
            if s >= n_samples {
                return Err(RephaseError::invalid_data(format!(
                    "ambiguous sample {} out of range for {} samples",
                    s, n_samples
                )));
            }
            if seen.replace(s, true) {
                return Err(RephaseError::invalid_data(format!(
                    "ambiguous sample {} listed more than once",
                    s
                )));
            }
        }
        Ok(())
    }

    /// Run all iterations and the finalization pass.
    ///
    /// On error the call store and accumulator are left partially updated and
    /// must be discarded.
    #[instrument(skip_all, fields(n_unphased = self.order.len(), n_iterations = self.params.n_iterations()))]
    pub fn iterate<R: RandomSource + ?Sized>(
        &mut self,
        calls: &mut CallStore,
        posterior: &mut PosteriorAccumulator,
        rng: &mut R,
    ) -> Result<RunSummary> {
        self.validate(calls, posterior)?;

        let mut initial: Vec<(u32, GenotypeClass)> = self
            .order
            .iter()
            .map(|&s| (s, calls.genotype(SampleIdx::new(s))))
            .collect();
        initial.sort_unstable_by_key(|&(s, _)| s);

        if let Some(t) = &self.telemetry {
            t.set_total_iterations(self.params.n_iterations());
            t.set_total_samples(self.order.len());
        }

        for iter in 0..self.params.n_iterations() {
            let _span = info_span!("sweep", iter).entered();
            let stats = self.sweep(iter, calls, posterior, rng)?;
            debug!(
                iteration = stats.iteration,
                changed = stats.changed,
                accumulated = stats.accumulated,
                "sweep complete"
            );
        }

        if let Some(t) = &self.telemetry {
            t.set_stage(Stage::Finalizing);
        }
        let n_without_evidence = self.finalize(calls, posterior);

        let mut summary = RunSummary {
            n_resampled: initial.len(),
            n_without_evidence,
            ..RunSummary::default()
        };
        for &(s, before) in &initial {
            let sample = SampleIdx::new(s);
            let missing = calls.is_missing(sample);
            if missing {
                summary.n_missing += 1;
            }
            if calls.genotype(sample) != before {
                summary.n_changed += 1;
                if !missing && calls.is_het(sample) {
                    summary.n_phase_flips += 1;
                }
            }
        }
        info!(
            resampled = summary.n_resampled,
            missing = summary.n_missing,
            changed = summary.n_changed,
            phase_flips = summary.n_phase_flips,
            "gibbs sampling finished"
        );
        Ok(summary)
    }

    /// One pass over the ambiguous samples in a fresh random order.
    pub fn sweep<R: RandomSource + ?Sized>(
        &mut self,
        iter: usize,
        calls: &mut CallStore,
        posterior: &mut PosteriorAccumulator,
        rng: &mut R,
    ) -> Result<SweepStats> {
        let accumulated = !self.params.is_burnin(iter);
        if let Some(t) = &self.telemetry {
            t.set_stage(if accumulated { Stage::Sampling } else { Stage::Burnin });
            t.begin_iteration(iter + 1);
        }

        rng.shuffle(&mut self.order);

        let mut changed = 0;
        for (i, &s) in self.order.iter().enumerate() {
            let sample = SampleIdx::new(s);
            let before = calls.genotype(sample);
            let draw = self.step(sample, iter, calls, posterior, rng)?;
            if draw.class != before {
                changed += 1;
            }
            if let Some(t) = &self.telemetry {
                if (i + 1) % TELEMETRY_BATCH == 0 {
                    t.add_samples_processed(TELEMETRY_BATCH as u64);
                }
            }
        }
        if let Some(t) = &self.telemetry {
            t.add_samples_processed((self.order.len() % TELEMETRY_BATCH) as u64);
        }

        Ok(SweepStats {
            iteration: iter,
            visited: self.order.len(),
            changed,
            accumulated,
        })
    }

    /// Resample one sample: estimate, draw, write back, and accumulate past burn-in.
    pub fn step<R: RandomSource + ?Sized>(
        &self,
        sample: SampleIdx,
        iter: usize,
        calls: &mut CallStore,
        posterior: &mut PosteriorAccumulator,
        rng: &mut R,
    ) -> Result<GibbsDraw> {
        let missing = calls.is_missing(sample);
        if !missing && !calls.is_het(sample) {
            return Err(RephaseError::NotHeterozygous { sample: sample.0 });
        }

        let probs = estimate_haplotypes(sample, self.copying, &*calls)?;
        let draw = draw_genotype(sample, missing, &probs, rng)?;
        calls.set_genotype(sample, draw.class);

        if !self.params.is_burnin(iter) {
            posterior.add(sample, &draw.posterior);
        }
        Ok(draw)
    }

    /// Write the consensus call of every ambiguous sample, in ascending order.
    ///
    /// Every sample takes the argmax of its accumulator. Returns the number of
    /// samples with no post-burn-in mass, which resolve to the first class.
    #[instrument(skip_all)]
    pub fn finalize(&self, calls: &mut CallStore, posterior: &PosteriorAccumulator) -> usize {
        let mut sorted = self.order.clone();
        sorted.sort_unstable();

        let decisions: Vec<(SampleIdx, GenotypeClass, bool)> = sorted
            .par_iter()
            .with_min_len(FINALIZE_MIN_CHUNK)
            .map(|&s| {
                let sample = SampleIdx::new(s);
                (sample, posterior.argmax(sample), posterior.is_empty(sample))
            })
            .collect();

        let mut n_without_evidence = 0;
        for (sample, class, empty) in decisions {
            if empty {
                n_without_evidence += 1;
            }
            calls.set_genotype(sample, class);
        }
        if n_without_evidence > 0 {
            warn!(
                n_without_evidence,
                "samples had no post-burn-in posterior mass, finalized as {}",
                GenotypeClass::ALL[0]
            );
        }
        n_without_evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sample 0 is a known het resampled against scaffold sample 1 (haps 2 = REF, 3 = ALT).
    fn skewed_fixture() -> (CallStore, CopyingStates) {
        let calls = CallStore::from_parts(&[true, false, false, true], &[false, false]).unwrap();
        let copying = CopyingStates::from_parallel(
            vec![vec![2, 3], vec![2, 3], vec![], vec![]],
            vec![vec![0.9, 0.1], vec![0.1, 0.9], vec![], vec![]],
        )
        .unwrap();
        (calls, copying)
    }

    #[test]
    fn test_skewed_het_converges_to_01() {
        let (mut calls, copying) = skewed_fixture();
        let mut posterior = PosteriorAccumulator::new(2);
        let params = SamplerParams::new(200, 20).unwrap();
        let mut sampler = GibbsSampler::new(params, &copying, &[0]);
        let mut rng = crate::model::random::SeededRandom::new(1);

        let summary = sampler.iterate(&mut calls, &mut posterior, &mut rng).unwrap();
        assert_eq!(calls.genotype(SampleIdx::new(0)), GenotypeClass::Het01);
        assert_eq!(summary.n_resampled, 1);
        assert_eq!(summary.n_changed, 1);
        assert_eq!(summary.n_phase_flips, 1);
        let acc = posterior.get(SampleIdx::new(0));
        assert_eq!(acc[0], 0.0);
        assert_eq!(acc[3], 0.0);
        assert!((acc[1] - 0.81 * 180.0).abs() < 1e-2);
        // scaffold untouched
        assert_eq!(calls.genotype(SampleIdx::new(1)), GenotypeClass::Het01);
        assert!(posterior.is_empty(SampleIdx::new(1)));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_range() {
        let (calls, copying) = skewed_fixture();
        let posterior = PosteriorAccumulator::new(2);
        let params = SamplerParams::new(1, 0).unwrap();

        let dup = GibbsSampler::new(params, &copying, &[0, 0]);
        assert!(dup.validate(&calls, &posterior).is_err());

        let oob = GibbsSampler::new(params, &copying, &[2]);
        assert!(oob.validate(&calls, &posterior).is_err());

        let wrong_acc = GibbsSampler::new(params, &copying, &[0]);
        assert!(wrong_acc.validate(&calls, &PosteriorAccumulator::new(3)).is_err());
    }

    #[test]
    fn test_homozygous_non_missing_is_rejected() {
        let (mut calls, copying) = skewed_fixture();
        calls.set_genotype(SampleIdx::new(0), GenotypeClass::HomAlt);
        let mut posterior = PosteriorAccumulator::new(2);
        let mut sampler = GibbsSampler::new(SamplerParams::new(1, 0).unwrap(), &copying, &[0]);
        let mut rng = crate::model::random::SeededRandom::new(1);
        let err = sampler.iterate(&mut calls, &mut posterior, &mut rng).unwrap_err();
        assert!(matches!(err, RephaseError::NotHeterozygous { sample: 0 }));
    }

    #[test]
    fn test_all_burnin_finalizes_to_first_class() {
        let (mut calls, copying) = skewed_fixture();
        calls.set_genotype(SampleIdx::new(0), GenotypeClass::Het10);
        let mut posterior = PosteriorAccumulator::new(2);
        let mut sampler = GibbsSampler::new(SamplerParams::new(3, 3).unwrap(), &copying, &[0]);
        let mut rng = crate::model::random::SeededRandom::new(9);
        let summary = sampler.iterate(&mut calls, &mut posterior, &mut rng).unwrap();
        assert!(posterior.as_slice().iter().all(|&w| w == 0.0));
        assert_eq!(posterior.argmax(SampleIdx::new(0)), GenotypeClass::HomRef);
        assert_eq!(calls.genotype(SampleIdx::new(0)), GenotypeClass::HomRef);
        assert_eq!(summary.n_without_evidence, 1);
        assert_eq!(summary.n_changed, 1);
        assert_eq!(summary.n_phase_flips, 0);
    }
}
