//! # Genotype Gibbs Step
//!
//! Combines the two haplotype allele distributions of a sample into a
//! posterior over the four ordered genotypes and draws one of them.
//!
//! ```text
//! posterior[a0|a1] = prior[a0|a1] * P(h0 = a0) * P(h1 = a1)
//! ```
//!
//! The prior is flat for samples whose original call was missing. For
//! non-missing samples the call is a known heterozygote, so only the two
//! phasings `0|1` and `1|0` keep weight and both homozygous classes get zero.

use crate::data::genotype::{GenotypeClass, N_GENOTYPE_CLASSES};
use crate::data::haplotype::SampleIdx;
use crate::error::{RephaseError, Result};
use crate::model::estimator::HaplotypeProbs;
use crate::model::random::RandomSource;

/// Prior weight of each genotype class
pub fn genotype_prior(missing: bool) -> [f32; N_GENOTYPE_CLASSES] {
    if missing {
        [1.0; N_GENOTYPE_CLASSES]
    } else {
        [0.0, 1.0, 1.0, 0.0]
    }
}

/// Unnormalized posterior weight of each genotype class
pub fn genotype_posterior(
    prior: &[f32; N_GENOTYPE_CLASSES],
    probs: &HaplotypeProbs,
) -> [f32; N_GENOTYPE_CLASSES] {
    let mut post = [0.0f32; N_GENOTYPE_CLASSES];
    for class in GenotypeClass::ALL {
        let (a0, a1) = class.alleles();
        post[class.index()] = prior[class.index()] * probs.get(0, a0) * probs.get(1, a1);
    }
    post
}

/// Outcome of one Gibbs step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GibbsDraw {
    pub class: GenotypeClass,
    /// Unnormalized posterior the class was drawn from
    pub posterior: [f32; N_GENOTYPE_CLASSES],
}

/// Draw a genotype for `sample` from its posterior.
///
/// Fails if the prior and the haplotype probabilities leave no mass.
pub fn draw_genotype<R: RandomSource + ?Sized>(
    sample: SampleIdx,
    missing: bool,
    probs: &HaplotypeProbs,
    rng: &mut R,
) -> Result<GibbsDraw> {
    let posterior = genotype_posterior(&genotype_prior(missing), probs);
    let sum: f32 = posterior.iter().sum();
    if !(sum > 0.0) {
        return Err(RephaseError::DegenerateGenotypePosterior {
            sample: sample.0,
            missing,
        });
    }
    let k = rng.sample(&posterior, sum);
    let class = GenotypeClass::from_index(k).ok_or_else(|| {
        RephaseError::invalid_data(format!("random source returned class {} (expected 0..4)", k))
    })?;
    Ok(GibbsDraw { class, posterior })
}
