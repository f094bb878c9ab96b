//! # Haplotype Allele Estimator
//!
//! Collapses the copying states of one haplotype slot into a two-way allele
//! distribution: each state's probability goes to the bucket of the allele it
//! carries, and the buckets are normalized by their sum.
//!
//! After both haplotypes of a sample are estimated, every value is floored at
//! [`HAP_PROB_FLOOR`] so no genotype class becomes permanently unreachable and
//! the products formed by the Gibbs step never underflow to zero.

use crate::data::copying::{CopyingSlot, CopyingStates};
use crate::data::haplotype::SampleIdx;
use crate::error::{RephaseError, Result};
use crate::model::allele_lookup::AlleleLookup;

/// Lower bound applied to every per-haplotype allele probability
pub const HAP_PROB_FLOOR: f32 = 1e-7;

/// Allele distributions of both haplotypes of a sample.
///
/// Layout: `[P(h0=0), P(h0=1), P(h1=0), P(h1=1)]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HaplotypeProbs([f32; 4]);

impl HaplotypeProbs {
    pub fn new(hap0: [f32; 2], hap1: [f32; 2]) -> Self {
        Self([hap0[0], hap0[1], hap1[0], hap1[1]])
    }

    /// P(haplotype `h` carries `allele`)
    #[inline]
    pub fn get(&self, h: usize, allele: bool) -> f32 {
        self.0[2 * h + allele as usize]
    }

    /// Clamp every value to at least [`HAP_PROB_FLOOR`]
    pub fn floored(mut self) -> Self {
        for p in self.0.iter_mut() {
            if *p < HAP_PROB_FLOOR {
                *p = HAP_PROB_FLOOR;
            }
        }
        self
    }

    pub fn as_array(&self) -> &[f32; 4] {
        &self.0
    }
}

/// Normalized `[P(0), P(1)]` for one slot, `None` when the slot carries no
/// mass or its total overflows.
pub fn slot_allele_probs<L: AlleleLookup + ?Sized>(slot: &CopyingSlot, lookup: &L) -> Option<[f32; 2]> {
    let mut bucket = [0.0f32; 2];
    for (state, p) in slot.iter() {
        bucket[lookup.allele(state) as usize] += p;
    }
    let sum = bucket[0] + bucket[1];
    if !(sum > 0.0 && sum.is_finite()) {
        return None;
    }
    Some([bucket[0] / sum, bucket[1] / sum])
}

/// Floored allele distributions for both haplotypes of `sample`.
///
/// Fails if either slot is empty or has zero total copying probability.
pub fn estimate_haplotypes<L: AlleleLookup + ?Sized>(
    sample: SampleIdx,
    copying: &CopyingStates,
    lookup: &L,
) -> Result<HaplotypeProbs> {
    let mut per_hap = [[0.0f32; 2]; 2];
    for (h, out) in per_hap.iter_mut().enumerate() {
        let slot = copying.slot(sample.hap(h));
        if slot.is_empty() {
            return Err(RephaseError::EmptyCopyingStates {
                sample: sample.0,
                hap: h as u8,
            });
        }
        *out = slot_allele_probs(slot, lookup).ok_or(RephaseError::DegenerateHaplotypeMass {
            sample: sample.0,
            hap: h as u8,
            states: slot.len(),
        })?;
    }
    Ok(HaplotypeProbs::new(per_hap[0], per_hap[1]).floored())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::calls::CallStore;

    fn panel() -> CallStore {
        // haps 0..4 belong to the resampled samples 0 and 1, 4 = REF, 5 = ALT
        CallStore::from_parts(&[false, true, false, true, false, true], &[false; 3]).unwrap()
    }

    #[test]
    fn test_slot_probs_sum_to_one() {
        let slot = CopyingSlot::new(vec![4, 5, 5], vec![0.3, 0.2, 0.5]).unwrap();
        let p = slot_allele_probs(&slot, &panel()).unwrap();
        assert!((p[0] - 0.3).abs() < 1e-6);
        assert!((p[1] - 0.7).abs() < 1e-6);
        assert!((p[0] + p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_slot_zero_mass() {
        let slot = CopyingSlot::new(vec![4, 5], vec![0.0, 0.0]).unwrap();
        assert_eq!(slot_allele_probs(&slot, &panel()), None);
    }

    #[test]
    fn test_slot_overflowing_mass() {
        let slot = CopyingSlot::new(vec![4, 4], vec![3e38, 3e38]).unwrap();
        assert_eq!(slot_allele_probs(&slot, &panel()), None);
    }

    #[test]
    fn test_overflowing_mass_is_rejected_per_haplotype() {
        let copying = CopyingStates::from_parallel(
            vec![vec![4], vec![5, 5], vec![], vec![]],
            vec![vec![1.0], vec![3e38, 3e38], vec![], vec![]],
        )
        .unwrap();
        let err = estimate_haplotypes(SampleIdx::new(0), &copying, &panel()).unwrap_err();
        assert!(matches!(
            err,
            RephaseError::DegenerateHaplotypeMass { sample: 0, hap: 1, states: 2 }
        ));
    }

    #[test]
    fn test_single_state_is_floored() {
        let copying = CopyingStates::from_parallel(
            vec![vec![4], vec![5], vec![], vec![]],
            vec![vec![1.0], vec![1.0], vec![], vec![]],
        )
        .unwrap();
        let probs = estimate_haplotypes(SampleIdx::new(0), &copying, &panel()).unwrap();
        assert_eq!(probs.get(0, false), 1.0);
        assert_eq!(probs.get(0, true), HAP_PROB_FLOOR);
        assert_eq!(probs.get(1, false), HAP_PROB_FLOOR);
        assert_eq!(probs.get(1, true), 1.0);
    }

    #[test]
    fn test_empty_slot_is_rejected() {
        let copying = CopyingStates::from_parallel(
            vec![vec![4], vec![], vec![], vec![]],
            vec![vec![1.0], vec![], vec![], vec![]],
        )
        .unwrap();
        let err = estimate_haplotypes(SampleIdx::new(0), &copying, &panel()).unwrap_err();
        assert!(matches!(err, RephaseError::EmptyCopyingStates { sample: 0, hap: 1 }));
    }

    #[test]
    fn test_zero_mass_is_rejected() {
        let copying = CopyingStates::from_parallel(
            vec![vec![4, 5], vec![4]],
            vec![vec![0.0, 0.0], vec![1.0]],
        )
        .unwrap();
        let err = estimate_haplotypes(SampleIdx::new(0), &copying, &panel()).unwrap_err();
        assert!(matches!(
            err,
            RephaseError::DegenerateHaplotypeMass { sample: 0, hap: 0, states: 2 }
        ));
    }

    #[test]
    fn test_floor_leaves_large_values() {
        let probs = HaplotypeProbs::new([0.0, 1.0], [0.25, 0.75]).floored();
        assert_eq!(probs.as_array(), &[HAP_PROB_FLOOR, 1.0, 0.25, 0.75]);
    }
}
