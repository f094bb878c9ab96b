//! # Copying States
//!
//! Sparse output of the upstream copying model: for every haplotype slot, the
//! panel haplotypes it may copy from and the probability of each. States and
//! probabilities live in one slot struct so they cannot drift out of alignment.

use serde::{Deserialize, Serialize};

use crate::data::haplotype::HapIdx;
use crate::error::{RephaseError, Result};

/// Candidate states of one (sample, haplotype) slot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyingSlot {
    states: Vec<u32>,
    probs: Vec<f32>,
}

impl CopyingSlot {
    pub fn new(states: Vec<u32>, probs: Vec<f32>) -> Result<Self> {
        if states.len() != probs.len() {
            return Err(RephaseError::invalid_data(format!(
                "{} copying states but {} copying probabilities",
                states.len(),
                probs.len()
            )));
        }
        Ok(Self { states, probs })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// (state, probability) pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (HapIdx, f32)> + '_ {
        self.states
            .iter()
            .zip(&self.probs)
            .map(|(&s, &p)| (HapIdx::new(s), p))
    }
}

/// Copying states for all `2N` haplotype slots
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CopyingStates {
    slots: Vec<CopyingSlot>,
}

impl CopyingStates {
    /// Zip parallel per-slot state and probability lists
    pub fn from_parallel(cstates: Vec<Vec<u32>>, cprobs: Vec<Vec<f32>>) -> Result<Self> {
        if cstates.len() != cprobs.len() {
            return Err(RephaseError::invalid_data(format!(
                "{} state lists but {} probability lists",
                cstates.len(),
                cprobs.len()
            )));
        }
        let slots = cstates
            .into_iter()
            .zip(cprobs)
            .enumerate()
            .map(|(h, (s, p))| {
                CopyingSlot::new(s, p).map_err(|e| {
                    RephaseError::invalid_data(format!("haplotype slot {}: {}", h, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { slots })
    }

    #[inline]
    pub fn n_slots(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot(&self, hap: HapIdx) -> &CopyingSlot {
        &self.slots[hap.as_usize()]
    }

    /// Check state indices against a panel of `n_haps` haplotypes and that
    /// every probability is finite and non-negative.
    pub fn validate(&self, n_haps: usize) -> Result<()> {
        for (h, slot) in self.slots.iter().enumerate() {
            for (state, p) in slot.iter() {
                if state.as_usize() >= n_haps {
                    return Err(RephaseError::invalid_data(format!(
                        "haplotype slot {}: state {} out of range for {} haplotypes",
                        h, state.0, n_haps
                    )));
                }
                if !p.is_finite() || p < 0.0 {
                    return Err(RephaseError::invalid_data(format!(
                        "haplotype slot {}: invalid copying probability {} for state {}",
                        h, p, state.0
                    )));
                }
            }
        }
        Ok(())
    }
}
