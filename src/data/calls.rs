//! # Genotype Call Store
//!
//! Current best-guess alleles for every haplotype plus the per-sample
//! missingness flags of the original calls. Owned by the caller and lent
//! mutably to the sampler for the duration of a run.
//!
//! Layout: `alleles[2 * sample + h]`, one bit per haplotype (0 = REF, 1 = ALT).

use bitvec::prelude::*;

use crate::data::genotype::GenotypeClass;
use crate::data::haplotype::{HapIdx, SampleIdx};
use crate::error::{RephaseError, Result};

/// Largest population whose haplotype indices `2s + h` fit in `u32`
pub const MAX_SAMPLES: usize = 1 << 31;

fn check_sample_count(n_samples: usize) -> Result<()> {
    if n_samples > MAX_SAMPLES {
        return Err(RephaseError::invalid_data(format!(
            "{} samples exceed the haplotype index range ({} max)",
            n_samples, MAX_SAMPLES
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallStore {
    alleles: BitVec<u64, Lsb0>,
    missing: BitVec<u64, Lsb0>,
}

impl CallStore {
    /// All samples homozygous REF and not missing
    pub fn new(n_samples: usize) -> Self {
        Self {
            alleles: bitvec![u64, Lsb0; 0; n_samples * 2],
            missing: bitvec![u64, Lsb0; 0; n_samples],
        }
    }

    /// Build from per-haplotype alleles and per-sample missingness
    pub fn from_parts(alleles: &[bool], missing: &[bool]) -> Result<Self> {
        check_sample_count(missing.len())?;
        if alleles.len() != missing.len() * 2 {
            return Err(RephaseError::invalid_data(format!(
                "{} alleles given for {} samples (expected {})",
                alleles.len(),
                missing.len(),
                missing.len() * 2
            )));
        }
        Ok(Self {
            alleles: alleles.iter().copied().collect(),
            missing: missing.iter().copied().collect(),
        })
    }

    #[inline]
    pub fn n_samples(&self) -> usize {
        self.missing.len()
    }

    #[inline]
    pub fn n_haps(&self) -> usize {
        self.alleles.len()
    }

    /// Current allele of a haplotype
    #[inline]
    pub fn allele(&self, hap: HapIdx) -> bool {
        self.alleles[hap.as_usize()]
    }

    #[inline]
    pub fn set_allele(&mut self, hap: HapIdx, allele: bool) {
        self.alleles.set(hap.as_usize(), allele);
    }

    #[inline]
    pub fn is_missing(&self, sample: SampleIdx) -> bool {
        self.missing[sample.as_usize()]
    }

    /// Current ordered genotype of a sample
    #[inline]
    pub fn genotype(&self, sample: SampleIdx) -> GenotypeClass {
        GenotypeClass::from_alleles(self.allele(sample.hap(0)), self.allele(sample.hap(1)))
    }

    /// Overwrite both haplotypes of a sample
    #[inline]
    pub fn set_genotype(&mut self, sample: SampleIdx, class: GenotypeClass) {
        let (a0, a1) = class.alleles();
        self.set_allele(sample.hap(0), a0);
        self.set_allele(sample.hap(1), a1);
    }

    /// Whether the two haplotypes of a sample carry different alleles
    #[inline]
    pub fn is_het(&self, sample: SampleIdx) -> bool {
        self.allele(sample.hap(0)) != self.allele(sample.hap(1))
    }

    /// Alleles as 0/1 bytes, haplotype order
    pub fn alleles_u8(&self) -> Vec<u8> {
        self.alleles.iter().by_vals().map(u8::from).collect()
    }
}
