//! # Genotype Classes
//!
//! The four ordered diploid genotypes of a biallelic site. Index order is
//! fixed (`0/0`, `0/1`, `1/0`, `1/1`) and shared by the prior, the posterior
//! weights, the accumulator layout and the allele write-back.

use std::fmt;

/// Number of ordered genotype classes
pub const N_GENOTYPE_CLASSES: usize = 4;

/// An ordered (phased) biallelic genotype
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GenotypeClass {
    /// 0|0
    HomRef = 0,
    /// 0|1
    Het01 = 1,
    /// 1|0
    Het10 = 2,
    /// 1|1
    HomAlt = 3,
}

/// (hap0, hap1) alleles per class, in class index order
const CLASS_ALLELES: [(bool, bool); N_GENOTYPE_CLASSES] =
    [(false, false), (false, true), (true, false), (true, true)];

impl GenotypeClass {
    /// All classes in index order
    pub const ALL: [GenotypeClass; N_GENOTYPE_CLASSES] = [
        GenotypeClass::HomRef,
        GenotypeClass::Het01,
        GenotypeClass::Het10,
        GenotypeClass::HomAlt,
    ];

    /// Class for an index in `0..4`; `None` otherwise
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Class carrying the given haplotype alleles
    pub fn from_alleles(a0: bool, a1: bool) -> Self {
        Self::ALL[(a0 as usize) * 2 + a1 as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Alleles written to (hap0, hap1)
    #[inline]
    pub fn alleles(self) -> (bool, bool) {
        CLASS_ALLELES[self.index()]
    }

    pub fn is_het(self) -> bool {
        matches!(self, GenotypeClass::Het01 | GenotypeClass::Het10)
    }
}

impl fmt::Display for GenotypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a0, a1) = self.alleles();
        write!(f, "{}|{}", a0 as u8, a1 as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_allele_table() {
        for (i, class) in GenotypeClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
            let (a0, a1) = class.alleles();
            assert_eq!(GenotypeClass::from_alleles(a0, a1), *class);
        }
        assert_eq!(GenotypeClass::Het01.alleles(), (false, true));
        assert_eq!(GenotypeClass::Het10.alleles(), (true, false));
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(GenotypeClass::from_index(3), Some(GenotypeClass::HomAlt));
        assert_eq!(GenotypeClass::from_index(4), None);
    }

    #[test]
    fn test_het_and_display() {
        assert!(!GenotypeClass::HomRef.is_het());
        assert!(GenotypeClass::Het10.is_het());
        assert_eq!(GenotypeClass::Het10.to_string(), "1|0");
    }
}
