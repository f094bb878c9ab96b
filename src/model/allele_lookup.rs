//! Allele lookup for copying states.
//!
//! A copying state is a panel haplotype index; the estimator needs the allele
//! that haplotype currently carries. In the running sampler the panel is the
//! call store itself (scaffold haplotypes plus the latest calls of every
//! other sample), so lookups observe updates made earlier in the same sweep.

use crate::data::calls::CallStore;
use crate::data::haplotype::HapIdx;

/// Allele carried by a panel haplotype
pub trait AlleleLookup {
    fn allele(&self, state: HapIdx) -> bool;
}

impl AlleleLookup for CallStore {
    #[inline(always)]
    fn allele(&self, state: HapIdx) -> bool {
        CallStore::allele(self, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::haplotype::SampleIdx;
    use crate::data::GenotypeClass;

    #[test]
    fn test_call_store_lookup_sees_updates() {
        let mut store = CallStore::new(2);
        assert!(!AlleleLookup::allele(&store, HapIdx::new(3)));
        store.set_genotype(SampleIdx::new(1), GenotypeClass::Het01);
        assert!(AlleleLookup::allele(&store, HapIdx::new(3)));
    }
}
