//! # Sample and Haplotype Indices
//!
//! Dense diploid indexing: sample `s` owns haplotypes `2s` and `2s + 1`.

use std::fmt;

/// Zero-cost newtype for sample (individual) indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SampleIdx(pub u32);

impl SampleIdx {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Haplotype `h` (0 or 1) of this sample. Sample indices stay below
    /// `2^31`, which `CallStore::from_parts` enforces.
    pub fn hap(self, h: usize) -> HapIdx {
        debug_assert!(h < 2);
        HapIdx::new(self.0 * 2 + h as u32)
    }

    /// Offset of this sample's first accumulator slot in a 4-per-sample array
    pub fn posterior_offset(self) -> usize {
        self.as_usize() * 4
    }
}

impl From<u32> for SampleIdx {
    fn from(idx: u32) -> Self {
        Self(idx)
    }
}

impl From<SampleIdx> for usize {
    fn from(idx: SampleIdx) -> usize {
        idx.0 as usize
    }
}

impl fmt::Display for SampleIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-cost newtype for haplotype indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct HapIdx(pub u32);

impl HapIdx {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Owning sample
    pub fn sample(self) -> SampleIdx {
        SampleIdx::new(self.0 / 2)
    }

    /// 0 for the first haplotype of a sample, 1 for the second
    pub fn offset(self) -> u8 {
        (self.0 % 2) as u8
    }
}

impl From<u32> for HapIdx {
    fn from(idx: u32) -> Self {
        Self(idx)
    }
}

impl From<HapIdx> for usize {
    fn from(idx: HapIdx) -> usize {
        idx.0 as usize
    }
}
