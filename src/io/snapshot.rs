//! # Sampler Snapshot I/O
//!
//! JSON interchange format for the arrays the sampler consumes and produces.
//! Upstream stages (genotype reading, copying-model HMM) dump a
//! [`SamplerSnapshot`]; a run writes a [`SamplerOutput`].
//!
//! Input layout:
//! ```text
//! {
//!   "alleles":  [0, 1, ...],          // 2N, haplotype order
//!   "missing":  [false, ...],         // N
//!   "cstates":  [[2, 3], ...],        // 2N slots of panel haplotype indices
//!   "cprobs":   [[0.9, 0.1], ...],    // aligned with cstates
//!   "unphased": [0, 4, ...]           // ambiguous samples
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::calls::CallStore;
use crate::data::copying::CopyingStates;
use crate::data::haplotype::SampleIdx;
use crate::data::posterior::PosteriorAccumulator;
use crate::error::{RephaseError, Result};
use crate::model::sampler::RunSummary;

/// Sampler input as dumped by upstream stages
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplerSnapshot {
    pub alleles: Vec<u8>,
    pub missing: Vec<bool>,
    pub cstates: Vec<Vec<u32>>,
    pub cprobs: Vec<Vec<f32>>,
    pub unphased: Vec<u32>,
}

/// In-memory sampler inputs built from a snapshot
#[derive(Clone, Debug)]
pub struct SamplerInputs {
    pub calls: CallStore,
    pub copying: CopyingStates,
    pub unphased: Vec<u32>,
}

impl SamplerSnapshot {
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RephaseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    /// Convert to sampler inputs, rejecting allele codes other than 0/1
    pub fn into_inputs(self) -> Result<SamplerInputs> {
        let alleles = self
            .alleles
            .iter()
            .enumerate()
            .map(|(h, &a)| match a {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(RephaseError::invalid_data(format!(
                    "haplotype {}: allele code {} is not biallelic 0/1",
                    h, other
                ))),
            })
            .collect::<Result<Vec<bool>>>()?;
        let calls = CallStore::from_parts(&alleles, &self.missing)?;
        let copying = CopyingStates::from_parallel(self.cstates, self.cprobs)?;
        Ok(SamplerInputs {
            calls,
            copying,
            unphased: self.unphased,
        })
    }
}

/// Posterior report for one resampled sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleCall {
    pub sample: u32,
    /// Final call, e.g. "0|1"
    pub genotype: String,
    /// Normalized accumulated mass of the final call, absent without evidence
    pub confidence: Option<f32>,
}

/// Result of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerOutput {
    pub alleles: Vec<u8>,
    pub pprobs: Vec<f32>,
    pub calls: Vec<SampleCall>,
    pub summary: RunSummary,
}

impl SamplerOutput {
    /// Collect the final state; `unphased` is reported in ascending order
    pub fn collect(
        calls: &CallStore,
        posterior: &PosteriorAccumulator,
        unphased: &[u32],
        summary: RunSummary,
    ) -> Self {
        let mut sorted = unphased.to_vec();
        sorted.sort_unstable();
        let sample_calls = sorted
            .into_iter()
            .map(|s| {
                let sample = SampleIdx::new(s);
                SampleCall {
                    sample: s,
                    genotype: calls.genotype(sample).to_string(),
                    confidence: posterior.confidence(sample),
                }
            })
            .collect();
        Self {
            alleles: calls.alleles_u8(),
            pprobs: posterior.as_slice().to_vec(),
            calls: sample_calls,
            summary,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SamplerSnapshot {
        SamplerSnapshot {
            alleles: vec![0, 1, 0, 1],
            missing: vec![false, false],
            cstates: vec![vec![2, 3], vec![2, 3], vec![], vec![]],
            cprobs: vec![vec![0.9, 0.1], vec![0.1, 0.9], vec![], vec![]],
            unphased: vec![0],
        }
    }

    #[test]
    fn test_into_inputs() {
        let inputs = snapshot().into_inputs().unwrap();
        assert_eq!(inputs.calls.n_samples(), 2);
        assert_eq!(inputs.copying.n_slots(), 4);
        assert_eq!(inputs.unphased, vec![0]);
    }

    #[test]
    fn test_non_biallelic_code_rejected() {
        let mut snap = snapshot();
        snap.alleles[2] = 2;
        let err = snap.into_inputs().unwrap_err();
        assert!(err.to_string().contains("haplotype 2"));
    }

    #[test]
    fn test_missing_file() {
        let err = SamplerSnapshot::read(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, RephaseError::FileNotFound { .. }));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json");
        snapshot().write(&path).unwrap();
        assert_eq!(SamplerSnapshot::read(&path).unwrap(), snapshot());
    }
}
