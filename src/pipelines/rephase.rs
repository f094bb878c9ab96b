//! # Rephasing Pipeline
//!
//! Orchestrates one sampler run:
//! 1. Load the input snapshot
//! 2. Build the call store, copying states and a zeroed accumulator
//! 3. Run the Gibbs sampler with a seeded random source
//! 4. Write the final calls, accumulated posteriors and run summary

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::Config;
use crate::data::posterior::PosteriorAccumulator;
use crate::error::Result;
use crate::io::snapshot::{SamplerOutput, SamplerSnapshot};
use crate::model::random::SeededRandom;
use crate::model::sampler::GibbsSampler;
use crate::utils::telemetry::{Stage, TelemetryBlackboard};

pub struct RephasePipeline {
    config: Config,
    telemetry: Option<Arc<TelemetryBlackboard>>,
}

impl RephasePipeline {
    pub fn new(config: Config, telemetry: Option<Arc<TelemetryBlackboard>>) -> Self {
        Self { config, telemetry }
    }

    fn set_stage(&self, stage: Stage) {
        if let Some(t) = &self.telemetry {
            t.set_stage(stage);
        }
    }

    /// Run the sampler on the configured input and write the output snapshot
    #[instrument(skip_all, fields(input = %self.config.input.display()))]
    pub fn run(&mut self) -> Result<SamplerOutput> {
        let params = self.config.sampler_params()?;

        self.set_stage(Stage::LoadingData);
        let inputs = SamplerSnapshot::read(&self.config.input)?.into_inputs()?;
        let mut calls = inputs.calls;
        let mut posterior = PosteriorAccumulator::new(calls.n_samples());
        info!(
            n_samples = calls.n_samples(),
            n_unphased = inputs.unphased.len(),
            "loaded sampler snapshot"
        );

        let mut sampler = GibbsSampler::new(params, &inputs.copying, &inputs.unphased);
        if let Some(t) = &self.telemetry {
            sampler = sampler.with_telemetry(t.clone());
        }
        let mut rng = SeededRandom::new(self.config.seed);
        let summary = sampler.iterate(&mut calls, &mut posterior, &mut rng)?;

        self.set_stage(Stage::WritingOutput);
        let output = SamplerOutput::collect(&calls, &posterior, &inputs.unphased, summary);
        output.write(&self.config.out)?;
        info!(out = %self.config.out.display(), "wrote rephased snapshot");

        Ok(output)
    }
}
