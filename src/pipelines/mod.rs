//! # Pipeline Module
//!
//! High-level orchestration: snapshot loading, sampling and output.

pub mod rephase;

pub use rephase::RephasePipeline;
