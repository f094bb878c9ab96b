//! # Utilities Module
//!
//! Cross-cutting helpers that don't belong in domain-specific modules.
//!
//! - `telemetry`: progress counters and heartbeat reporting
//! - `threading`: rayon thread pool configuration

pub mod telemetry;
pub mod threading;
