//! # Threading Configuration
//!
//! Global rayon pool setup. Sampling itself is sequential. The pool only
//! runs the consensus argmax of large populations, a light pass next to the
//! sweeps.

use crate::error::{RephaseError, Result};

/// Threads to use when none are requested
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Build the global rayon pool with `n_threads` named workers.
///
/// A pool that was already installed (e.g. by a test harness) is kept.
pub fn configure_global_pool(n_threads: usize) -> Result<()> {
    if n_threads == 0 {
        return Err(RephaseError::config("thread count must be at least 1"));
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("rephase-worker-{}", i))
        .build_global()
    {
        tracing::debug!("global thread pool already configured: {}", e);
    }
    Ok(())
}
