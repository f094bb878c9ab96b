//! # Telemetry Blackboard
//!
//! Progress tracking for sampler runs. Atomic counters are updated from the
//! sampling loop with relaxed stores and read by a background heartbeat
//! thread that periodically reports progress.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::Result;

/// Processing stage for high-level progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    Initializing = 0,
    LoadingData = 1,
    Burnin = 2,
    Sampling = 3,
    Finalizing = 4,
    WritingOutput = 5,
    Complete = 6,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Initializing => "Initializing",
            Stage::LoadingData => "Loading Data",
            Stage::Burnin => "Sampling (burn-in)",
            Stage::Sampling => "Sampling (main)",
            Stage::Finalizing => "Finalizing",
            Stage::WritingOutput => "Writing Output",
            Stage::Complete => "Complete",
        }
    }

    fn from_u64(val: u64) -> Self {
        match val {
            0 => Stage::Initializing,
            1 => Stage::LoadingData,
            2 => Stage::Burnin,
            3 => Stage::Sampling,
            4 => Stage::Finalizing,
            5 => Stage::WritingOutput,
            _ => Stage::Complete,
        }
    }
}

/// Shared progress counters.
///
/// Relaxed ordering throughout: the heartbeat only needs eventual visibility.
pub struct TelemetryBlackboard {
    stage: AtomicU64,

    current_iteration: AtomicU64,
    total_iterations: AtomicU64,

    samples_processed: AtomicU64,
    total_samples: AtomicU64,

    start_time: Instant,
    last_progress_nanos: AtomicU64,

    shutdown: AtomicBool,
}

impl TelemetryBlackboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    // === Stage ===

    #[inline]
    pub fn set_stage(&self, stage: Stage) {
        self.stage.store(stage as u64, Ordering::Relaxed);
        self.touch_progress();
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        Stage::from_u64(self.stage.load(Ordering::Relaxed))
    }

    // === Iterations ===

    pub fn set_total_iterations(&self, total: usize) {
        self.total_iterations.store(total as u64, Ordering::Relaxed);
    }

    /// Start iteration `iter` (1-based) and reset the per-sweep sample counter
    pub fn begin_iteration(&self, iter: usize) {
        self.current_iteration.store(iter as u64, Ordering::Relaxed);
        self.samples_processed.store(0, Ordering::Relaxed);
        self.touch_progress();
    }

    pub fn current_iteration(&self) -> u64 {
        self.current_iteration.load(Ordering::Relaxed)
    }

    // === Samples ===

    pub fn set_total_samples(&self, total: usize) {
        self.total_samples.store(total as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_samples_processed(&self, n: u64) {
        self.samples_processed.fetch_add(n, Ordering::Relaxed);
        self.touch_progress();
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed.load(Ordering::Relaxed)
    }

    // === Timing ===

    #[inline]
    fn touch_progress(&self) {
        let elapsed = self.start_time.elapsed().as_nanos() as u64;
        self.last_progress_nanos.store(elapsed, Ordering::Relaxed);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            stage: self.stage(),
            current_iteration: self.current_iteration.load(Ordering::Relaxed),
            total_iterations: self.total_iterations.load(Ordering::Relaxed),
            samples_processed: self.samples_processed.load(Ordering::Relaxed),
            total_samples: self.total_samples.load(Ordering::Relaxed),
            elapsed_secs: self.elapsed_secs(),
            last_progress_nanos: self.last_progress_nanos.load(Ordering::Relaxed),
            current_nanos: self.start_time.elapsed().as_nanos() as u64,
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

impl Default for TelemetryBlackboard {
    fn default() -> Self {
        Self {
            stage: AtomicU64::new(Stage::Initializing as u64),
            current_iteration: AtomicU64::new(0),
            total_iterations: AtomicU64::new(0),
            samples_processed: AtomicU64::new(0),
            total_samples: AtomicU64::new(0),
            start_time: Instant::now(),
            last_progress_nanos: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        }
    }
}

struct TelemetrySnapshot {
    stage: Stage,
    current_iteration: u64,
    total_iterations: u64,
    samples_processed: u64,
    total_samples: u64,
    elapsed_secs: f64,
    last_progress_nanos: u64,
    current_nanos: u64,
}

impl TelemetrySnapshot {
    /// Fraction of all sample visits done, counting completed sweeps
    fn progress_pct(&self) -> f64 {
        let total = self.total_iterations * self.total_samples;
        if total == 0 {
            return 0.0;
        }
        let done = self.current_iteration.saturating_sub(1) * self.total_samples
            + self.samples_processed.min(self.total_samples);
        (done as f64 / total as f64 * 100.0).min(100.0)
    }
}

/// Heartbeat output configuration
pub struct HeartbeatConfig {
    /// Interval between heartbeats (seconds)
    pub interval_secs: u64,
    /// Stall warning threshold (seconds with no progress)
    pub stall_threshold_secs: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            stall_threshold_secs: 300,
        }
    }
}

/// Handle to the heartbeat thread
pub struct HeartbeatHandle {
    handle: Option<JoinHandle<()>>,
    blackboard: Arc<TelemetryBlackboard>,
}

impl HeartbeatHandle {
    /// Spawn the heartbeat thread
    pub fn spawn(blackboard: Arc<TelemetryBlackboard>, config: HeartbeatConfig) -> Result<Self> {
        let bb = blackboard.clone();
        let is_tty = io::stderr().is_terminal();

        let handle = thread::Builder::new()
            .name("heartbeat".to_string())
            .spawn(move || {
                heartbeat_loop(bb, config, is_tty);
            })?;

        Ok(Self {
            handle: Some(handle),
            blackboard,
        })
    }

    /// Signal shutdown and wait for thread to finish
    pub fn shutdown(mut self) {
        self.blackboard.signal_shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        // don't block in drop
        self.blackboard.signal_shutdown();
    }
}

/// Format duration in human-readable form
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.0}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs % 60.0;
        format!("{:.0}m{:.0}s", mins, remaining_secs)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

fn heartbeat_loop(bb: Arc<TelemetryBlackboard>, config: HeartbeatConfig, is_tty: bool) {
    // Sleep in short ticks so shutdown is not delayed by a full interval
    let tick = Duration::from_millis(100);
    let interval = Duration::from_secs(config.interval_secs.max(1));
    let mut last_report = Instant::now();

    while !bb.is_shutdown() {
        thread::sleep(tick);
        if last_report.elapsed() < interval {
            continue;
        }
        last_report = Instant::now();

        let snap = bb.snapshot();
        let stall_secs =
            (snap.current_nanos.saturating_sub(snap.last_progress_nanos)) / 1_000_000_000;
        let is_stalled = stall_secs > config.stall_threshold_secs;

        if is_tty {
            print_tty_progress(&snap, is_stalled);
        } else {
            print_log_progress(&snap, is_stalled);
        }
    }

    if is_tty {
        eprint!("\r\x1b[K");
        let _ = io::stderr().flush();
    }
}

fn print_tty_progress(snap: &TelemetrySnapshot, is_stalled: bool) {
    let progress_pct = snap.progress_pct();

    let bar_width = 20;
    let filled = ((progress_pct / 100.0) * bar_width as f64) as usize;
    let bar: String =
        "=".repeat(filled.min(bar_width)) + &" ".repeat(bar_width.saturating_sub(filled));
    let stall_str = if is_stalled { " [STALLED]" } else { "" };

    eprint!(
        "\r[{}] {:>5.1}% | {} I{}/{} S{}/{} | {}{}    \x1b[K",
        bar,
        progress_pct,
        snap.stage.as_str(),
        snap.current_iteration,
        snap.total_iterations,
        snap.samples_processed,
        snap.total_samples,
        format_duration(snap.elapsed_secs),
        stall_str
    );
    let _ = io::stderr().flush();
}

fn print_log_progress(snap: &TelemetrySnapshot, is_stalled: bool) {
    eprintln!(
        "[HEARTBEAT] stage=\"{}\" iter={}/{} samples={}/{} progress={:.1}% elapsed={:.0}s stalled={}",
        snap.stage.as_str(),
        snap.current_iteration,
        snap.total_iterations,
        snap.samples_processed,
        snap.total_samples,
        snap.progress_pct(),
        snap.elapsed_secs,
        is_stalled
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip() {
        for stage in [
            Stage::Initializing,
            Stage::LoadingData,
            Stage::Burnin,
            Stage::Sampling,
            Stage::Finalizing,
            Stage::WritingOutput,
            Stage::Complete,
        ] {
            assert_eq!(Stage::from_u64(stage as u64), stage);
        }
    }

    #[test]
    fn test_blackboard_updates() {
        let bb = TelemetryBlackboard::new();
        bb.set_stage(Stage::Sampling);
        assert_eq!(bb.stage(), Stage::Sampling);

        bb.set_total_iterations(4);
        bb.set_total_samples(10);
        bb.begin_iteration(2);
        bb.add_samples_processed(5);
        assert_eq!(bb.current_iteration(), 2);
        assert_eq!(bb.samples_processed(), 5);
        assert!((bb.snapshot().progress_pct() - 37.5).abs() < 1e-9);

        bb.begin_iteration(3);
        assert_eq!(bb.samples_processed(), 0);
    }

    #[test]
    fn test_heartbeat_shutdown() {
        let bb = TelemetryBlackboard::new();
        let handle = HeartbeatHandle::spawn(bb.clone(), HeartbeatConfig::default()).unwrap();
        handle.shutdown();
        assert!(bb.is_shutdown());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30.0), "30s");
        assert_eq!(format_duration(90.0), "1m30s");
        assert_eq!(format_duration(3661.0), "1.0h");
    }
}
