//! # rephase: Gibbs re-phasing of rare and missing genotypes
//!
//! ## Usage
//! ```bash
//! rephase --input snapshot.json --out rephased.json
//!
//! # With span timings
//! rephase --input snapshot.json --out rephased.json --profile
//! ```

use std::time::Instant;

use rephase::config::Config;
use rephase::pipelines::RephasePipeline;
use rephase::utils::telemetry::{HeartbeatConfig, HeartbeatHandle, Stage, TelemetryBlackboard};
use rephase::utils::threading::configure_global_pool;
use rephase::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber; `profile` adds span-close timings
fn init_tracing(profile: bool, verbose: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::fmt::format::FmtSpan;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let span_events = if profile { FmtSpan::CLOSE } else { FmtSpan::NONE };

    fmt()
        .with_max_level(level)
        .with_span_events(span_events)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate()?;
    init_tracing(config.profile, config.verbose);

    let n_threads = config.nthreads();
    configure_global_pool(n_threads)?;

    eprintln!("rephase v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("Threads: {}", n_threads);
    eprintln!("Input: {:?}", config.input);
    eprintln!(
        "Iterations: {} (burn-in {}), seed {}",
        config.iterations, config.burnin, config.seed
    );

    let telemetry = TelemetryBlackboard::new();
    let heartbeat = if config.heartbeat > 0 {
        Some(HeartbeatHandle::spawn(
            telemetry.clone(),
            HeartbeatConfig {
                interval_secs: config.heartbeat,
                ..HeartbeatConfig::default()
            },
        )?)
    } else {
        None
    };

    let mut pipeline = RephasePipeline::new(config, Some(telemetry.clone()));
    let result = pipeline.run();

    telemetry.set_stage(Stage::Complete);
    if let Some(heartbeat) = heartbeat {
        heartbeat.shutdown();
    }

    let output = result?;
    eprintln!(
        "Resampled {} samples ({} missing): {} calls changed, {} phase flips",
        output.summary.n_resampled,
        output.summary.n_missing,
        output.summary.n_changed,
        output.summary.n_phase_flips
    );
    eprintln!("\nCompleted in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
