//! Execute a round-trip run.
//!
//! # Usage
//!
//! ```bash
//! # 1000 iterations of 500 customers (defaults)
//! roundtrip run
//!
//! # Reproducible short run that writes explicit nulls
//! roundtrip run --iterations 20 --batch-size 50 --seed 42 --keep-nulls
//! ```

use chrono::Utc;
use tracing::{info, warn};

use customer_roundtrip_cli::{Harness, HarnessConfig, RunReport, timestamp_run_id};
use customer_roundtrip_core::FakeCustomerGenerator;

/// Run the harness with the given configuration.
///
/// # Errors
///
/// Returns an error if the generator configuration is invalid or the run
/// output cannot be written. Failed iterations are reported, not returned.
pub fn execute(config: &HarnessConfig) -> Result<RunReport, Box<dyn std::error::Error>> {
    let run_id = config
        .run_id
        .clone()
        .unwrap_or_else(|| timestamp_run_id(Utc::now()));

    info!(
        run_id = %run_id,
        iterations = config.iterations,
        batch_size = config.batch_size,
        omit_absent_fields = config.omit_absent_fields,
        strict = config.strict,
        seed = ?config.seed,
        "Configured round-trip run"
    );

    let generator = FakeCustomerGenerator::new(config.generator_config())?;
    let mut harness = Harness::new(generator, config.codec(), config.harness_options());
    let report = harness.run(&config.output_dir, &run_id)?;

    info!("Run {}: {} succeeded, {} failed", report.run_id, report.successes, report.failures);
    info!("  Log: {}", report.log_path.display());
    if !report.artifacts.is_empty() {
        warn!("  Artifacts: {}", report.artifacts.len());
        for artifact in &report.artifacts {
            warn!("    - {}", artifact.display());
        }
    }

    Ok(report)
}
