//! The round-trip loop.
//!
//! A run moves through `Idle → Running(i) → Success(i) | Failure(i) →
//! Running(i + 1) | Done`. Each iteration generates a batch, encodes it,
//! decodes the bytes and compares the result with the batch. Encode, decode
//! and comparison failures are logged, their payload is captured as an
//! artifact, and the loop carries on. Only output I/O failures and generator
//! failures end the run early.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use customer_roundtrip_core::{Codec, CustomerCollection, CustomerSource, verify_roundtrip};
use serde::Serialize;
use tracing::{info, instrument};

use crate::artifacts::ArtifactStore;
use crate::error::{HarnessError, IterationError};
use crate::summary::SummaryLog;

/// Name of the machine-readable report written next to the summary log.
pub const REPORT_FILE_NAME: &str = "report.json";

/// Loop parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessOptions {
    /// Number of iterations.
    pub iterations: usize,
    /// Customers per iteration.
    pub batch_size: usize,
    /// Compare decoded records field by field, not just by count.
    pub strict: bool,
    /// Write the payload of failed iterations to artifact files.
    pub capture_artifacts: bool,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Run identifier.
    pub run_id: String,
    /// Directory holding the log, report and artifacts.
    pub output_dir: PathBuf,
    /// Summary log path.
    pub log_path: PathBuf,
    /// Iterations executed.
    pub iterations: usize,
    /// Iterations whose batch round-tripped.
    pub successes: usize,
    /// Iterations that failed.
    pub failures: usize,
    /// Artifact files, one per failed iteration when capture is enabled.
    pub artifacts: Vec<PathBuf>,
}

impl RunReport {
    /// Whether every iteration succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failures == 0
    }
}

/// A failed iteration and the payload worth keeping for it.
struct IterationFailure {
    error: IterationError,
    payload: Vec<u8>,
}

/// Drives round-trips of generated customers through a codec.
#[derive(Debug)]
pub struct Harness<S, C> {
    source: S,
    codec: C,
    options: HarnessOptions,
}

impl<S, C> Harness<S, C>
where
    S: CustomerSource,
    C: Codec,
{
    /// Create a harness.
    #[must_use]
    pub const fn new(source: S, codec: C, options: HarnessOptions) -> Self {
        Self {
            source,
            codec,
            options,
        }
    }

    /// Execute a run, writing output to `{output_root}/{run_id}/`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError` if the run directory, summary log, report or an
    /// artifact cannot be written, or if the generator fails. Round-trip
    /// failures are not errors; they are counted in the report.
    #[instrument(skip(self, output_root), fields(iterations = self.options.iterations, batch_size = self.options.batch_size))]
    pub fn run(&mut self, output_root: &Path, run_id: &str) -> Result<RunReport, HarnessError> {
        let output_dir = output_root.join(run_id);
        fs::create_dir_all(&output_dir).map_err(|source| HarnessError::Setup {
            path: output_dir.clone(),
            source,
        })?;

        let mut log = SummaryLog::create(output_dir.join(format!("{run_id}.log")))?;
        let mut artifacts = ArtifactStore::new(&output_dir, run_id);
        let mut successes = 0;
        let mut failures = 0;

        info!(output_dir = %output_dir.display(), "Starting round-trip run");

        for iteration in 0..self.options.iterations {
            let batch = CustomerCollection::new(self.source.generate_batch(self.options.batch_size)?);

            match self.round_trip(&batch) {
                Ok(records) => {
                    successes += 1;
                    log.success(iteration, records)?;
                }
                Err(failure) => {
                    failures += 1;
                    let artifact = if self.options.capture_artifacts {
                        Some(artifacts.write(iteration, &failure.payload)?)
                    } else {
                        None
                    };
                    log.failure(iteration, &failure.error, artifact.as_deref())?;
                }
            }
        }

        let report = RunReport {
            run_id: run_id.to_string(),
            log_path: log.finish()?,
            iterations: self.options.iterations,
            successes,
            failures,
            artifacts: artifacts.into_paths(),
            output_dir,
        };
        write_report(&report)?;

        info!(
            successes = report.successes,
            failures = report.failures,
            artifacts = report.artifacts.len(),
            "Round-trip run complete"
        );
        Ok(report)
    }

    /// Encode, decode and compare one batch, returning the decoded record count.
    fn round_trip(&self, batch: &CustomerCollection) -> Result<usize, IterationFailure> {
        let bytes = self.codec.encode(batch).map_err(|e| IterationFailure {
            error: e.into(),
            // No encoded bytes exist; keep a readable dump of the batch instead.
            payload: serde_json::to_vec_pretty(batch).unwrap_or_default(),
        })?;

        let decoded = match self.codec.decode(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                return Err(IterationFailure {
                    error: e.into(),
                    payload: bytes,
                });
            }
        };

        if let Err(mismatch) = verify_roundtrip(batch, &decoded, self.options.strict) {
            return Err(IterationFailure {
                error: mismatch.into(),
                payload: bytes,
            });
        }

        Ok(decoded.len())
    }
}

/// Run identifier derived from a start time, e.g. `20260117-093000`.
#[must_use]
pub fn timestamp_run_id(started_at: DateTime<Utc>) -> String {
    started_at.format("%Y%m%d-%H%M%S").to_string()
}

fn write_report(report: &RunReport) -> Result<(), HarnessError> {
    let path = report.output_dir.join(REPORT_FILE_NAME);
    let io_error = |source: std::io::Error| HarnessError::Artifact {
        path: path.clone(),
        source,
    };
    let json = serde_json::to_vec_pretty(report).map_err(|e| io_error(e.into()))?;
    fs::write(&path, json).map_err(io_error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;
    use customer_roundtrip_core::{
        DecodeError, EncodeError, FakeCustomerGenerator, GenerationError, GeneratorConfig,
        JsonCodec,
    };

    use super::*;

    fn generator(seed: u64) -> FakeCustomerGenerator {
        FakeCustomerGenerator::new(GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        })
        .unwrap()
    }

    fn options(iterations: usize, batch_size: usize) -> HarnessOptions {
        HarnessOptions {
            iterations,
            batch_size,
            strict: true,
            capture_artifacts: true,
        }
    }

    /// Decodes correctly but turns an absent province into an empty string.
    struct EmptyStringCodec(JsonCodec);

    impl Codec for EmptyStringCodec {
        fn encode(&self, collection: &CustomerCollection) -> Result<Vec<u8>, EncodeError> {
            self.0.encode(collection)
        }

        fn decode(&self, bytes: &[u8]) -> Result<CustomerCollection, DecodeError> {
            let mut collection = self.0.decode(bytes)?;
            for customer in &mut collection.customers {
                if customer.default_address.province.is_none() {
                    customer.default_address.province = Some(String::new());
                }
            }
            Ok(collection)
        }
    }

    /// Fails once the given number of customers has been produced.
    struct ExhaustingSource {
        inner: FakeCustomerGenerator,
        remaining: usize,
    }

    impl CustomerSource for ExhaustingSource {
        fn generate_customer(
            &mut self,
        ) -> Result<customer_roundtrip_core::Customer, GenerationError> {
            if self.remaining == 0 {
                return Err(GenerationError::TimestampOutOfRange(0));
            }
            self.remaining -= 1;
            self.inner.generate_customer()
        }
    }

    #[test]
    fn test_clean_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut harness = Harness::new(generator(1), JsonCodec::default(), options(5, 10));

        let report = harness.run(dir.path(), "clean").unwrap();

        assert!(report.is_clean());
        assert_eq!(report.successes, 5);
        assert!(report.artifacts.is_empty());
        assert_eq!(report.output_dir, dir.path().join("clean"));

        let log = fs::read_to_string(&report.log_path).unwrap();
        assert_eq!(log.lines().count(), 5);
        assert!(log.lines().all(|l| l.ends_with("deserialized 10 customer records.")));
        assert!(report.output_dir.join(REPORT_FILE_NAME).exists());
    }

    #[test]
    fn test_mismatch_is_recorded_and_captured() {
        let dir = tempfile::tempdir().unwrap();
        let codec = EmptyStringCodec(JsonCodec::default());
        let mut harness = Harness::new(generator(2), codec, options(3, 40));

        let report = harness.run(dir.path(), "mismatch").unwrap();

        // 40 customers with a 0.7 omission rate leave at least one province absent.
        assert_eq!(report.failures, 3);
        assert_eq!(report.artifacts.len(), 3);
        assert_eq!(
            report.artifacts[0],
            report.output_dir.join("mismatch-0000.json")
        );

        let log = fs::read_to_string(&report.log_path).unwrap();
        assert!(log.contains("0002: Error:\nRound-trip mismatch"));
        assert!(log.contains("default_address.province"));

        let payload = fs::read(&report.artifacts[1]).unwrap();
        assert!(JsonCodec::default().decode(&payload).is_ok());
    }

    #[test]
    fn test_lenient_mode_ignores_field_changes() {
        let dir = tempfile::tempdir().unwrap();
        let codec = EmptyStringCodec(JsonCodec::default());
        let mut harness = Harness::new(
            generator(2),
            codec,
            HarnessOptions {
                strict: false,
                ..options(2, 40)
            },
        );

        let report = harness.run(dir.path(), "lenient").unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_capture_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let codec = EmptyStringCodec(JsonCodec::default());
        let mut harness = Harness::new(
            generator(3),
            codec,
            HarnessOptions {
                capture_artifacts: false,
                ..options(2, 40)
            },
        );

        let report = harness.run(dir.path(), "nocapture").unwrap();
        assert_eq!(report.failures, 2);
        assert!(report.artifacts.is_empty());
    }

    #[test]
    fn test_generator_failure_is_fatal_but_log_is_flushed() {
        let dir = tempfile::tempdir().unwrap();
        let source = ExhaustingSource {
            inner: generator(4),
            remaining: 25,
        };
        let mut harness = Harness::new(source, JsonCodec::default(), options(5, 10));

        let err = harness.run(dir.path(), "exhausted").unwrap_err();
        assert!(matches!(err, HarnessError::Generation(_)));

        let log = fs::read_to_string(dir.path().join("exhausted").join("exhausted.log")).unwrap();
        assert_eq!(log.lines().count(), 2);
    }

    #[test]
    fn test_unwritable_output_root_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();

        let mut harness = Harness::new(generator(5), JsonCodec::default(), options(1, 1));
        let err = harness.run(&blocker, "run").unwrap_err();
        assert!(matches!(err, HarnessError::Setup { .. }));
    }

    #[test]
    fn test_timestamp_run_id() {
        let started = Utc.with_ymd_and_hms(2026, 1, 17, 9, 30, 5).unwrap();
        assert_eq!(timestamp_run_id(started), "20260117-093005");
    }
}
