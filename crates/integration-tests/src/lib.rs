//! Integration tests for the customer round-trip harness.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p customer-roundtrip-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `roundtrip_scenarios` - Generator and codec end to end
//! - `harness_resilience` - Fault injection through the full harness
//!
//! This library holds the fault-injecting sources and codecs plus helpers for
//! reading a run's output back.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::fs;
use std::path::{Path, PathBuf};

use customer_roundtrip_core::{
    Codec, Customer, CustomerCollection, CustomerSource, DecodeError, EncodeError,
    FakeCustomerGenerator, GenerationError, GeneratorConfig, JsonCodec,
};

/// Seeded generator with the default omission policy.
///
/// # Panics
///
/// Panics if the default generator configuration is rejected.
#[must_use]
pub fn seeded_generator(seed: u64) -> FakeCustomerGenerator {
    FakeCustomerGenerator::new(GeneratorConfig {
        seed: Some(seed),
        ..GeneratorConfig::default()
    })
    .expect("default generator config is valid")
}

/// Source that plants a NaN latitude in one batch, which the codec cannot encode.
pub struct NanOnBatch<S> {
    inner: S,
    target: usize,
    batches: usize,
}

impl<S> NanOnBatch<S> {
    /// Poison the batch with index `target` (zero-based).
    pub const fn new(inner: S, target: usize) -> Self {
        Self {
            inner,
            target,
            batches: 0,
        }
    }
}

impl<S: CustomerSource> CustomerSource for NanOnBatch<S> {
    fn generate_customer(&mut self) -> Result<Customer, GenerationError> {
        self.inner.generate_customer()
    }

    fn generate_batch(&mut self, count: usize) -> Result<Vec<Customer>, GenerationError> {
        let mut batch = self.inner.generate_batch(count)?;
        if self.batches == self.target {
            if let Some(customer) = batch.first_mut() {
                customer.default_address.latitude = Some(f32::NAN);
            }
        }
        self.batches += 1;
        Ok(batch)
    }
}

/// Codec that cuts the encoding of selected iterations in half before it is decoded.
pub struct TruncatingCodec {
    inner: JsonCodec,
    targets: Vec<usize>,
    calls: std::cell::Cell<usize>,
}

impl TruncatingCodec {
    /// Truncate the encodings produced by the listed encode calls (zero-based).
    #[must_use]
    pub const fn new(inner: JsonCodec, targets: Vec<usize>) -> Self {
        Self {
            inner,
            targets,
            calls: std::cell::Cell::new(0),
        }
    }
}

impl Codec for TruncatingCodec {
    fn encode(&self, collection: &CustomerCollection) -> Result<Vec<u8>, EncodeError> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        let mut bytes = self.inner.encode(collection)?;
        if self.targets.contains(&call) {
            bytes.truncate(bytes.len() / 2);
        }
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<CustomerCollection, DecodeError> {
        self.inner.decode(bytes)
    }
}

/// Summary log entries, one per iteration.
///
/// An entry starts with a four-digit iteration prefix; continuation lines
/// (error text) belong to the previous entry.
///
/// # Panics
///
/// Panics if the log cannot be read.
#[must_use]
pub fn log_entries(path: &Path) -> Vec<String> {
    let contents = fs::read_to_string(path).expect("summary log is readable");
    let mut entries: Vec<String> = Vec::new();
    for line in contents.lines() {
        match entries.last_mut() {
            Some(entry) if !is_entry_start(line) => {
                entry.push('\n');
                entry.push_str(line);
            }
            _ => entries.push(line.to_string()),
        }
    }
    entries
}

fn is_entry_start(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 6
        && bytes.iter().take(4).all(u8::is_ascii_digit)
        && bytes.get(4..6) == Some(b": ".as_slice())
}

/// Artifact files of a run, sorted by name.
///
/// # Panics
///
/// Panics if the run directory cannot be listed.
#[must_use]
pub fn artifact_files(run_dir: &Path, run_id: &str) -> Vec<PathBuf> {
    let prefix = format!("{run_id}-");
    let mut files: Vec<PathBuf> = fs::read_dir(run_dir)
        .expect("run directory is readable")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".json"))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_entry_start() {
        assert!(is_entry_start("0007: Error:"));
        assert!(is_entry_start("1234: Reading JSON"));
        assert!(!is_entry_start("Decode failed: malformed JSON"));
        assert!(!is_entry_start("12: short"));
    }
}
