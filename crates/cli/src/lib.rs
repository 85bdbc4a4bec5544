//! Customer Round-Trip harness library.
//!
//! This crate drives the round-trip loop and owns everything that touches the
//! filesystem, so it can be exercised from integration tests as well as from
//! the `roundtrip` binary:
//! - `config` - Harness configuration loaded from the environment
//! - `harness` - The generate → encode → decode → verify loop
//! - `artifacts` - Raw payloads captured for failed iterations
//! - `summary` - Per-iteration summary log
//! - `error` - Per-iteration and fatal error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod artifacts;
pub mod config;
pub mod error;
pub mod harness;
pub mod summary;

pub use config::{ConfigError, HarnessConfig};
pub use error::{HarnessError, IterationError};
pub use harness::{Harness, HarnessOptions, RunReport, timestamp_run_id};
