//! Error types for the round-trip harness.
//!
//! [`IterationError`] covers everything a single iteration can hit; the
//! harness records it and moves on. [`HarnessError`] is fatal and ends the run.

use std::io;
use std::path::PathBuf;

use customer_roundtrip_core::{DecodeError, EncodeError, GenerationError, Mismatch};
use thiserror::Error;

/// A failed round-trip iteration.
#[derive(Debug, Error)]
pub enum IterationError {
    /// The batch could not be encoded.
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// The encoded bytes could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded batch does not match the generated one.
    #[error("Round-trip mismatch: {0}")]
    Mismatch(#[from] Mismatch),
}

/// A failure that aborts the run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The run directory or summary log could not be created.
    #[error("Cannot set up run output at {path}: {source}")]
    Setup {
        /// Path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An artifact file could not be written.
    #[error("Cannot write artifact {path}: {source}")]
    Artifact {
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The summary log could not be written.
    #[error("Cannot write summary log: {0}")]
    Log(#[source] io::Error),

    /// The generator could not produce customers.
    #[error("Generator failed: {0}")]
    Generation(#[from] GenerationError),
}
