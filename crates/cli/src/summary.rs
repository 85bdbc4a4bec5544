//! Per-iteration summary log.
//!
//! Every iteration produces exactly one entry, written both to the run's log
//! file and to the console through `tracing`:
//!
//! ```text
//! 0000: Reading JSON from stream - deserialized 500 customer records.
//! 0001: Error:
//! Decode failed: malformed JSON: EOF while parsing a string at line 1 column 4096
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{HarnessError, IterationError};

/// Buffered writer for a run's summary log.
///
/// The buffer is flushed by [`SummaryLog::finish`]; if the log is dropped
/// early (for example when a fatal error ends the run) `BufWriter` flushes on
/// drop.
#[derive(Debug)]
pub struct SummaryLog {
    writer: BufWriter<File>,
    path: PathBuf,
    entries: usize,
}

impl SummaryLog {
    /// Create (or truncate) the log file.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Setup` if the file cannot be created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, HarnessError> {
        let path = path.into();
        let file = File::create(&path).map_err(|source| HarnessError::Setup {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            entries: 0,
        })
    }

    /// Record a successful iteration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Log` if the entry cannot be written.
    pub fn success(&mut self, iteration: usize, records: usize) -> Result<(), HarnessError> {
        let line = format!(
            "{iteration:04}: Reading JSON from stream - deserialized {records} customer records."
        );
        info!(iteration, records, "{line}");
        self.append(&line)
    }

    /// Record a failed iteration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Log` if the entry cannot be written.
    pub fn failure(
        &mut self,
        iteration: usize,
        error: &IterationError,
        artifact: Option<&Path>,
    ) -> Result<(), HarnessError> {
        let line = format!("{iteration:04}: Error:\n{error}");
        match artifact {
            Some(path) => warn!(iteration, artifact = %path.display(), "{line}"),
            None => warn!(iteration, "{line}"),
        }
        self.append(&line)
    }

    /// Number of entries written.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Flush and close the log, returning its path.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Log` if the buffer cannot be flushed.
    pub fn finish(mut self) -> Result<PathBuf, HarnessError> {
        self.writer.flush().map_err(HarnessError::Log)?;
        Ok(self.path)
    }

    fn append(&mut self, line: &str) -> Result<(), HarnessError> {
        writeln!(self.writer, "{line}").map_err(HarnessError::Log)?;
        self.entries += 1;
        Ok(())
    }
}
