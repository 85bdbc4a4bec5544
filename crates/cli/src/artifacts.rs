//! Raw payloads captured from failed iterations.
//!
//! Each artifact is written verbatim to `{run_id}-{iteration:04}.json` inside
//! the run directory, so a failing payload can be fed back into the decoder
//! with `roundtrip inspect`.

use std::fs;
use std::path::PathBuf;

use crate::error::HarnessError;

/// Writes artifacts for one run and remembers what it wrote.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    run_id: String,
    written: Vec<PathBuf>,
}

impl ArtifactStore {
    /// Create a store writing into an existing run directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, run_id: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            run_id: run_id.into(),
            written: Vec::new(),
        }
    }

    /// Path of the artifact for an iteration.
    #[must_use]
    pub fn path_for(&self, iteration: usize) -> PathBuf {
        self.dir
            .join(format!("{}-{iteration:04}.json", self.run_id))
    }

    /// Write the payload of a failed iteration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Artifact` if the file cannot be written.
    pub fn write(&mut self, iteration: usize, payload: &[u8]) -> Result<PathBuf, HarnessError> {
        let path = self.path_for(iteration);
        fs::write(&path, payload).map_err(|source| HarnessError::Artifact {
            path: path.clone(),
            source,
        })?;
        self.written.push(path.clone());
        Ok(path)
    }

    /// Artifacts written so far, in iteration order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Consume the store, returning the written paths.
    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.written
    }
}
