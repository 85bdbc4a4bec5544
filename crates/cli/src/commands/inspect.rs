//! Re-decode a captured artifact.
//!
//! # Usage
//!
//! ```bash
//! roundtrip inspect runs/20260117-093005/20260117-093005-0007.json
//! ```

use std::path::Path;

use tracing::info;

use customer_roundtrip_core::{Codec, JsonCodec};

/// Decode an artifact file and report the outcome.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not decode.
pub fn artifact(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Decoding artifact");

    // Decoding does not depend on whether absent fields were omitted.
    let collection = JsonCodec::default().decode(&bytes)?;
    info!(records = collection.len(), "Artifact decodes cleanly");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_roundtrip_core::DecodeError;

    use super::*;

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone-0001.json");

        let err = artifact(&path).unwrap_err();
        assert!(err.to_string().contains("gone-0001.json"));
    }

    #[test]
    fn test_truncated_artifact_returns_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run-0003.json");
        std::fs::write(&path, b"{\"customers\": [").unwrap();

        let err = artifact(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DecodeError>(),
            Some(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_clean_artifact_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run-0004.json");
        std::fs::write(&path, b"{\"customers\": []}").unwrap();

        assert!(artifact(&path).is_ok());
    }
}
