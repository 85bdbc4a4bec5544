//! Harness configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ROUNDTRIP_ITERATIONS` - Number of iterations (default: 1000)
//! - `ROUNDTRIP_BATCH_SIZE` - Customers per iteration (default: 500)
//! - `ROUNDTRIP_OUTPUT_DIR` - Root directory for run output (default: runs)
//! - `ROUNDTRIP_OMIT_ABSENT_FIELDS` - Leave absent fields out of the JSON (default: true)
//! - `ROUNDTRIP_STRICT` - Compare decoded records field by field (default: true)
//! - `ROUNDTRIP_CAPTURE_ARTIFACTS` - Write payloads of failed iterations (default: true)
//! - `ROUNDTRIP_SEED` - RNG seed for reproducible runs (default: random)
//! - `ROUNDTRIP_RUN_ID` - Run identifier (default: derived from the start time)

use std::path::PathBuf;
use std::str::FromStr;

use customer_roundtrip_core::{GeneratorConfig, JsonCodec};
use thiserror::Error;

use crate::harness::HarnessOptions;

const DEFAULT_ITERATIONS: &str = "1000";
const DEFAULT_BATCH_SIZE: &str = "500";
const DEFAULT_OUTPUT_DIR: &str = "runs";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Round-trip harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of iterations to run
    pub iterations: usize,
    /// Customers generated per iteration
    pub batch_size: usize,
    /// Root directory; each run writes to a subdirectory named by its run ID
    pub output_dir: PathBuf,
    /// Leave absent fields out of the encoded JSON instead of writing `null`
    pub omit_absent_fields: bool,
    /// Compare decoded records field by field, not just by count
    pub strict: bool,
    /// Write the payload of every failed iteration to an artifact file
    pub capture_artifacts: bool,
    /// RNG seed for the generator
    pub seed: Option<u64>,
    /// Explicit run identifier
    pub run_id: Option<String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            batch_size: 500,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            omit_absent_fields: true,
            strict: true,
            capture_artifacts: true,
            seed: None,
            run_id: None,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        Ok(Self {
            iterations: env.parse("ROUNDTRIP_ITERATIONS", DEFAULT_ITERATIONS)?,
            batch_size: env.parse("ROUNDTRIP_BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            output_dir: PathBuf::from(env.get_or_default("ROUNDTRIP_OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
            omit_absent_fields: env.flag("ROUNDTRIP_OMIT_ABSENT_FIELDS", true)?,
            strict: env.flag("ROUNDTRIP_STRICT", true)?,
            capture_artifacts: env.flag("ROUNDTRIP_CAPTURE_ARTIFACTS", true)?,
            seed: env.optional("ROUNDTRIP_SEED")?,
            run_id: env.get("ROUNDTRIP_RUN_ID").filter(|id| !id.is_empty()),
        })
    }

    /// Generator configuration for this run.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            ..GeneratorConfig::default()
        }
    }

    /// Codec for this run.
    #[must_use]
    pub const fn codec(&self) -> JsonCodec {
        JsonCodec::new(self.omit_absent_fields)
    }

    /// Loop options for this run.
    #[must_use]
    pub const fn harness_options(&self) -> HarnessOptions {
        HarnessOptions {
            iterations: self.iterations,
            batch_size: self.batch_size,
            strict: self.strict,
            capture_artifacts: self.capture_artifacts,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a variable if set.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a variable if set.
    fn optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    /// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
    fn flag(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("expected a boolean, got '{other}'"),
            )),
        }
    }
}
