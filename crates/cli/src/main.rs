//! Customer Round-Trip CLI - serialization round-trip harness.
//!
//! # Usage
//!
//! ```bash
//! # Run with configuration from the environment / .env
//! roundtrip run
//!
//! # Override iteration count and batch size
//! roundtrip run --iterations 20 --batch-size 50
//!
//! # Re-decode a captured artifact
//! roundtrip inspect runs/20260117-093005/20260117-093005-0007.json
//! ```
//!
//! # Commands
//!
//! - `run` - Generate, encode, decode and verify customer batches
//! - `inspect` - Decode a captured artifact and report the result
//!
//! # Exit Codes
//!
//! - `0` - Every iteration round-tripped
//! - `1` - The command failed (configuration, I/O setup, unreadable artifact)
//! - `2` - The run completed but some iterations failed

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use customer_roundtrip_cli::HarnessConfig;

mod commands;

#[derive(Parser)]
#[command(name = "roundtrip")]
#[command(author, version, about = "Customer record serialization round-trip harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the round-trip harness
    Run(RunArgs),
    /// Decode a captured artifact
    Inspect {
        /// Path to the artifact file
        path: PathBuf,
    },
}

/// Overrides for values loaded from the environment.
#[derive(clap::Args)]
struct RunArgs {
    /// Number of iterations
    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    /// Customers generated per iteration
    #[arg(short = 'k', long)]
    batch_size: Option<usize>,

    /// Root directory for run output
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// RNG seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run identifier (default: start timestamp)
    #[arg(long)]
    run_id: Option<String>,

    /// Write absent fields as explicit nulls instead of omitting them
    #[arg(long)]
    keep_nulls: bool,

    /// Only compare record counts, not field values
    #[arg(long)]
    lenient: bool,

    /// Do not write artifacts for failed iterations
    #[arg(long)]
    no_artifacts: bool,
}

impl RunArgs {
    fn apply(self, mut config: HarnessConfig) -> HarnessConfig {
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.run_id.is_some() {
            config.run_id = self.run_id;
        }
        if self.keep_nulls {
            config.omit_absent_fields = false;
        }
        if self.lenient {
            config.strict = false;
        }
        if self.no_artifacts {
            config.capture_artifacts = false;
        }
        config
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "customer_roundtrip_cli=info,roundtrip=info".into());

    // JSON lines when requested (for CI log parsing), text otherwise
    let json = std::env::var("ROUNDTRIP_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the command fully succeeded.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run(args) => {
            let config = args.apply(HarnessConfig::from_env()?);
            let report = commands::run::execute(&config)?;
            Ok(report.is_clean())
        }
        Commands::Inspect { path } => {
            commands::inspect::artifact(&path)?;
            Ok(true)
        }
    }
}
