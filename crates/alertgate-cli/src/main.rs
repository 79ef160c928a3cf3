//! # alertgate CLI entry point
//!
//! Parses command-line arguments, merges configuration, and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use alertgate_cli::config::{CliConfig, OutputFormat, Settings};
use alertgate_cli::schema::{run_schema, SchemaArgs};
use alertgate_cli::validate::{run_validate, ValidateArgs};

/// Inbound customer alert validation.
///
/// Checks alert request documents against the inbound alert schema and
/// reports the accepted records or every violation.
#[derive(Parser, Debug)]
#[command(name = "alertgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema artifact to use instead of the embedded one.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate alert request documents.
    Validate(ValidateArgs),

    /// Show the alert schema and audit it against the domain records.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Without -v, honor RUST_LOG and fall back to warn.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("alertgate v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let file_config = cli.config.as_deref().map(CliConfig::load).transpose()?;
    let settings = Settings::resolve(file_config, Settings::env_schema(), cli.schema, cli.format);
    tracing::debug!(?settings, "resolved settings");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Validate(args) => run_validate(&args, &settings, &mut out),
        Commands::Schema(args) => run_schema(&args, &settings, &mut out),
    }
}
