//! # Validate Subcommand
//!
//! Runs alert request documents through the intake pipeline and reports
//! one result per document: the accepted record, every violation, or the
//! parse error.
//!
//! Exit code: 0 when every document is accepted, 1 when any document is
//! rejected, malformed or unreadable. Schema load failures are returned as
//! errors and mapped to exit code 2 by `main`.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use alertgate_core::{Alert, AlertRequest};
use alertgate_schema::{AlertIntake, IntakeError, ValidationViolations};

use crate::config::{OutputFormat, Settings};

/// Arguments for the `alertgate validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Alert request documents to validate. Reads stdin when empty or `-`.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Outcome for a single document.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentReport {
    /// Passed validation and was mapped.
    Accepted {
        source: String,
        alert: Alert,
    },
    /// Parsed, but broke the schema.
    Rejected {
        source: String,
        violations: ValidationViolations,
    },
    /// Could not be read or parsed.
    Malformed {
        source: String,
        error: String,
    },
}

impl DocumentReport {
    fn from_outcome(source: String, outcome: Result<Alert, IntakeError>) -> Self {
        match outcome {
            Ok(alert) => Self::Accepted { source, alert },
            Err(IntakeError::Rejected { violations }) => Self::Rejected { source, violations },
            Err(e) => Self::Malformed {
                source,
                error: e.to_string(),
            },
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Self::Accepted { source, alert } => {
                let record = serde_json::to_string(alert).map_err(std::io::Error::other)?;
                writeln!(out, "OK    {source} {record}")
            }
            Self::Rejected { source, violations } => {
                writeln!(out, "FAIL  {source}")?;
                for v in violations {
                    writeln!(out, "      {v}")?;
                }
                Ok(())
            }
            Self::Malformed { source, error } => writeln!(out, "FAIL  {source}: {error}"),
        }
    }
}

/// Execute the validate subcommand.
///
/// Text output prints `OK <source> <record>` with the canonical record as
/// JSON, or `FAIL <source>` followed by every violation or the parse error.
///
/// Returns exit code: 0 on success, 1 on validation failure.
pub fn run_validate(args: &ValidateArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let validator = settings.load_validator()?;
    let intake = AlertIntake::new(&validator);

    let sources: Vec<&Path> = if args.paths.is_empty() {
        vec![Path::new("-")]
    } else {
        args.paths.iter().map(PathBuf::as_path).collect()
    };

    let reports: Vec<DocumentReport> = sources
        .into_iter()
        .map(|path| check_source(&intake, path))
        .collect();

    let accepted = reports.iter().filter(|r| r.is_accepted()).count();
    for report in &reports {
        match settings.format {
            OutputFormat::Text => report.write_text(out)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, report)?;
                writeln!(out)?;
            }
        }
    }
    if settings.format == OutputFormat::Text {
        writeln!(out, "\nAlerts: {accepted}/{} accepted", reports.len())?;
    }

    tracing::info!(accepted, total = reports.len(), "validation finished");

    if accepted == reports.len() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn check_source(intake: &AlertIntake<'_>, path: &Path) -> DocumentReport {
    if path == Path::new("-") {
        let source = "<stdin>".to_string();
        return match read_stdin() {
            Ok(raw) => DocumentReport::from_outcome(
                source,
                intake.accept_str(&raw).map(AlertRequest::into_alert),
            ),
            Err(e) => DocumentReport::Malformed {
                source,
                error: format!("{e:#}"),
            },
        };
    }

    tracing::debug!(path = %path.display(), "validating alert document");
    DocumentReport::from_outcome(
        path.display().to_string(),
        intake.accept_file(path).map(AlertRequest::into_alert),
    )
}

fn read_stdin() -> Result<String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("cannot read alert document from stdin")?;
    Ok(raw)
}
