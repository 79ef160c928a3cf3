//! # Schema Subcommand
//!
//! Shows the alert schema the other subcommands would use: where it came
//! from, the accepted alert types, the required fields, and any contract
//! findings against the domain records.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use alertgate_core::AlertField;
use alertgate_schema::audit_alert_schema;

use crate::config::{OutputFormat, Settings};

/// Arguments for the `alertgate schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print the full schema document as well.
    #[arg(long)]
    pub full: bool,
}

/// Execute the schema subcommand.
///
/// Returns exit code: 0 when the schema agrees with the domain records,
/// 1 when there are contract findings.
pub fn run_schema(args: &SchemaArgs, settings: &Settings, out: &mut impl Write) -> Result<u8> {
    let validator = settings.load_validator()?;
    let findings = audit_alert_schema(validator.schema());
    let required: Vec<&str> = AlertField::ALL
        .into_iter()
        .filter(|f| f.is_required())
        .map(AlertField::wire_name)
        .collect();

    match settings.format {
        OutputFormat::Text => {
            writeln!(out, "Schema:       {}", validator.source_name())?;
            writeln!(
                out,
                "Alert types:  {}",
                validator.accepted_alert_types().join(", ")
            )?;
            writeln!(out, "Required:     {}", required.join(", "))?;
            if findings.is_empty() {
                writeln!(out, "Contract:     OK")?;
            } else {
                writeln!(out, "Contract:     {} finding(s)", findings.len())?;
                for finding in &findings {
                    writeln!(out, "  WARN: {finding}")?;
                }
            }
            if args.full {
                writeln!(out, "{}", serde_json::to_string_pretty(validator.schema())?)?;
            }
        }
        OutputFormat::Json => {
            let mut report = json!({
                "source": validator.source_name(),
                "accepted_alert_types": validator.accepted_alert_types(),
                "required": required,
                "findings": findings,
            });
            if args.full {
                report["schema"] = validator.schema().clone();
            }
            writeln!(out, "{report}")?;
        }
    }

    Ok(if findings.is_empty() { 0 } else { 1 })
}
