//! # alertgate-cli: Alert Validation Command-Line Interface
//!
//! Runs inbound customer alert documents through the same intake pipeline
//! a service would use, so schema changes and sample payloads can be
//! checked from a shell or CI job.
//!
//! ## Subcommands
//!
//! - `validate`: Validate alert request documents (files or stdin)
//! - `schema`: Show the loaded schema and audit it against the records
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `alertgate-schema`; no validation rules
//!   live here.
//! - Handlers write to a caller-supplied writer and return an exit code.

pub mod config;
pub mod schema;
pub mod validate;
