//! # Alert Intake
//!
//! The full path of an inbound request: raw text is parsed into a JSON
//! tree, the tree is validated against the alert schema, and only a
//! document with no violations is mapped into an [`AlertRequest`].
//!
//! ## Error Taxonomy
//!
//! - Unparseable text is [`IntakeError::Malformed`]. Nothing past parsing
//!   runs.
//! - A parsed document that breaks the schema is [`IntakeError::Rejected`]
//!   and carries every violation, not just the first.
//! - Mapping a validated document does not fail in practice;
//!   [`IntakeError::Mapping`] exists so a schema override that is looser
//!   than the field table still surfaces as an error.
//!
//! Duplicate keys in the source text resolve last-write-wins.

use std::path::Path;

use alertgate_core::{AlertError, AlertRequest};
use serde_json::Value;
use thiserror::Error;

use crate::validate::{AlertSchemaValidator, SchemaError, ValidationViolations};

/// Error from the intake pipeline.
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The input was not valid JSON text.
    #[error("malformed alert document: {reason}")]
    Malformed {
        /// Parser error description.
        reason: String,
    },

    /// The document parsed but does not conform to the alert schema.
    #[error("alert request rejected with {} violation(s):\n{violations}", .violations.len())]
    Rejected {
        /// Every violation found in the document.
        violations: ValidationViolations,
    },

    /// The validated document could not be mapped into the domain records.
    #[error("alert mapping failed: {0}")]
    Mapping(#[from] AlertError),

    /// The alert schema could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The input file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        /// Path that failed to read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl IntakeError {
    /// Violations carried by a rejection, if this is one.
    pub fn violations(&self) -> Option<&ValidationViolations> {
        match self {
            Self::Rejected { violations } => Some(violations),
            _ => None,
        }
    }
}

/// Parse raw text into a JSON tree.
///
/// # Errors
///
/// Returns `IntakeError::Malformed` for anything that is not JSON text.
pub fn parse_document(raw: &str) -> Result<Value, IntakeError> {
    serde_json::from_str(raw).map_err(|e| {
        tracing::warn!(error = %e, "discarding malformed alert document");
        IntakeError::Malformed {
            reason: e.to_string(),
        }
    })
}

/// Runs inbound alert documents through validation and mapping.
#[derive(Debug, Clone, Copy)]
pub struct AlertIntake<'v> {
    validator: &'v AlertSchemaValidator,
}

impl AlertIntake<'static> {
    /// Intake backed by the process-wide embedded schema.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Schema` if the embedded schema cannot compile.
    pub fn shared() -> Result<Self, IntakeError> {
        Ok(Self {
            validator: AlertSchemaValidator::shared()?,
        })
    }
}

impl<'v> AlertIntake<'v> {
    /// Intake backed by a specific validator.
    pub fn new(validator: &'v AlertSchemaValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &'v AlertSchemaValidator {
        self.validator
    }

    /// Parse and validate without mapping.
    ///
    /// Violations are returned as data; only malformed text is an error.
    pub fn check_str(&self, raw: &str) -> Result<ValidationViolations, IntakeError> {
        let document = parse_document(raw)?;
        Ok(self.validator.validate(&document))
    }

    /// Validate a parsed document and map it into an `AlertRequest`.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Rejected` with every violation if the
    /// document fails validation. Mapping is not attempted in that case.
    pub fn accept_value(&self, document: &Value) -> Result<AlertRequest, IntakeError> {
        let violations = self.validator.validate(document);
        if !violations.is_empty() {
            tracing::info!(
                schema = %self.validator.source_name(),
                violations = violations.len(),
                "alert request rejected"
            );
            return Err(IntakeError::Rejected { violations });
        }

        let request = AlertRequest::from_wire(document)?;
        tracing::debug!(
            customer_id = %request.alert().customer_id(),
            alert_type = %request.alert().alert_type(),
            "alert request accepted"
        );
        Ok(request)
    }

    /// Parse, validate and map raw text.
    pub fn accept_str(&self, raw: &str) -> Result<AlertRequest, IntakeError> {
        let document = parse_document(raw)?;
        self.accept_value(&document)
    }

    /// Read a file and run it through [`AlertIntake::accept_str`].
    pub fn accept_file(&self, path: &Path) -> Result<AlertRequest, IntakeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| IntakeError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.accept_str(&raw)
    }
}
