//! # alertgate-schema: Inbound Alert Validation
//!
//! Validates inbound customer alert requests against the inbound alert
//! JSON Schema and converts accepted documents into `alertgate-core`
//! records.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`AlertSchemaValidator`] compiles the schema artifact once and collects
//! every violation in a document. Key function:
//!
//! - [`AlertSchemaValidator::validate`]: returns a
//!   [`ValidationViolations`] set; empty means the document is acceptable.
//!
//! ## Contract Audit (`contract`)
//!
//! [`audit_alert_schema`] compares a schema artifact against the field
//! table and the alert type set, for schemas loaded from disk.
//!
//! ## Intake (`intake`)
//!
//! [`AlertIntake`] chains parsing, validation and mapping. Rejected
//! requests carry the complete violation set.
//!
//! ## Crate Policy
//!
//! - Depends only on `alertgate-core` internally.
//! - Validation failures are data, never panics or early returns.
//! - The embedded schema is compiled at most once per process.

pub mod contract;
pub mod intake;
pub mod validate;

pub use contract::{audit_alert_schema, ContractFinding};
pub use intake::{parse_document, AlertIntake, IntakeError};
pub use validate::{
    AlertSchemaValidator, SchemaError, ValidationViolations, Violation, ViolationKind,
    INBOUND_ALERT_SCHEMA, INBOUND_ALERT_SCHEMA_NAME,
};
