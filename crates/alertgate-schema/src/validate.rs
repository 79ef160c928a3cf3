//! # Alert Schema Validation
//!
//! Validates inbound alert documents against the inbound alert JSON Schema
//! (Draft 2020-12) and reports every failure as a structured [`Violation`].
//!
//! ## Invariant
//!
//! Validation never fails for a well-formed document. Schema violations are
//! returned as data in a [`ValidationViolations`] set; only loading or
//! compiling the schema itself can produce an error.
//!
//! ## Rule Set
//!
//! The schema is flat. `customer-id`, `message` and `alert-type` are
//! required regardless of the alert type, `alert-type` must be one of the
//! enumerated channels, and every other field is only type-checked. The
//! value of `alert-type` never changes which other fields are required.
//!
//! ## Schema Resolution
//!
//! The schema artifact in `schemas/inbound-alert.schema.json` is embedded
//! at compile time. A replacement artifact can be loaded from disk with
//! [`AlertSchemaValidator::from_path`]. External `$ref` URIs are never
//! fetched over the network.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use alertgate_core::json_type_name;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::contract::audit_alert_schema;

/// The inbound alert schema artifact, embedded at compile time.
pub const INBOUND_ALERT_SCHEMA: &str =
    include_str!("../../../schemas/inbound-alert.schema.json");

/// Name reported for the embedded schema in errors and logs.
pub const INBOUND_ALERT_SCHEMA_NAME: &str = "inbound-alert.schema.json";

/// JSON Pointer of the `alert-type` enumeration inside the schema.
const ALERT_TYPE_ENUM_POINTER: &str = "/properties/alert/properties/alert-type/enum";

/// Retriever that resolves `$ref` URIs only against the loaded schema.
///
/// Any other URI is refused, so compiling a schema never makes a network
/// request.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas_by_uri
            .get(uri_str)
            .cloned()
            .ok_or_else(|| format!("external schema reference not permitted: {uri_str}").into())
    }
}

/// Error loading or compiling the alert schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema artifact could not be read or parsed.
    #[error("schema load error for '{source_name}': {reason}")]
    Load {
        /// Schema filename or path.
        source_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The schema parsed but could not be compiled into a validator.
    #[error("validator build error for schema '{source_name}': {reason}")]
    Build {
        /// Schema filename or path.
        source_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// Category of a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent.
    MissingRequired,
    /// A value lies outside its enumeration.
    InvalidEnumeration,
    /// A value has the wrong JSON type.
    InvalidType,
    /// Any other schema keyword failure.
    Other,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// What kind of rule was broken.
    pub kind: ViolationKind,
    /// Dotted path of the offending field (e.g. `$.alert.alert-type`).
    ///
    /// For a missing field this names the field itself, not its parent.
    pub field_path: String,
    /// JSON Pointer of the instance node the failing keyword was applied to.
    pub instance_path: String,
    /// JSON Pointer within the schema of the failing keyword.
    pub schema_path: String,
    /// The offending value, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
    /// Human-readable reason, without the path.
    pub reason: String,
}

impl Violation {
    /// Field name: the last segment of [`Violation::field_path`].
    pub fn field(&self) -> &str {
        self.field_path
            .rsplit('.')
            .next()
            .unwrap_or(&self.field_path)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.reason)
    }
}

/// Set of violations for a single document.
///
/// Duplicates are removed and the order is deterministic (by field path,
/// then reason), so two runs over the same document compare equal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Rendered `path: reason` messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }

    /// Whether a violation of `kind` names the field `field`.
    pub fn has(&self, kind: ViolationKind, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.kind == kind && v.field() == field)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl FromIterator<Violation> for ValidationViolations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        let mut violations: Vec<Violation> = iter.into_iter().collect();
        violations.sort_by(|a, b| {
            (&a.field_path, &a.reason, a.kind).cmp(&(&b.field_path, &b.reason, b.kind))
        });
        violations.dedup_by(|a, b| {
            a.field_path == b.field_path && a.reason == b.reason && a.kind == b.kind
        });
        Self { violations }
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// Compiled inbound alert schema.
///
/// ## Thread Safety
///
/// `AlertSchemaValidator` is `Send + Sync`. It is immutable once built and
/// can be shared across threads without locking; see
/// [`AlertSchemaValidator::shared`] for the process-wide instance.
pub struct AlertSchemaValidator {
    source_name: String,
    schema: Value,
    validator: Validator,
    accepted_alert_types: Vec<String>,
}

impl fmt::Debug for AlertSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertSchemaValidator")
            .field("source_name", &self.source_name)
            .field("accepted_alert_types", &self.accepted_alert_types)
            .finish_non_exhaustive()
    }
}

impl AlertSchemaValidator {
    /// Compile the embedded inbound alert schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` only if the embedded artifact is broken.
    pub fn new() -> Result<Self, SchemaError> {
        let schema: Value =
            serde_json::from_str(INBOUND_ALERT_SCHEMA).map_err(|e| SchemaError::Load {
                source_name: INBOUND_ALERT_SCHEMA_NAME.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::from_value_named(schema, INBOUND_ALERT_SCHEMA_NAME)
    }

    /// Load and compile a schema artifact from disk.
    ///
    /// Contract findings (see [`crate::contract`]) are logged as warnings
    /// but do not prevent loading.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Load` if the file cannot be read or is not
    /// JSON, and `SchemaError::Build` if it is not a valid schema.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Load {
            source_name: source_name.clone(),
            reason: format!("cannot read file: {e}"),
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| SchemaError::Load {
            source_name: source_name.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;

        for finding in audit_alert_schema(&schema) {
            tracing::warn!(schema = %source_name, %finding, "schema contract finding");
        }

        Self::from_value_named(schema, &source_name)
    }

    /// Compile an already parsed schema document.
    pub fn from_value(schema: Value) -> Result<Self, SchemaError> {
        Self::from_value_named(schema, "(inline)")
    }

    fn from_value_named(schema: Value, source_name: &str) -> Result<Self, SchemaError> {
        let mut schemas_by_uri = HashMap::new();
        if let Some(id) = schema.get("$id").and_then(Value::as_str) {
            schemas_by_uri.insert(id.to_string(), schema.clone());
        }

        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(LocalSchemaRetriever { schemas_by_uri })
            .build(&schema)
            .map_err(|e| SchemaError::Build {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;

        let accepted_alert_types = schema
            .pointer(ALERT_TYPE_ENUM_POINTER)
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(schema = source_name, "compiled alert schema");

        Ok(Self {
            source_name: source_name.to_string(),
            schema,
            validator,
            accepted_alert_types,
        })
    }

    /// Process-wide validator for the embedded schema, compiled on first use.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Build` if the embedded artifact failed to
    /// compile. The failure is cached; later calls report the same error.
    pub fn shared() -> Result<&'static AlertSchemaValidator, SchemaError> {
        static SHARED: OnceLock<Result<AlertSchemaValidator, String>> = OnceLock::new();
        SHARED
            .get_or_init(|| Self::new().map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|reason| SchemaError::Build {
                source_name: INBOUND_ALERT_SCHEMA_NAME.to_string(),
                reason: reason.clone(),
            })
    }

    /// Where the schema came from (filename, path, or `(inline)`).
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// The loaded schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The `alert-type` enumeration declared by the loaded schema.
    pub fn accepted_alert_types(&self) -> &[String] {
        &self.accepted_alert_types
    }

    /// Whether `instance` passes the schema.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Validate a parsed document and collect every violation.
    ///
    /// An empty result means the document may be mapped into an
    /// `AlertRequest`.
    pub fn validate(&self, instance: &Value) -> ValidationViolations {
        let violations: ValidationViolations = self
            .validator
            .iter_errors(instance)
            .map(|e| violation_from_error(&e))
            .collect();

        tracing::trace!(
            schema = %self.source_name,
            violations = violations.len(),
            "validated alert document"
        );

        violations
    }
}

/// Translate a `jsonschema` error into a [`Violation`].
///
/// The reason text is rendered here from the structured error kind rather
/// than taken from the library's message, so the wording is stable.
fn violation_from_error(error: &ValidationError<'_>) -> Violation {
    let instance_path = error.instance_path.to_string();
    let schema_path = error.schema_path.to_string();
    let node_path = dotted_path(&instance_path);

    let (kind, field_path, received, reason) = match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            (
                ViolationKind::MissingRequired,
                format!("{node_path}.{name}"),
                None,
                "is missing but it is required".to_string(),
            )
        }
        ValidationErrorKind::Enum { options } => (
            ViolationKind::InvalidEnumeration,
            node_path,
            Some(error.instance.clone().into_owned()),
            format!(
                "does not have a value in the enumeration [{}]",
                render_options(options)
            ),
        ),
        ValidationErrorKind::Type {
            kind: TypeKind::Single(expected),
        } => (
            ViolationKind::InvalidType,
            node_path,
            Some(error.instance.clone().into_owned()),
            format!(
                "{} found, {expected} expected",
                json_type_name(&error.instance)
            ),
        ),
        _ => (
            ViolationKind::Other,
            node_path,
            Some(error.instance.clone().into_owned()),
            error.to_string(),
        ),
    };

    Violation {
        kind,
        field_path,
        instance_path,
        schema_path,
        received,
        reason,
    }
}

/// Convert a JSON Pointer (`/alert/alert-type`) to a dotted path
/// (`$.alert.alert-type`).
fn dotted_path(pointer: &str) -> String {
    let mut path = String::from("$");
    for segment in pointer.split('/').skip(1) {
        path.push('.');
        path.push_str(&segment.replace("~1", "/").replace("~0", "~"));
    }
    path
}

fn render_options(options: &Value) -> String {
    match options {
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
