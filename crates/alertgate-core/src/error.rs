//! # Error Types
//!
//! Errors raised while building domain records from a wire document.
//! A document that already passed schema validation never produces one of
//! these; they exist so that mapping an unvalidated document is still a
//! typed failure rather than a panic.

use thiserror::Error;

/// Error converting between the wire document and the domain records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// A required field was absent (or `null`) in the wire document.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Wire name of the absent field.
        field: &'static str,
    },

    /// A field was present but did not hold a JSON string.
    #[error("field '{field}' must be a string, found {found}")]
    NotAString {
        /// Wire name of the offending field.
        field: &'static str,
        /// JSON type name of the value that was found.
        found: &'static str,
    },

    /// The envelope or the `alert` member was not a JSON object.
    #[error("'{path}' must be an object, found {found}")]
    NotAnObject {
        /// Dotted path of the offending node.
        path: &'static str,
        /// JSON type name of the value that was found.
        found: &'static str,
    },

    /// An `alert-type` value outside the accepted discriminator set.
    #[error("unknown alert type: {0:?}")]
    UnknownAlertType(String),
}

/// JSON type name of a value, as used in error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(42)), "integer");
        assert_eq!(json_type_name(&json!(4.2)), "number");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }

    #[test]
    fn display_names_the_field() {
        let err = AlertError::MissingField { field: "customer-id" };
        assert_eq!(err.to_string(), "missing required field 'customer-id'");

        let err = AlertError::NotAString {
            field: "title",
            found: "integer",
        };
        assert!(err.to_string().contains("title"));
        assert!(err.to_string().contains("integer"));
    }
}
