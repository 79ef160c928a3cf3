//! # Schema Contract Audit
//!
//! The schema artifact is versioned separately from the code. This module
//! checks a loaded schema against what the domain records assume, so that
//! a replacement artifact which drifts from the field table or the alert
//! type set is noticed when it is loaded.
//!
//! Checks:
//! - `alert.required` lists exactly the unconditionally required fields;
//! - every field in the field table is declared under `alert.properties`;
//! - the `alert-type` enumeration equals [`AlertType::ALL`];
//! - `alert` does not set `additionalProperties: false`, since unknown
//!   fields must be tolerated.

use std::collections::BTreeSet;
use std::fmt;

use alertgate_core::{AlertField, AlertType};
use serde::Serialize;
use serde_json::Value;

/// A mismatch between a schema document and the alert domain records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractFinding {
    /// JSON Pointer within the schema where the finding applies.
    pub json_path: String,
    /// What the schema currently declares.
    pub current_value: String,
    /// What the domain records expect.
    pub expected: String,
}

impl fmt::Display for ContractFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: found {}, expected {}",
            self.json_path, self.current_value, self.expected
        )
    }
}

/// Audit a parsed alert schema against the domain records.
///
/// Returns an empty list when the schema agrees with the field table and
/// the alert type set.
pub fn audit_alert_schema(schema: &Value) -> Vec<ContractFinding> {
    let mut findings = Vec::new();

    let Some(alert) = schema.pointer("/properties/alert") else {
        findings.push(ContractFinding {
            json_path: "/properties/alert".to_string(),
            current_value: "(absent)".to_string(),
            expected: "an object schema for the alert member".to_string(),
        });
        return findings;
    };

    check_required(alert, &mut findings);
    check_properties(alert, &mut findings);
    check_enumeration(alert, &mut findings);

    if alert.get("additionalProperties") == Some(&Value::Bool(false)) {
        findings.push(ContractFinding {
            json_path: "/properties/alert/additionalProperties".to_string(),
            current_value: "false".to_string(),
            expected: "absent or true (unknown fields are tolerated)".to_string(),
        });
    }

    findings
}

fn string_set(value: Option<&Value>) -> Option<BTreeSet<&str>> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
}

fn render_set<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    format!("[{}]", items.into_iter().collect::<Vec<_>>().join(", "))
}

fn check_required(alert: &Value, findings: &mut Vec<ContractFinding>) {
    let expected: BTreeSet<&str> = AlertField::ALL
        .into_iter()
        .filter(|f| f.is_required())
        .map(AlertField::wire_name)
        .collect();
    let current = string_set(alert.get("required"));

    if current.as_ref() != Some(&expected) {
        findings.push(ContractFinding {
            json_path: "/properties/alert/required".to_string(),
            current_value: current
                .map(render_set)
                .unwrap_or_else(|| "(absent)".to_string()),
            expected: render_set(expected),
        });
    }
}

fn check_properties(alert: &Value, findings: &mut Vec<ContractFinding>) {
    let properties = alert.get("properties").and_then(Value::as_object);
    for field in AlertField::ALL {
        let declared = properties.is_some_and(|p| p.contains_key(field.wire_name()));
        if !declared {
            findings.push(ContractFinding {
                json_path: format!("/properties/alert/properties/{}", field.wire_name()),
                current_value: "(absent)".to_string(),
                expected: "a string property".to_string(),
            });
        }
    }
}

fn check_enumeration(alert: &Value, findings: &mut Vec<ContractFinding>) {
    let expected: BTreeSet<&str> = AlertType::ALL.iter().map(AlertType::as_str).collect();
    let current = string_set(alert.pointer("/properties/alert-type/enum"));

    if current.as_ref() != Some(&expected) {
        findings.push(ContractFinding {
            json_path: "/properties/alert/properties/alert-type/enum".to_string(),
            current_value: current
                .map(render_set)
                .unwrap_or_else(|| "(absent)".to_string()),
            expected: render_set(expected),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::INBOUND_ALERT_SCHEMA;
    use serde_json::json;

    fn embedded() -> Value {
        serde_json::from_str(INBOUND_ALERT_SCHEMA).unwrap()
    }

    #[test]
    fn embedded_schema_has_no_findings() {
        let findings = audit_alert_schema(&embedded());
        assert!(findings.is_empty(), "findings: {findings:?}");
    }

    #[test]
    fn missing_alert_member_is_single_finding() {
        let findings = audit_alert_schema(&json!({"type": "object"}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].json_path, "/properties/alert");
    }

    #[test]
    fn extra_enumeration_value_is_reported() {
        let mut schema = embedded();
        schema["properties"]["alert"]["properties"]["alert-type"]["enum"] =
            json!(["email", "push", "sms", "fax"]);
        let findings = audit_alert_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].current_value, "[email, fax, push, sms]");
        assert_eq!(findings[0].expected, "[email, push, sms]");
    }

    #[test]
    fn conditional_requirement_is_reported() {
        let mut schema = embedded();
        schema["properties"]["alert"]["required"] =
            json!(["customer-id", "message", "alert-type", "email"]);
        let findings = audit_alert_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].json_path, "/properties/alert/required");
    }

    #[test]
    fn undeclared_field_is_reported() {
        let mut schema = embedded();
        schema["properties"]["alert"]["properties"]
            .as_object_mut()
            .unwrap()
            .remove("destination-phone-number");
        let findings = audit_alert_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].json_path.ends_with("destination-phone-number"));
    }

    #[test]
    fn closed_alert_object_is_reported() {
        let mut schema = embedded();
        schema["properties"]["alert"]["additionalProperties"] = json!(false);
        let findings = audit_alert_schema(&schema);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].to_string().contains("additionalProperties"));
    }
}
