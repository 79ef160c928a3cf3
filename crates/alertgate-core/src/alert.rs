//! # Alert Records
//!
//! `AlertRequest` is the envelope of an inbound request; it carries exactly
//! one `Alert`. Both are plain immutable records built after the document
//! has been accepted by the schema validator, and handed off unchanged to
//! whatever delivers the alert.
//!
//! Conversion from and to the wire document goes through the table in
//! [`crate::field_map`]. Serde derives on these types use the canonical
//! (camelCase) names and only serialize: records are emitted, never read
//! back through serde.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{json_type_name, AlertError};
use crate::field_map::{AlertField, ALERT_KEY};

/// Delivery channels accepted in the `alert-type` discriminator.
///
/// The discriminator only selects a channel. It does not change which
/// other fields an alert must carry: an `email` alert without an email
/// address is still structurally valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Email delivery.
    Email,
    /// Mobile push notification.
    Push,
    /// SMS text message.
    Sms,
}

/// Number of accepted alert types.
pub const ALERT_TYPE_COUNT: usize = 3;

impl AlertType {
    /// All accepted alert types, in the order the schema enumerates them.
    pub const ALL: [AlertType; ALERT_TYPE_COUNT] = [Self::Email, Self::Push, Self::Sms];

    /// Wire value of this alert type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = AlertError;

    /// Case-sensitive, matching the schema enumeration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "push" => Ok(Self::Push),
            "sms" => Ok(Self::Sms),
            other => Err(AlertError::UnknownAlertType(other.to_string())),
        }
    }
}

/// A single customer alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    customer_id: String,
    title: Option<String>,
    message: String,
    destination_phone_number: Option<String>,
    email: Option<String>,
    alert_type: String,
}

impl Alert {
    /// Build an alert from its parts.
    pub fn new(
        customer_id: impl Into<String>,
        title: Option<String>,
        message: impl Into<String>,
        destination_phone_number: Option<String>,
        email: Option<String>,
        alert_type: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            title,
            message: message.into(),
            destination_phone_number,
            email,
            alert_type: alert_type.into(),
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn destination_phone_number(&self) -> Option<&str> {
        self.destination_phone_number.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Raw discriminator value as received.
    pub fn alert_type(&self) -> &str {
        &self.alert_type
    }

    /// Parsed discriminator.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::UnknownAlertType` if the stored value is outside
    /// the accepted set, which only happens for records that bypassed
    /// validation.
    pub fn kind(&self) -> Result<AlertType, AlertError> {
        self.alert_type.parse()
    }

    /// Build an alert from a wire-format alert object.
    ///
    /// Keys outside the field table are ignored. Absent and `null` optional
    /// fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns `AlertError::MissingField` if a required field is absent and
    /// `AlertError::NotAString` if any mapped field holds a non-string value.
    pub fn from_wire(wire: &Map<String, Value>) -> Result<Self, AlertError> {
        Ok(Self {
            customer_id: required_string(wire, AlertField::CustomerId)?,
            title: optional_string(wire, AlertField::Title)?,
            message: required_string(wire, AlertField::Message)?,
            destination_phone_number: optional_string(wire, AlertField::DestinationPhoneNumber)?,
            email: optional_string(wire, AlertField::Email)?,
            alert_type: required_string(wire, AlertField::AlertType)?,
        })
    }

    /// Render this alert as a wire-format alert object.
    ///
    /// Only present fields are emitted.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut wire = Map::new();
        for field in AlertField::ALL {
            if let Some(value) = self.get(field) {
                wire.insert(field.wire_name().to_string(), Value::String(value.to_string()));
            }
        }
        wire
    }

    /// Value of a field by its table entry.
    pub fn get(&self, field: AlertField) -> Option<&str> {
        match field {
            AlertField::CustomerId => Some(self.customer_id()),
            AlertField::Title => self.title(),
            AlertField::Message => Some(self.message()),
            AlertField::DestinationPhoneNumber => self.destination_phone_number(),
            AlertField::Email => self.email(),
            AlertField::AlertType => Some(self.alert_type()),
        }
    }
}

fn optional_string(
    wire: &Map<String, Value>,
    field: AlertField,
) -> Result<Option<String>, AlertError> {
    match wire.get(field.wire_name()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(AlertError::NotAString {
            field: field.wire_name(),
            found: json_type_name(other),
        }),
    }
}

fn required_string(wire: &Map<String, Value>, field: AlertField) -> Result<String, AlertError> {
    optional_string(wire, field)?.ok_or(AlertError::MissingField {
        field: field.wire_name(),
    })
}

/// Envelope of an inbound alert request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertRequest {
    alert: Alert,
}

impl AlertRequest {
    pub fn new(alert: Alert) -> Self {
        Self { alert }
    }

    pub fn alert(&self) -> &Alert {
        &self.alert
    }

    /// Hand the alert off, consuming the envelope.
    pub fn into_alert(self) -> Alert {
        self.alert
    }

    /// Build a request from a full wire document (`{"alert": {...}}`).
    ///
    /// # Errors
    ///
    /// Returns `AlertError::NotAnObject` if the document or its `alert`
    /// member is not an object, `AlertError::MissingField` if `alert` is
    /// absent, and any error from [`Alert::from_wire`].
    pub fn from_wire(document: &Value) -> Result<Self, AlertError> {
        let envelope = document.as_object().ok_or(AlertError::NotAnObject {
            path: "$",
            found: json_type_name(document),
        })?;
        let alert = envelope
            .get(ALERT_KEY)
            .ok_or(AlertError::MissingField { field: ALERT_KEY })?;
        let alert = alert.as_object().ok_or(AlertError::NotAnObject {
            path: "$.alert",
            found: json_type_name(alert),
        })?;
        Ok(Self {
            alert: Alert::from_wire(alert)?,
        })
    }

    /// Render the request as a full wire document.
    pub fn to_wire(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert(ALERT_KEY.to_string(), Value::Object(self.alert.to_wire()));
        Value::Object(envelope)
    }
}
