//! # Field Mapping: Wire Names ↔ Canonical Names
//!
//! Inbound alert documents use kebab-case keys (`customer-id`,
//! `alert-type`, ...). The domain record uses canonical camel-style names
//! (`customerId`, `alertType`, ...). This module is the single table that
//! relates the two.
//!
//! ## Invariant
//!
//! The mapping is total and bijective over the six alert fields: every
//! field has exactly one wire name and exactly one canonical name, and no
//! two fields share either. Keys outside the table are not part of the
//! contract and are ignored rather than rejected.

use serde_json::{Map, Value};

/// Wire key of the envelope member that holds the alert object.
pub const ALERT_KEY: &str = "alert";

/// `(wire name, canonical name)` for every alert field, in declaration order.
pub const FIELD_MAP: [(&str, &str); 6] = [
    ("customer-id", "customerId"),
    ("title", "title"),
    ("message", "message"),
    ("destination-phone-number", "destinationPhoneNumber"),
    ("email", "email"),
    ("alert-type", "alertType"),
];

/// One field of the `Alert` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertField {
    /// Customer the alert is addressed to.
    CustomerId,
    /// Short headline.
    Title,
    /// Alert body.
    Message,
    /// Phone number for SMS delivery.
    DestinationPhoneNumber,
    /// Address for email delivery.
    Email,
    /// Delivery discriminator.
    AlertType,
}

impl AlertField {
    /// All fields in declaration order. Index `i` corresponds to `FIELD_MAP[i]`.
    pub const ALL: [AlertField; 6] = [
        Self::CustomerId,
        Self::Title,
        Self::Message,
        Self::DestinationPhoneNumber,
        Self::Email,
        Self::AlertType,
    ];

    fn index(self) -> usize {
        match self {
            Self::CustomerId => 0,
            Self::Title => 1,
            Self::Message => 2,
            Self::DestinationPhoneNumber => 3,
            Self::Email => 4,
            Self::AlertType => 5,
        }
    }

    /// Kebab-case name used on the wire.
    pub fn wire_name(self) -> &'static str {
        FIELD_MAP[self.index()].0
    }

    /// Camel-style name used by the domain record.
    pub fn canonical_name(self) -> &'static str {
        FIELD_MAP[self.index()].1
    }

    /// Whether the schema requires this field unconditionally.
    pub fn is_required(self) -> bool {
        matches!(self, Self::CustomerId | Self::Message | Self::AlertType)
    }

    /// Look up a field by its wire name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }

    /// Look up a field by its canonical name.
    pub fn from_canonical_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.canonical_name() == name)
    }
}

impl std::fmt::Display for AlertField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Translate a wire key into its canonical name.
pub fn wire_to_canonical(wire: &str) -> Option<&'static str> {
    AlertField::from_wire_name(wire).map(AlertField::canonical_name)
}

/// Translate a canonical name into its wire key.
pub fn canonical_to_wire(canonical: &str) -> Option<&'static str> {
    AlertField::from_canonical_name(canonical).map(AlertField::wire_name)
}

/// Rename the known wire keys of an alert object to canonical names.
///
/// Unknown keys are dropped. Values are carried over untouched.
pub fn canonicalize_keys(wire: &Map<String, Value>) -> Map<String, Value> {
    wire.iter()
        .filter_map(|(k, v)| wire_to_canonical(k).map(|c| (c.to_string(), v.clone())))
        .collect()
}

/// Rename the known canonical keys of an alert object to wire names.
///
/// Inverse of [`canonicalize_keys`]; unknown keys are dropped.
pub fn wire_keys(canonical: &Map<String, Value>) -> Map<String, Value> {
    canonical
        .iter()
        .filter_map(|(k, v)| canonical_to_wire(k).map(|w| (w.to_string(), v.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn field_map_is_bijective() {
        let wire: HashSet<_> = FIELD_MAP.iter().map(|(w, _)| *w).collect();
        let canonical: HashSet<_> = FIELD_MAP.iter().map(|(_, c)| *c).collect();
        assert_eq!(wire.len(), FIELD_MAP.len());
        assert_eq!(canonical.len(), FIELD_MAP.len());
    }

    #[test]
    fn all_fields_match_table_order() {
        for (i, field) in AlertField::ALL.iter().enumerate() {
            assert_eq!(field.wire_name(), FIELD_MAP[i].0);
            assert_eq!(field.canonical_name(), FIELD_MAP[i].1);
        }
    }

    #[test]
    fn lookups_are_inverse() {
        for (wire, canonical) in FIELD_MAP {
            assert_eq!(wire_to_canonical(wire), Some(canonical));
            assert_eq!(canonical_to_wire(canonical), Some(wire));
        }
    }

    #[test]
    fn known_pairs() {
        assert_eq!(wire_to_canonical("customer-id"), Some("customerId"));
        assert_eq!(
            wire_to_canonical("destination-phone-number"),
            Some("destinationPhoneNumber")
        );
        assert_eq!(canonical_to_wire("alertType"), Some("alert-type"));
    }

    #[test]
    fn unknown_names_map_to_none() {
        assert_eq!(wire_to_canonical("priority"), None);
        assert_eq!(wire_to_canonical("customerId"), None);
        assert_eq!(canonical_to_wire("customer-id"), None);
        assert_eq!(canonical_to_wire(""), None);
    }

    #[test]
    fn required_fields() {
        let required: Vec<_> = AlertField::ALL
            .into_iter()
            .filter(|f| f.is_required())
            .map(AlertField::wire_name)
            .collect();
        assert_eq!(required, vec!["customer-id", "message", "alert-type"]);
    }

    #[test]
    fn canonicalize_drops_unknown_keys() {
        let wire = json!({
            "customer-id": "12345",
            "alert-type": "sms",
            "priority": "high"
        });
        let canonical = canonicalize_keys(wire.as_object().unwrap());
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical["customerId"], "12345");
        assert_eq!(canonical["alertType"], "sms");
        assert!(!canonical.contains_key("priority"));
    }

    #[test]
    fn wire_keys_inverts_canonicalize() {
        let wire = json!({
            "customer-id": "12345",
            "title": "Transaction alert",
            "message": "posted",
            "destination-phone-number": "312-445-8842",
            "email": "jo@schmo.com",
            "alert-type": "email"
        });
        let map = wire.as_object().unwrap();
        assert_eq!(&wire_keys(&canonicalize_keys(map)), map);
    }
}
