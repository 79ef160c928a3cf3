//! # alertgate-core: Customer Alert Domain Records
//!
//! Defines the typed records an inbound customer alert request is converted
//! into once it has passed schema validation, and the explicit mapping
//! between the kebab-case wire names and the canonical field names.
//!
//! ## Key Design Principles
//!
//! 1. **Immutable records.** `Alert` and `AlertRequest` expose accessors
//!    only. A record is constructed once per inbound request and never
//!    mutated afterwards.
//!
//! 2. **Visible field mapping.** The wire ↔ canonical name translation is a
//!    single table in [`field_map`], not an implicit naming convention. Every
//!    conversion in either direction flows through it.
//!
//! 3. **Single `AlertType` enum.** The closed discriminator set lives in one
//!    place. The schema artifact enumerates the same values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `alertgate-*` crates (this is the leaf).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod alert;
pub mod error;
pub mod field_map;

pub use alert::{Alert, AlertRequest, AlertType, ALERT_TYPE_COUNT};
pub use error::{json_type_name, AlertError};
pub use field_map::{
    canonical_to_wire, canonicalize_keys, wire_keys, wire_to_canonical, AlertField, ALERT_KEY,
    FIELD_MAP,
};
