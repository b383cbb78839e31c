//! Flat-row collapse for the exported table.
//!
//! The on-disk shape predates the typed schema: pet and device identities
//! share the `Pet ID` column, and absent values are empty fields. That shape
//! is preserved here, at the serialization boundary, so the ambiguity never
//! leaks back into the in-memory model.

use std::fmt::Display;

use crate::UnifiedEvent;

/// Column names of the exported table, in output order.
pub const CSV_HEADER: [&str; 10] = [
    "Recorded At",
    "Pet ID",
    "Pet Name",
    "Type",
    "Amount",
    "Timestamp",
    "Duration",
    "Device ID",
    "Context",
    "Endpoint",
];

/// Collapse an event into one row of string fields, ordered per
/// [`CSV_HEADER`].
///
/// `None` collapses to the empty field; timestamps render as RFC 3339.
pub fn flatten(event: &UnifiedEvent) -> [String; 10] {
    [
        event.recorded_at.to_rfc3339(),
        opt_field(event.subject.id()),
        event.pet_name.clone(),
        event.kind.as_str().to_string(),
        opt_field(event.amount),
        event
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
        opt_field(event.duration),
        opt_field(event.device_id),
        opt_field(event.context),
        event.source_endpoint.clone(),
    ]
}

fn opt_field<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
