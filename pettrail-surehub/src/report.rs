//! Normalization of aggregate activity reports into unified events.
//!
//! The report payload is a map from activity-category name ("feeding",
//! "drinking", "movement", ...) to a section holding a `datapoints` list.
//! Real payloads are uneven: categories come and go per date range, sections
//! occasionally change shape, and individual records omit fields. The
//! normalizer's contract is that none of that ever aborts processing -
//! offending categories or records are skipped, offending fields degrade to
//! `None`, and sibling data still comes through.

use chrono::{DateTime, Utc};
use pettrail_types::{EventKind, Provenance, Subject, UnifiedEvent};
use serde_json::Value;

/// Raw aggregate report: activity-category name to section value.
pub type AggregateReport = serde_json::Map<String, Value>;

/// Normalize one pet's aggregate report into unified events.
///
/// Pure transform: `recorded_at` is supplied by the caller, category
/// traversal follows the map's iteration order, and record order within a
/// category is preserved. Produces exactly one event per well-formed
/// datapoint and never fails.
pub fn normalize(
    report: &AggregateReport,
    pet_id: i64,
    pet_name: Option<&str>,
    endpoint: &str,
    recorded_at: DateTime<Utc>,
) -> Vec<UnifiedEvent> {
    let display_name = match pet_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Primary".to_string(),
    };

    let mut events = Vec::new();

    for (category, section) in report {
        let Some(points) = section.get("datapoints").and_then(Value::as_array) else {
            continue;
        };

        for point in points {
            let Some(record) = point.as_object() else {
                continue;
            };

            events.push(UnifiedEvent {
                recorded_at,
                provenance: Provenance::Report,
                subject: Subject::Pet(pet_id),
                pet_name: display_name.clone(),
                kind: EventKind::from_category(category),
                amount: first_weight_change(record),
                timestamp: record
                    .get("to")
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp),
                duration: record.get("duration").and_then(Value::as_i64),
                device_id: record.get("device_id").and_then(Value::as_i64),
                context: record.get("context").and_then(Value::as_i64),
                source_endpoint: endpoint.to_string(),
            });
        }
    }

    events
}

/// The measured amount is the first entry of the record's weight-change
/// list, when one exists.
fn first_weight_change(record: &serde_json::Map<String, Value>) -> Option<f64> {
    record
        .get("weights")
        .and_then(Value::as_array)
        .and_then(|weights| weights.first())
        .and_then(Value::as_object)
        .and_then(|weight| weight.get("change"))
        .and_then(Value::as_f64)
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
