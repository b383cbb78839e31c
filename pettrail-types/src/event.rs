//! The unified event record and its supporting enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which upstream source produced a record.
///
/// Every event belongs to exactly one provenance; the two are concatenated
/// into a single ledger but never merged by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Structured per-pet aggregate report.
    Report,
    /// Free-text notification alert.
    Alert,
}

/// The kind of activity an event describes.
///
/// This is a closed set: the report path maps its category names onto it
/// (anything unrecognized becomes `Unknown`) and the alert path only ever
/// emits `Water`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Food,
    Water,
    Movement,
    Unknown,
}

impl EventKind {
    /// Map an aggregate-report category name onto an event kind.
    pub fn from_category(category: &str) -> Self {
        match category {
            "feeding" => EventKind::Food,
            "drinking" => EventKind::Water,
            "movement" => EventKind::Movement,
            _ => EventKind::Unknown,
        }
    }

    /// Display label used in the exported table.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Food => "Food",
            EventKind::Water => "Water",
            EventKind::Movement => "Movement",
            EventKind::Unknown => "Unknown",
        }
    }
}

/// Who (or what) an event is attributed to.
///
/// Report events are attributed to a pet. Alert events carry no pet identity
/// at all; the closest thing the source offers is the dispensing device,
/// which may itself be unresolved when its display name is not in the
/// configured name-to-id map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// A pet, by its upstream id.
    Pet(i64),
    /// A device, by its mapped id if the display name resolved.
    Device(Option<i64>),
}

impl Subject {
    /// The numeric identity, if any.
    ///
    /// Both variants collapse into the same exported column; see
    /// [`flatten`](crate::flatten).
    pub fn id(&self) -> Option<i64> {
        match self {
            Subject::Pet(id) => Some(*id),
            Subject::Device(id) => *id,
        }
    }
}

/// One normalized export record.
///
/// Events are created fresh each run, never mutated after normalization, and
/// exist only in memory until the final CSV write. `recorded_at` is the
/// run's own timestamp (identical across one run's output) and is passed in
/// by the caller so the normalizers themselves stay deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEvent {
    /// When the export run happened, not when the event did.
    pub recorded_at: DateTime<Utc>,

    /// Which source produced this record.
    pub provenance: Provenance,

    /// Pet or device identity.
    pub subject: Subject,

    /// Display name; `"Primary"` when the source omits a pet name, or the
    /// device display name on the alert path.
    pub pet_name: String,

    /// Activity kind.
    pub kind: EventKind,

    /// Signed quantity. Positive for measured weight changes from reports,
    /// negative for alert-derived removal volumes. `None` means the source
    /// carried no amount or it could not be parsed.
    pub amount: Option<f64>,

    /// Event-occurrence time as reported by the source.
    pub timestamp: Option<DateTime<Utc>>,

    /// Event duration in seconds, when the source provides one.
    pub duration: Option<i64>,

    /// Originating hardware id, when known.
    pub device_id: Option<i64>,

    /// Source-specific auxiliary code.
    pub context: Option<i64>,

    /// Provenance string naming the logical query that produced the record.
    pub source_endpoint: String,
}
