//! # pettrail-types
//!
//! Core types for the pettrail export: the universal event schema that both
//! upstream sources (structured aggregate reports and free-text alerts)
//! normalize into, plus the flat-row collapse used when writing CSV.
//!
//! ## Design Goals
//!
//! - **One schema, two provenances**: every record is tagged with the source
//!   that produced it ([`Provenance`]) and carries a discriminated identity
//!   ([`Subject`]) instead of overloading a single id field.
//! - **Lossy fields stay optional**: anything the sources may omit or that
//!   parsing may fail to recover is an `Option`, never a sentinel zero.
//! - **Flat only at the boundary**: the historical single-table shape (pet
//!   and device ids sharing one column) is produced by [`flatten`] at
//!   serialization time and nowhere else.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use pettrail_types::{EventKind, Provenance, Subject, UnifiedEvent};
//!
//! let event = UnifiedEvent {
//!     recorded_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
//!     provenance: Provenance::Alert,
//!     subject: Subject::Device(Some(555555)),
//!     pet_name: "Fountain 1".to_string(),
//!     kind: EventKind::Water,
//!     amount: Some(-150.0),
//!     timestamp: None,
//!     duration: None,
//!     device_id: Some(555555),
//!     context: Some(1),
//!     source_endpoint: "/api/notification".to_string(),
//! };
//!
//! assert_eq!(event.subject.id(), Some(555555));
//! ```

mod event;
mod row;

pub use event::*;
pub use row::*;
