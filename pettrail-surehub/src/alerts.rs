//! Notification-feed harvesting and alert normalization.
//!
//! The notification feed is the fallback source for water events that the
//! structured reports never see: fountains dispense without a microchip
//! attribution, and the only trace is a human-readable alert like
//! `"150ml from Fountain 1"`. Harvesting walks the paginated feed to
//! exhaustion with a fixed cooldown between pages (the provider rate-limits
//! aggressively); normalization then recovers a volume and a device identity
//! from the alert prose.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pettrail_types::{EventKind, Provenance, Subject, UnifiedEvent};
use regex::Regex;
use tracing::{debug, info};

use crate::client::{Notification, SurehubClient};
use crate::report::parse_timestamp;
use crate::SurehubError;

/// Notification category code marking water dispensed/removed. Other codes
/// (e.g. 32, maintenance reminders) produce no events.
pub const WATER_ALERT_KIND: i64 = 34;

/// Fixed context sentinel distinguishing alert-sourced records in the
/// exported table.
pub const ALERT_CONTEXT: i64 = 1;

/// Provenance string for alert-sourced records.
pub const ALERT_ENDPOINT: &str = "/api/notification";

static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("leading-digits pattern is valid"));

/// Pagination and throttling policy for the alert harvest.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Records requested per page.
    pub page_size: u32,

    /// Upper bound on pages fetched. The feed normally terminates with an
    /// empty page; the bound guarantees termination against a misbehaving
    /// feed and is a normal stop, not an error.
    pub max_pages: u32,

    /// Pause between page requests.
    pub cooldown: Duration,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            page_size: 25,
            max_pages: 40,
            cooldown: Duration::from_secs(2),
        }
    }
}

/// Walk the notification feed to exhaustion.
///
/// Pages are fetched strictly in sequence, 1-indexed, with
/// [`HarvestOptions::cooldown`] between requests. An empty page or the page
/// ceiling stops the walk; records come back in provider order, never
/// re-sorted. Any transport error propagates and discards the pages already
/// collected - the export either covers the whole feed or fails.
pub async fn harvest(
    client: &SurehubClient,
    opts: &HarvestOptions,
) -> Result<Vec<Notification>, SurehubError> {
    let mut collected = Vec::new();

    for page in 1..=opts.max_pages {
        let batch = client.notifications(page, opts.page_size).await?;
        if batch.is_empty() {
            debug!(page, "notification feed exhausted");
            break;
        }

        collected.extend(batch);
        info!("collected {} notifications so far", collected.len());

        if page < opts.max_pages {
            tokio::time::sleep(opts.cooldown).await;
        }
    }

    Ok(collected)
}

/// Recover `(volume magnitude, device display name)` from alert prose.
///
/// The volume is a leading run of decimal digits; none found means `None`
/// (not zero - zero would falsely claim a measured value). The device name
/// is whatever follows the first `" from "`, trimmed; without that separator
/// the whole text stands in as a degraded fallback.
pub fn parse_alert_text(text: &str) -> (Option<u32>, &str) {
    let magnitude = LEADING_DIGITS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let device_name = match text.split_once(" from ") {
        Some((_, rest)) => rest.trim(),
        None => text,
    };

    (magnitude, device_name)
}

/// Normalize harvested alerts into unified water events.
///
/// Only records with the water category code produce output. The parsed
/// volume is negated - this pathway only ever reports water removed from a
/// device. Device identity resolves through the configured display-name map;
/// an unmapped name yields an unresolved subject rather than an error.
pub fn normalize(
    alerts: &[Notification],
    device_map: &BTreeMap<String, i64>,
    recorded_at: DateTime<Utc>,
) -> Vec<UnifiedEvent> {
    alerts
        .iter()
        .filter(|note| note.kind == Some(WATER_ALERT_KIND))
        .map(|note| {
            let (magnitude, device_name) = parse_alert_text(&note.text);
            let device_id = device_map.get(device_name).copied();

            UnifiedEvent {
                recorded_at,
                provenance: Provenance::Alert,
                subject: Subject::Device(device_id),
                pet_name: device_name.to_string(),
                kind: EventKind::Water,
                amount: magnitude.map(|v| -f64::from(v)),
                timestamp: note.created_at.as_deref().and_then(parse_timestamp),
                duration: None,
                device_id,
                context: Some(ALERT_CONTEXT),
                source_endpoint: ALERT_ENDPOINT.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn device_map() -> BTreeMap<String, i64> {
        BTreeMap::from([
            ("Fountain 1".to_string(), 555555),
            ("Fountain 2".to_string(), 555556),
        ])
    }

    fn water_alert(text: &str) -> Notification {
        Notification {
            kind: Some(WATER_ALERT_KIND),
            text: text.to_string(),
            created_at: Some("2025-05-30T06:12:00+00:00".to_string()),
        }
    }

    #[test]
    fn test_parse_volume_and_device() {
        assert_eq!(
            parse_alert_text("150ml from Fountain 1"),
            (Some(150), "Fountain 1")
        );
    }

    #[test]
    fn test_parse_no_leading_digits() {
        assert_eq!(
            parse_alert_text("Maintenance required"),
            (None, "Maintenance required")
        );
    }

    #[test]
    fn test_parse_no_separator_falls_back_to_full_text() {
        assert_eq!(parse_alert_text("Low battery"), (None, "Low battery"));
    }

    #[test]
    fn test_parse_trims_device_name() {
        assert_eq!(
            parse_alert_text("80ml from  Fountain 2 "),
            (Some(80), "Fountain 2")
        );
    }

    #[test]
    fn test_parse_splits_on_first_separator_only() {
        assert_eq!(
            parse_alert_text("20ml from Bowl from Kitchen"),
            (Some(20), "Bowl from Kitchen")
        );
    }

    #[test]
    fn test_normalize_water_alert() {
        let alerts = vec![water_alert("150ml from Fountain 1")];

        let events = normalize(&alerts, &device_map(), run_at());

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.provenance, Provenance::Alert);
        assert_eq!(event.kind, EventKind::Water);
        assert_eq!(event.amount, Some(-150.0));
        assert_eq!(event.pet_name, "Fountain 1");
        assert_eq!(event.subject, Subject::Device(Some(555555)));
        assert_eq!(event.device_id, Some(555555));
        assert_eq!(event.duration, None);
        assert_eq!(event.context, Some(ALERT_CONTEXT));
        assert_eq!(event.source_endpoint, ALERT_ENDPOINT);
        assert_eq!(
            event.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 5, 30, 6, 12, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_discards_other_categories() {
        let alerts = vec![
            Notification {
                kind: Some(32),
                text: "Clean the fountain".to_string(),
                created_at: None,
            },
            Notification {
                kind: None,
                text: "150ml from Fountain 1".to_string(),
                created_at: None,
            },
        ];

        assert!(normalize(&alerts, &device_map(), run_at()).is_empty());
    }

    #[test]
    fn test_normalize_unparseable_text_degrades() {
        let alerts = vec![water_alert("Low battery")];

        let events = normalize(&alerts, &device_map(), run_at());

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, None);
        assert_eq!(events[0].pet_name, "Low battery");
        assert_eq!(events[0].subject, Subject::Device(None));
        assert_eq!(events[0].device_id, None);
    }

    #[test]
    fn test_normalize_preserves_feed_order() {
        let alerts = vec![
            water_alert("10ml from Fountain 1"),
            water_alert("20ml from Fountain 2"),
            water_alert("30ml from Fountain 1"),
        ];

        let events = normalize(&alerts, &device_map(), run_at());
        let amounts: Vec<_> = events.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Some(-10.0), Some(-20.0), Some(-30.0)]);
    }

    #[test]
    fn test_normalize_deterministic_for_fixed_recorded_at() {
        let alerts = vec![water_alert("150ml from Fountain 1")];

        let first = normalize(&alerts, &device_map(), run_at());
        let second = normalize(&alerts, &device_map(), run_at());
        assert_eq!(first, second);
    }
}
