//! The export pass: fetch, normalize, assemble, write.

use anyhow::{Context, Result};
use chrono::Utc;
use pettrail_surehub::{alerts, report, SurehubClient};
use pettrail_types::UnifiedEvent;
use tracing::info;

use crate::config::ExportConfig;
use crate::output;

/// Run one complete export.
///
/// The ledger is assembled append-only: per-pet report events in the order
/// pets were listed, then alert events in harvest order. The two provenances
/// are not merged by timestamp or identity. Any transport or auth failure
/// aborts the run before the output file is touched.
pub async fn run(config: &ExportConfig) -> Result<()> {
    let recorded_at = Utc::now();

    let mut client = SurehubClient::builder()
        .endpoint(config.endpoint.as_str())
        .credentials(config.email.as_str(), config.password.as_str())
        .login_device_id(config.login_device_id.as_str())
        .build();

    info!("logging in");
    client.login().await?;

    info!("listing pets");
    let pets = client.pets().await?;
    info!("found {} pets", pets.len());

    let mut ledger: Vec<UnifiedEvent> = Vec::new();

    // The household is derived from the first pet; with no pets there is no
    // report pass, but the alert harvest still runs.
    if let Some(household_id) = pets.first().map(|p| p.household_id) {
        for pet in &pets {
            let name = pet.name.as_deref();
            info!("pulling data for {}", name.unwrap_or("Primary"));

            let raw = client
                .aggregate_report(household_id, pet.id, config.from, config.to)
                .await?;

            let endpoint = format!(
                "/api/report/household/{}/pet/{}/aggregate?from={}&to={}",
                household_id, pet.id, config.from, config.to
            );
            let events = report::normalize(&raw, pet.id, name, &endpoint, recorded_at);
            info!("normalized {} report events", events.len());
            ledger.extend(events);
        }
    }

    info!("harvesting notification alerts");
    let notifications = alerts::harvest(&client, &config.harvest).await?;
    let alert_events = alerts::normalize(&notifications, &config.device_map, recorded_at);
    info!(
        "normalized {} water events from {} notifications",
        alert_events.len(),
        notifications.len()
    );
    ledger.extend(alert_events);

    info!("writing {} events to {}", ledger.len(), config.output.display());
    output::write_csv(&config.output, &ledger)
        .with_context(|| format!("failed to write {}", config.output.display()))?;

    Ok(())
}
