//! # pettrail-surehub
//!
//! SurePetcare cloud adapter: an authenticated client for the vendor API
//! plus the normalizers that turn its two data sources - structured per-pet
//! aggregate reports and the paginated free-text notification feed - into
//! unified export events.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{NaiveDate, Utc};
//! use pettrail_surehub::{alerts, report, HarvestOptions, SurehubClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = SurehubClient::builder()
//!         .credentials("me@example.com", "hunter2")
//!         .build();
//!     client.login().await?;
//!
//!     let recorded_at = Utc::now();
//!     let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//!     let to = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//!
//!     for pet in client.pets().await? {
//!         let raw = client
//!             .aggregate_report(pet.household_id, pet.id, from, to)
//!             .await?;
//!         let events = report::normalize(&raw, pet.id, pet.name.as_deref(), "...", recorded_at);
//!         println!("{} events for pet {}", events.len(), pet.id);
//!     }
//!
//!     let notifications = alerts::harvest(&client, &HarvestOptions::default()).await?;
//!     println!("{} notifications", notifications.len());
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod client;
pub mod error;
pub mod report;

pub use alerts::HarvestOptions;
pub use client::{Notification, Pet, SurehubClient, SurehubClientBuilder};
pub use error::SurehubError;
pub use report::AggregateReport;
