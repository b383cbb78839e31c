//! Run configuration: CLI arguments and the resolved export config.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use pettrail_surehub::client::{DEFAULT_ENDPOINT, DEFAULT_LOGIN_DEVICE_ID};
use pettrail_surehub::HarvestOptions;

#[derive(Parser, Debug)]
#[command(name = "pettrail")]
#[command(about = "Export pet activity and water alerts from the SurePetcare cloud to CSV")]
pub struct Args {
    /// SurePetcare account email
    #[arg(long, env = "SUREHUB_EMAIL")]
    pub email: String,

    /// SurePetcare account password
    #[arg(long, env = "SUREHUB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Client identifier sent with the login call
    #[arg(long, default_value = DEFAULT_LOGIN_DEVICE_ID)]
    pub login_device_id: String,

    /// API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// First date to pull data from (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Last date to pull data from (default: today, UTC)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Output CSV path
    #[arg(short, long, default_value = "surepet_events.csv")]
    pub output: PathBuf,

    /// Notifications requested per page
    #[arg(long, default_value = "25")]
    pub page_size: u32,

    /// Maximum notification pages to fetch
    #[arg(long, default_value = "40")]
    pub max_pages: u32,

    /// Seconds to pause between notification pages
    #[arg(long, default_value = "2")]
    pub cooldown_secs: u64,

    /// JSON file mapping alert device display names to numeric ids,
    /// e.g. {"Fountain 1": 555555}
    #[arg(long)]
    pub device_map: Option<PathBuf>,
}

/// Resolved configuration for one export run, passed by value into the
/// components that need it.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub email: String,
    pub password: String,
    pub login_device_id: String,
    pub endpoint: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub output: PathBuf,
    pub harvest: HarvestOptions,
    pub device_map: BTreeMap<String, i64>,
}

impl ExportConfig {
    /// Resolve CLI arguments into a run configuration.
    ///
    /// Fails fast - before any network call - on an inverted date range or
    /// an unreadable device map.
    pub fn from_args(args: Args) -> Result<Self> {
        let to = args.to.unwrap_or_else(|| Utc::now().date_naive());
        if args.from > to {
            bail!("date range is inverted: --from {} is after --to {}", args.from, to);
        }

        let device_map = match &args.device_map {
            Some(path) => load_device_map(path)
                .with_context(|| format!("failed to load device map {}", path.display()))?,
            None => BTreeMap::new(),
        };

        Ok(Self {
            email: args.email,
            password: args.password,
            login_device_id: args.login_device_id,
            endpoint: args.endpoint,
            from: args.from,
            to,
            output: args.output,
            harvest: HarvestOptions {
                page_size: args.page_size,
                max_pages: args.max_pages,
                cooldown: Duration::from_secs(args.cooldown_secs),
            },
            device_map,
        })
    }
}

/// Load the alert device-name to id map from a JSON file.
pub fn load_device_map(path: &Path) -> Result<BTreeMap<String, i64>> {
    let file = File::open(path)?;
    let map = serde_json::from_reader(file)?;
    Ok(map)
}
