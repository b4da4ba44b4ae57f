//! Command handlers for the `ehw` binary.
//!
//! Shared helpers live here; command logic lives in the submodules.

pub mod diff;
pub mod run;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use ehw_config::{report_unused_keys, LoadedConfig, UnusedKeyPolicy, WatchConfig};
use tracing::{info, warn};

/// Load, hash, and validate layered config. Unused keys are warned about,
/// or rejected under [`UnusedKeyPolicy::Fail`].
pub fn load_watch_config(
    paths: &[String],
    unused_keys: UnusedKeyPolicy,
) -> Result<(LoadedConfig, WatchConfig)> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = ehw_config::load_layered_yaml(&path_refs)?;

    let unused = report_unused_keys(&loaded.config_json, unused_keys)?;
    for ptr in &unused.unused_leaf_pointers {
        warn!(key = %ptr, "config key is not used");
    }

    let cfg = loaded.watch().context("config validation failed")?;
    info!(config_hash = %loaded.config_hash, fund = %cfg.fund.code, "config loaded");
    Ok((loaded, cfg))
}

/// Calendar date "now" in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}
