//! Offline diff of two persisted snapshots.

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use ehw_config::watch::DEFAULT_TIMEZONE;
use ehw_diff::{diff_with, render_with, DiffOptions, ReportOptions, DEFAULT_REPORT_TITLE};
use ehw_model::Snapshot;
use ehw_store::{LoadOutcome, SnapshotStore};

use super::{parse_date, today_in};

pub struct DiffArgs {
    pub previous: String,
    pub current: String,
    pub date: Option<String>,
    pub min_abs_share_delta: i64,
    pub title: Option<String>,
}

pub fn diff(args: DiffArgs) -> Result<()> {
    if args.min_abs_share_delta < 0 {
        bail!("--min-abs-share-delta must be >= 0");
    }
    let previous = load_snapshot(&args.previous)?;
    let current = load_snapshot(&args.current)?;

    let date = match args.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => {
            let tz: Tz = DEFAULT_TIMEZONE
                .parse()
                .map_err(|e| anyhow::anyhow!("default timezone: {e}"))?;
            today_in(tz)
        }
    };

    let changes = diff_with(
        &previous,
        &current,
        &DiffOptions {
            min_abs_share_delta: args.min_abs_share_delta,
        },
    );
    if !changes.has_change() {
        println!("no changes");
        return Ok(());
    }

    let opts = ReportOptions {
        title: args
            .title
            .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
    };
    println!(
        "{}",
        render_with(&changes, &opts, date, current.cash_position)
    );
    Ok(())
}

fn load_snapshot(path: &str) -> Result<Snapshot> {
    match SnapshotStore::new(path)
        .load()
        .with_context(|| format!("load snapshot: {path}"))?
    {
        LoadOutcome::Loaded(s) => Ok(s),
        LoadOutcome::Missing => bail!("snapshot not found: {path}"),
    }
}
