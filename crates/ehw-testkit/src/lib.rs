//! ehw-testkit
//!
//! In-memory collaborators and fixture builders for scenario tests.
//! Nothing here talks to the network.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use ehw_model::{RawAsset, RawDetail, Snapshot};
use ehw_notify::{Notifier, NotifyError};
use ehw_source::{HoldingsSource, SourceError};
use ehw_store::SnapshotStore;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Returns the same asset list on every fetch.
#[derive(Debug, Clone)]
pub struct StaticSource {
    assets: Vec<RawAsset>,
}

impl StaticSource {
    pub fn new(assets: Vec<RawAsset>) -> Self {
        Self { assets }
    }
}

#[async_trait::async_trait]
impl HoldingsSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_assets(&self) -> Result<Vec<RawAsset>, SourceError> {
        Ok(self.assets.clone())
    }
}

/// Fails every fetch with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingSource {
    error: SourceError,
}

impl FailingSource {
    pub fn new(error: SourceError) -> Self {
        Self { error }
    }
}

#[async_trait::async_trait]
impl HoldingsSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_assets(&self) -> Result<Vec<RawAsset>, SourceError> {
        Err(self.error.clone())
    }
}

// ---------------------------------------------------------------------------
// Notifiers
// ---------------------------------------------------------------------------

/// Keeps every delivered message in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(text.to_string());
        Ok(())
    }
}

/// Rejects every message, counting attempts.
#[derive(Debug, Default)]
pub struct FailingNotifier {
    attempts: AtomicUsize,
}

impl FailingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _text: &str) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Transport("simulated outage".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// `(code, name, weight, shares)`
pub type Holding<'a> = (&'a str, &'a str, f64, i64);

/// Asset list shaped like the disclosure page: NAV, CASH, then one ST record.
pub fn asset_list(nav: f64, cash: f64, holdings: &[Holding<'_>]) -> Vec<RawAsset> {
    let details = holdings
        .iter()
        .map(|&(code, name, weight, shares)| RawDetail::new(code, name, weight, shares))
        .collect();
    vec![
        RawAsset::scalar("NAV", nav),
        RawAsset::scalar("CASH", cash),
        RawAsset::stocks(details),
    ]
}

pub fn snapshot_of(holdings: &[Holding<'_>], cash_position: f64) -> Snapshot {
    Snapshot::from_entries(
        holdings
            .iter()
            .map(|&(code, name, weight, shares)| {
                ehw_model::HoldingEntry::new(code, name, weight, shares)
            }),
        cash_position,
    )
}

/// Minimal disclosure page embedding `assets` the way the live site does.
pub fn page_html(assets: &[RawAsset]) -> Result<String> {
    let json = serde_json::to_string(assets).context("serialize asset list")?;
    let escaped = json
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    Ok(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>\
         <div class=\"fund\"><div id=\"DataAsset\" data-content=\"{escaped}\"></div></div>\
         </body></html>"
    ))
}

/// Snapshot file from before share tracking: no `shares` column.
pub fn write_legacy_csv(path: &Path) -> Result<()> {
    std::fs::write(path, "name,code,weight\nTSMC,2330,9.07\nMediaTek,2454,4.10\n")
        .with_context(|| format!("write legacy csv: {}", path.display()))
}

/// A [`SnapshotStore`] inside a temp dir that lives as long as this value.
pub struct TempStore {
    _dir: TempDir,
    pub store: SnapshotStore,
}

impl TempStore {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let store = SnapshotStore::new(dir.path().join("holdings.csv"));
        Ok(Self { _dir: dir, store })
    }
}
