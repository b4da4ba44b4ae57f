//! ehw-store
//!
//! On-disk persistence of the last seen holdings snapshot.
//!
//! ## Files
//!
//! | File                 | Content                                         |
//! |----------------------|-------------------------------------------------|
//! | `<path>`             | CSV, header `code,name,weight,shares`           |
//! | `<path>.meta.json`   | [`SnapshotMeta`]: cash position + save time     |
//!
//! Column order on load is free (lookup by header name, case-insensitive).
//! A file missing any required column, e.g. one written before share counts
//! were tracked, is reported as [`StoreError::FormatMismatch`] so the caller
//! can reset its baseline and say so.
//!
//! Saves are write-to-temp + rename, so a concurrent reader sees either the
//! old or the new snapshot, never a torn file.

mod csv_codec;

pub use csv_codec::{parse_snapshot_csv, write_snapshot_csv, SNAPSHOT_COLUMNS};

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ehw_model::Snapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const META_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Filesystem failure.
    Io { path: String, message: String },
    /// CSV could not be read or written.
    Csv(String),
    /// Persisted file lacks required columns.
    FormatMismatch { missing_columns: Vec<String> },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, message } => write!(f, "snapshot io error '{path}': {message}"),
            StoreError::Csv(msg) => write!(f, "snapshot csv error: {msg}"),
            StoreError::FormatMismatch { missing_columns } => write!(
                f,
                "snapshot format mismatch: missing column(s) {}",
                missing_columns.join(", ")
            ),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, StoreError::FormatMismatch { .. })
    }

    fn io(path: &Path, e: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Sidecar metadata. The tabular file has no room for fund-level values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub schema_version: u32,
    pub cash_position: f64,
    pub holdings: usize,
    pub saved_at_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Snapshot),
    /// No snapshot has been saved yet.
    Missing,
}

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn meta_path(&self) -> PathBuf {
        with_suffix(&self.path, ".meta.json")
    }

    pub fn load(&self) -> Result<LoadOutcome, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no persisted snapshot");
            return Ok(LoadOutcome::Missing);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let entries = parse_snapshot_csv(&raw)?;
        let cash_position = self.load_meta().map(|m| m.cash_position).unwrap_or(0.0);

        Ok(LoadOutcome::Loaded(Snapshot::from_entries(entries, cash_position)))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }

        let csv = write_snapshot_csv(snapshot)?;
        let meta = SnapshotMeta {
            schema_version: META_SCHEMA_VERSION,
            cash_position: snapshot.cash_position,
            holdings: snapshot.len(),
            saved_at_utc: Utc::now(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| StoreError::Csv(format!("serialize meta: {e}")))?;

        // Holdings first: a failed save must not pair new cash with old holdings.
        write_atomic(&self.path, csv.as_bytes())?;
        write_atomic(&self.meta_path(), format!("{meta_json}\n").as_bytes())?;
        Ok(())
    }

    /// Missing or unreadable metadata only costs the cash position.
    fn load_meta(&self) -> Option<SnapshotMeta> {
        let path = self.meta_path();
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<SnapshotMeta>(&raw) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable snapshot meta");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = with_suffix(path, ".tmp");
    let result = fs::write(&tmp, bytes)
        .map_err(|e| StoreError::io(&tmp, e))
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e)));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
