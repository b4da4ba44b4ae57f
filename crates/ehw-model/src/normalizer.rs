//! Raw asset list -> canonical [`Snapshot`].
//!
//! One pass over the asset records:
//! - `NAV`  contributes the fund net asset value.
//! - `CASH` contributes the cash value; cash position is only computed when NAV > 0.
//! - `ST`   carries the per-instrument details, one [`HoldingEntry`] each.
//!
//! Absent numeric fields take the named defaults below. A field that is
//! present but cannot be coerced drops that single entry (recorded as a
//! [`SkippedEntry`]); it never aborts the batch. Duplicate codes: last seen wins.

use std::fmt;

use tracing::{debug, warn};

use crate::raw::{RawAsset, RawDetail, RawScalar};
use crate::{
    canonical_code, cash_position_pct, share_count, HoldingEntry, ShareCountError, Snapshot,
};

pub const ASSET_CODE_NAV: &str = "NAV";
pub const ASSET_CODE_CASH: &str = "CASH";
pub const ASSET_CODE_STOCKS: &str = "ST";

/// NAV when the `NAV` record or its value is absent.
pub const DEFAULT_NAV_VALUE: f64 = 0.0;
/// Cash value when the `CASH` record or its value is absent.
pub const DEFAULT_CASH_VALUE: f64 = 0.0;
/// Weight when `NavRate` is absent or blank.
pub const DEFAULT_WEIGHT: f64 = 0.0;
/// Share count when `Share` is absent or blank.
pub const DEFAULT_SHARES: i64 = 0;

// ---------------------------------------------------------------------------
// Error / outcome types
// ---------------------------------------------------------------------------

/// Errors that prevent producing a current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The asset list could not be deserialized.
    Malformed(String),
    /// No holding survived normalization.
    Empty { skipped: usize },
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeError::Malformed(msg) => write!(f, "malformed asset list: {msg}"),
            NormalizeError::Empty { skipped: 0 } => {
                write!(f, "asset list contains no stock holdings")
            }
            NormalizeError::Empty { skipped } => write!(
                f,
                "asset list contains no usable stock holdings ({skipped} skipped)"
            ),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Why a single detail record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingCode,
    InvalidWeight(String),
    InvalidShares(String),
    NegativeShares(i64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCode => write!(f, "missing DetailCode"),
            SkipReason::InvalidWeight(raw) => write!(f, "NavRate not numeric: '{raw}'"),
            SkipReason::InvalidShares(raw) => write!(f, "Share not numeric: '{raw}'"),
            SkipReason::NegativeShares(v) => write!(f, "Share must be >= 0, got {v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position within the `ST` details list (0-based).
    pub index: usize,
    pub code: Option<String>,
    pub reason: SkipReason,
}

/// Snapshot plus the bookkeeping of what was absorbed along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub snapshot: Snapshot,
    pub skipped: Vec<SkippedEntry>,
    /// Codes seen more than once (one element per extra occurrence).
    pub duplicate_codes: Vec<String>,
    pub nav_value: f64,
    pub cash_value: f64,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize a raw asset list into a [`Snapshot`].
pub fn normalize(assets: &[RawAsset]) -> Result<Snapshot, NormalizeError> {
    normalize_with_outcome(assets).map(|o| o.snapshot)
}

/// Like [`normalize`], also returning skipped entries and duplicate codes.
pub fn normalize_with_outcome(assets: &[RawAsset]) -> Result<NormalizeOutcome, NormalizeError> {
    let mut nav_value = DEFAULT_NAV_VALUE;
    let mut cash_value = DEFAULT_CASH_VALUE;
    let mut snapshot = Snapshot::empty();
    let mut skipped: Vec<SkippedEntry> = Vec::new();
    let mut duplicate_codes: Vec<String> = Vec::new();
    let mut detail_index = 0_usize;

    for asset in assets {
        match asset.asset_code.trim() {
            ASSET_CODE_NAV => nav_value = scalar_or(asset.value.as_ref(), DEFAULT_NAV_VALUE, "NAV"),
            ASSET_CODE_CASH => {
                cash_value = scalar_or(asset.value.as_ref(), DEFAULT_CASH_VALUE, "CASH")
            }
            ASSET_CODE_STOCKS => {
                for detail in asset.details.iter().flatten() {
                    match entry_from_detail(detail) {
                        Ok(entry) => {
                            let code = entry.code.clone();
                            if snapshot.insert(entry).is_some() {
                                warn!(code = %code, "duplicate holding code; keeping last seen");
                                duplicate_codes.push(code);
                            }
                        }
                        Err((code, reason)) => {
                            warn!(index = detail_index, code = ?code, reason = %reason, "skipping holding");
                            skipped.push(SkippedEntry {
                                index: detail_index,
                                code,
                                reason,
                            });
                        }
                    }
                    detail_index += 1;
                }
            }
            other => debug!(asset_code = other, "ignoring asset record"),
        }
    }

    if snapshot.is_empty() {
        return Err(NormalizeError::Empty {
            skipped: skipped.len(),
        });
    }

    snapshot.cash_position = cash_position_pct(cash_value, nav_value);

    Ok(NormalizeOutcome {
        snapshot,
        skipped,
        duplicate_codes,
        nav_value,
        cash_value,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Fund-level scalars fall back to their default; they never drop the snapshot.
fn scalar_or(v: Option<&RawScalar>, default: f64, what: &'static str) -> f64 {
    match v {
        None => default,
        Some(s) if s.is_blank() => default,
        Some(s) => s.to_f64().unwrap_or_else(|| {
            warn!(asset_code = what, raw = ?s, "asset value not numeric; using default");
            default
        }),
    }
}

fn entry_from_detail(d: &RawDetail) -> Result<HoldingEntry, (Option<String>, SkipReason)> {
    let code = d
        .detail_code
        .as_ref()
        .and_then(|c| canonical_code(&c.to_code_text()))
        .ok_or((None, SkipReason::MissingCode))?;

    let weight = match d.nav_rate.as_ref() {
        None => DEFAULT_WEIGHT,
        Some(s) if s.is_blank() => DEFAULT_WEIGHT,
        Some(s) => s.to_f64().ok_or_else(|| {
            (
                Some(code.clone()),
                SkipReason::InvalidWeight(s.to_code_text()),
            )
        })?,
    };

    let shares = match d.share.as_ref() {
        None => DEFAULT_SHARES,
        Some(s) if s.is_blank() => DEFAULT_SHARES,
        Some(s) => coerce_shares(s).map_err(|reason| (Some(code.clone()), reason))?,
    };

    let name = d
        .detail_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Ok(HoldingEntry {
        code,
        name,
        weight,
        shares,
    })
}

/// Float first, then [`share_count`].
fn coerce_shares(s: &RawScalar) -> Result<i64, SkipReason> {
    let v = s
        .to_f64()
        .ok_or_else(|| SkipReason::InvalidShares(s.to_code_text()))?;
    share_count(v).map_err(|e| match e {
        ShareCountError::OutOfRange => SkipReason::InvalidShares(s.to_code_text()),
        ShareCountError::Negative(n) => SkipReason::NegativeShares(n),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
