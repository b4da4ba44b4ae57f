//! ehw-model
//!
//! Holdings snapshot model for a single ETF disclosure.
//!
//! - [`raw`] is the boundary with the page extractor: the asset list exactly
//!   as published (`AssetCode` / `Value` / `Details`).
//! - [`normalizer`] turns that list into a canonical [`Snapshot`].
//!
//! Deterministic, pure logic. No IO.

pub mod normalizer;
pub mod raw;

pub use normalizer::{
    normalize, normalize_with_outcome, NormalizeError, NormalizeOutcome, SkipReason, SkippedEntry,
};
pub use raw::{parse_asset_list, RawAsset, RawDetail, RawScalar};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One constituent instrument of the fund.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoldingEntry {
    /// Canonical instrument code (see [`canonical_code`]).
    pub code: String,
    /// Display name. May be empty when the source omitted it.
    pub name: String,
    /// Percentage of fund NAV.
    pub weight: f64,
    /// Share count, never negative.
    pub shares: i64,
}

impl HoldingEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>, weight: f64, shares: i64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            weight,
            shares,
        }
    }
}

/// Full holdings state of the fund at one point in time.
///
/// Entries are keyed by code, so code uniqueness holds by construction and
/// iteration order is deterministic (code ascending).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entries: BTreeMap<String, HoldingEntry>,
    /// Cash as a percentage of NAV. `0.0` means unavailable.
    pub cash_position: f64,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = HoldingEntry>, cash_position: f64) -> Self {
        let mut snap = Self {
            entries: BTreeMap::new(),
            cash_position,
        };
        for e in entries {
            snap.insert(e);
        }
        snap
    }

    /// Insert an entry; a previous entry with the same code is replaced and returned.
    pub fn insert(&mut self, entry: HoldingEntry) -> Option<HoldingEntry> {
        self.entries.insert(entry.code.clone(), entry)
    }

    pub fn get(&self, code: &str) -> Option<&HoldingEntry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn codes(&self) -> BTreeSet<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HoldingEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical form of an instrument code.
///
/// Codes arrive as JSON strings, JSON numbers, or CSV text that an earlier
/// tool may have written as a float (`2330.0`). All of these must map to the
/// same key, otherwise one instrument shows up as removed and re-added.
/// An all-digit code followed by an all-zero fraction (`2330.0`, `2330.00`)
/// loses the fraction.
///
/// Returns `None` for blank input.
pub fn canonical_code(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if let Some((int_part, frac)) = t.split_once('.') {
        let all_digits = !int_part.is_empty() && int_part.chars().all(|c| c.is_ascii_digit());
        if all_digits && !frac.is_empty() && frac.chars().all(|c| c == '0') {
            return Some(int_part.to_string());
        }
    }
    Some(t.to_string())
}

/// Why a numeric value cannot be a share count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareCountError {
    /// Not finite, or beyond what an `i64` holds.
    OutOfRange,
    /// Truncated value is below zero.
    Negative(i64),
}

/// Share count from a float: truncate toward zero, reject negative or
/// out-of-range values. Shared by the normalizer and the snapshot store so
/// both sides of a diff obey the same bounds.
pub fn share_count(v: f64) -> Result<i64, ShareCountError> {
    if !v.is_finite() || v.abs() >= i64::MAX as f64 {
        return Err(ShareCountError::OutOfRange);
    }
    let shares = v.trunc() as i64;
    if shares < 0 {
        return Err(ShareCountError::Negative(shares));
    }
    Ok(shares)
}

/// Cash position percentage; `0.0` unless NAV is strictly positive.
pub fn cash_position_pct(cash_value: f64, nav_value: f64) -> f64 {
    if nav_value > 0.0 {
        (cash_value / nav_value) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_code_trims_and_strips_float_suffix() {
        assert_eq!(canonical_code(" 2330 ").as_deref(), Some("2330"));
        assert_eq!(canonical_code("2330.0").as_deref(), Some("2330"));
        assert_eq!(canonical_code("2330.00").as_deref(), Some("2330"));
        assert_eq!(canonical_code("0050.000").as_deref(), Some("0050"));
        assert_eq!(canonical_code("2330.").as_deref(), Some("2330."));
        assert_eq!(canonical_code("2330.01").as_deref(), Some("2330.01"));
        assert_eq!(canonical_code("1.0.0").as_deref(), Some("1.0.0"));
        assert_eq!(canonical_code("0050").as_deref(), Some("0050"));
        assert_eq!(canonical_code("NVDA US").as_deref(), Some("NVDA US"));
        assert_eq!(canonical_code("1.50").as_deref(), Some("1.50"));
        assert_eq!(canonical_code("   "), None);
    }

    #[test]
    fn insert_replaces_same_code() {
        let mut s = Snapshot::empty();
        assert!(s.insert(HoldingEntry::new("2330", "TSMC", 9.0, 100)).is_none());
        let old = s.insert(HoldingEntry::new("2330", "TSMC", 9.5, 120));
        assert_eq!(old.map(|e| e.shares), Some(100));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("2330").map(|e| e.shares), Some(120));
    }

    #[test]
    fn share_count_truncates_and_bounds() {
        assert_eq!(share_count(99.9), Ok(99));
        assert_eq!(share_count(-0.5), Ok(0));
        assert_eq!(share_count(-500.0), Err(ShareCountError::Negative(-500)));
        assert_eq!(share_count(1e30), Err(ShareCountError::OutOfRange));
        assert_eq!(share_count(-1e30), Err(ShareCountError::OutOfRange));
        assert_eq!(share_count(f64::NAN), Err(ShareCountError::OutOfRange));
    }

    #[test]
    fn cash_position_requires_positive_nav() {
        assert_eq!(cash_position_pct(5.0, 0.0), 0.0);
        assert_eq!(cash_position_pct(5.0, -1.0), 0.0);
        assert!((cash_position_pct(5.0, 200.0) - 2.5).abs() < 1e-12);
    }
}
