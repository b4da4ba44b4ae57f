//! CSV encoding of snapshot entries.

use std::collections::HashMap;

use ehw_model::{canonical_code, share_count, HoldingEntry, ShareCountError, Snapshot};
use serde::Serialize;
use tracing::warn;

use crate::StoreError;

/// Required header columns, in write order.
pub const SNAPSHOT_COLUMNS: [&str; 4] = ["code", "name", "weight", "shares"];

#[derive(Serialize)]
struct SnapshotRow<'a> {
    code: &'a str,
    name: &'a str,
    weight: f64,
    shares: i64,
}

/// Encode a snapshot as CSV (header + one row per entry, code ascending).
pub fn write_snapshot_csv(snapshot: &Snapshot) -> Result<String, StoreError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for e in snapshot.iter() {
        wtr.serialize(SnapshotRow {
            code: &e.code,
            name: &e.name,
            weight: e.weight,
            shares: e.shares,
        })
        .map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    if snapshot.is_empty() {
        wtr.write_record(SNAPSHOT_COLUMNS)
            .map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| StoreError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Csv(e.to_string()))
}

/// Decode CSV rows into entries.
///
/// Codes are read as text and canonicalized. Rows with a blank code, a
/// non-numeric weight/share value, or a share count that is negative or out
/// of range are skipped with a warning. Blank numeric cells read as zero.
pub fn parse_snapshot_csv(src: &str) -> Result<Vec<HoldingEntry>, StoreError> {
    // Files saved by spreadsheet tools on Windows may carry a BOM.
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(src.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| StoreError::Csv(e.to_string()))?
        .clone();
    let col_idx: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect();

    let missing: Vec<String> = SNAPSHOT_COLUMNS
        .iter()
        .filter(|c| !col_idx.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::FormatMismatch {
            missing_columns: missing,
        });
    }
    let idx = |name: &str| col_idx[name];
    let (i_code, i_name, i_weight, i_shares) =
        (idx("code"), idx("name"), idx("weight"), idx("shares"));

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec.map_err(|e| StoreError::Csv(e.to_string()))?;
        let cell = |i: usize| rec.get(i).map(str::trim).unwrap_or("");
        let row = row + 2; // 1-based, header = 1

        let Some(code) = canonical_code(cell(i_code)) else {
            warn!(row, "skipping persisted row without code");
            continue;
        };
        let Some(weight) = parse_number(cell(i_weight)) else {
            warn!(row, code = %code, raw = cell(i_weight), "skipping persisted row: weight not numeric");
            continue;
        };
        let Some(shares) = parse_number(cell(i_shares)) else {
            warn!(row, code = %code, raw = cell(i_shares), "skipping persisted row: shares not numeric");
            continue;
        };
        let shares = match share_count(shares) {
            Ok(n) => n,
            Err(ShareCountError::Negative(n)) => {
                warn!(row, code = %code, shares = n, "skipping persisted row: negative shares");
                continue;
            }
            Err(ShareCountError::OutOfRange) => {
                warn!(row, code = %code, raw = cell(i_shares), "skipping persisted row: shares out of range");
                continue;
            }
        };

        out.push(HoldingEntry {
            code,
            name: cell(i_name).to_string(),
            weight,
            shares,
        });
    }
    Ok(out)
}

fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return Some(0.0);
    }
    s.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
