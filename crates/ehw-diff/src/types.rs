use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Filter knobs for [`crate::diff_with`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Adjustments with `|share_delta|` below this are dropped. `0` keeps any nonzero move.
    pub min_abs_share_delta: i64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            min_abs_share_delta: 0,
        }
    }
}

/// A code present in current but not in previous.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddedHolding {
    pub code: String,
    pub name: String,
    pub shares: i64,
    pub weight: f64,
}

/// A code present in previous but not in current. Share count is the previous one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemovedHolding {
    pub code: String,
    pub name: String,
    pub shares: i64,
    pub weight: f64,
}

/// Share-count movement on a code held in both snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub code: String,
    pub name: String,
    pub previous_shares: i64,
    pub current_shares: i64,
    /// `current - previous`, never zero.
    pub share_delta: i64,
    /// `current.weight - previous.weight`, percentage points.
    pub weight_delta: f64,
}

/// Result of comparing two snapshots.
///
/// `added` and `removed` are ordered by code ascending; `adjusted` by
/// descending `|share_delta|`, ties by code ascending.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<AddedHolding>,
    pub removed: Vec<RemovedHolding>,
    pub adjusted: Vec<Adjustment>,
}

impl ChangeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_change(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.adjusted.is_empty())
    }

    pub fn added_codes(&self) -> BTreeSet<&str> {
        self.added.iter().map(|a| a.code.as_str()).collect()
    }

    pub fn removed_codes(&self) -> BTreeSet<&str> {
        self.removed.iter().map(|r| r.code.as_str()).collect()
    }

    pub fn adjusted_codes(&self) -> Vec<&str> {
        self.adjusted.iter().map(|a| a.code.as_str()).collect()
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.adjusted.len()
    }
}
