use std::cmp::Ordering;

use ehw_model::{HoldingEntry, Snapshot};

use crate::{AddedHolding, Adjustment, ChangeSet, DiffOptions, RemovedHolding};

/// Display name: current wins, then previous, then the code itself.
fn resolve_name(code: &str, current: Option<&HoldingEntry>, previous: Option<&HoldingEntry>) -> String {
    [current, previous]
        .into_iter()
        .flatten()
        .map(|e| e.name.trim())
        .find(|n| !n.is_empty())
        .unwrap_or(code)
        .to_string()
}

fn adjustment_order(a: &Adjustment, b: &Adjustment) -> Ordering {
    b.share_delta
        .unsigned_abs()
        .cmp(&a.share_delta.unsigned_abs())
        .then_with(|| a.code.cmp(&b.code))
}

/// Compare `previous` against `current` with default options.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> ChangeSet {
    diff_with(previous, current, &DiffOptions::default())
}

/// Deterministic holdings diff:
/// - code only in current  => added
/// - code only in previous => removed
/// - code in both with a nonzero share delta (and at least `min_abs_share_delta`) => adjusted
///
/// Weight-only movement is not a change.
pub fn diff_with(previous: &Snapshot, current: &Snapshot, opts: &DiffOptions) -> ChangeSet {
    let mut changes = ChangeSet::empty();

    // BTreeMap iteration keeps added/removed in code order.
    for (code, cur) in &current.entries {
        match previous.get(code) {
            None => changes.added.push(AddedHolding {
                code: code.clone(),
                name: resolve_name(code, Some(cur), None),
                shares: cur.shares,
                weight: cur.weight,
            }),
            Some(prev) => {
                let share_delta = cur.shares.saturating_sub(prev.shares);
                if share_delta == 0 || share_delta.unsigned_abs() < opts.min_abs_share_delta.unsigned_abs() {
                    continue;
                }
                changes.adjusted.push(Adjustment {
                    code: code.clone(),
                    name: resolve_name(code, Some(cur), Some(prev)),
                    previous_shares: prev.shares,
                    current_shares: cur.shares,
                    share_delta,
                    weight_delta: cur.weight - prev.weight,
                });
            }
        }
    }

    for (code, prev) in &previous.entries {
        if !current.contains(code) {
            changes.removed.push(RemovedHolding {
                code: code.clone(),
                name: resolve_name(code, None, Some(prev)),
                shares: prev.shares,
                weight: prev.weight,
            });
        }
    }

    changes.adjusted.sort_by(adjustment_order);
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(entries: &[(&str, &str, f64, i64)]) -> Snapshot {
        Snapshot::from_entries(
            entries
                .iter()
                .map(|(c, n, w, s)| HoldingEntry::new(*c, *n, *w, *s)),
            0.0,
        )
    }

    #[test]
    fn identical_snapshots_have_no_change() {
        let a = snap(&[("2330", "TSMC", 9.0, 100), ("2454", "MTK", 4.0, 50)]);
        let c = diff(&a, &a);
        assert!(!c.has_change());
        assert_eq!(c, ChangeSet::empty());
    }

    #[test]
    fn current_name_takes_precedence_and_falls_back_to_previous() {
        let prev = snap(&[("1", "Old Name", 1.0, 10), ("2", "Keep Me", 1.0, 10)]);
        let cur = snap(&[("1", "New Name", 1.0, 20), ("2", "", 1.0, 30)]);
        let c = diff(&prev, &cur);
        let names: Vec<&str> = c.adjusted.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Keep Me", "New Name"]);
    }

    #[test]
    fn nameless_entry_displays_code() {
        let c = diff(&Snapshot::empty(), &snap(&[("9999", " ", 1.0, 1)]));
        assert_eq!(c.added[0].name, "9999");
    }

    #[test]
    fn adjusted_sorted_by_abs_delta_then_code() {
        let prev = snap(&[
            ("A", "a", 1.0, 100),
            ("B", "b", 1.0, 100),
            ("C", "c", 1.0, 100),
            ("D", "d", 1.0, 100),
        ]);
        let cur = snap(&[
            ("A", "a", 1.0, 110),  // +10
            ("B", "b", 1.0, 500),  // +400
            ("C", "c", 1.0, 90),   // -10
            ("D", "d", 1.0, 0),    // -100
        ]);
        let c = diff(&prev, &cur);
        assert_eq!(c.adjusted_codes(), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn min_abs_share_delta_filters_noise() {
        let prev = snap(&[("A", "a", 1.0, 1000), ("B", "b", 1.0, 1000)]);
        let cur = snap(&[("A", "a", 1.0, 1001), ("B", "b", 1.0, 3000)]);
        let c = diff_with(
            &prev,
            &cur,
            &DiffOptions {
                min_abs_share_delta: 1000,
            },
        );
        assert_eq!(c.adjusted_codes(), vec!["B"]);
    }

    #[test]
    fn extreme_share_counts_do_not_overflow() {
        let prev = snap(&[("A", "a", 1.0, i64::MIN), ("B", "b", 1.0, i64::MAX)]);
        let cur = snap(&[("A", "a", 1.0, 5), ("B", "b", 1.0, -5)]);
        let c = diff(&prev, &cur);
        assert_eq!(c.adjusted.len(), 2);
        let delta = |code: &str| {
            c.adjusted
                .iter()
                .find(|a| a.code == code)
                .map(|a| a.share_delta)
        };
        assert_eq!(delta("A"), Some(i64::MAX));
        assert_eq!(delta("B"), Some(i64::MIN));
    }

    #[test]
    fn weight_delta_is_kept_even_when_tiny() {
        let prev = snap(&[("A", "a", 1.000, 10)]);
        let cur = snap(&[("A", "a", 1.004, 11)]);
        let c = diff(&prev, &cur);
        assert!((c.adjusted[0].weight_delta - 0.004).abs() < 1e-9);
    }
}
