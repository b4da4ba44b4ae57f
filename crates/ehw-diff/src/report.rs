//! Text report for a [`ChangeSet`].
//!
//! Markup is Telegram "Markdown" (legacy): `*bold*` and `` `code` ``.
//! Sections with nothing to show are omitted; a change-set without changes
//! renders to the empty string.

use chrono::NaiveDate;

use crate::format::{format_signed_thousands, format_thousands};
use crate::{Adjustment, ChangeSet};

pub const DEFAULT_REPORT_TITLE: &str = "00981A Holdings Report";

/// Weight deltas smaller than this (percentage points) are not printed.
pub const WEIGHT_DISPLAY_THRESHOLD: f64 = 0.01;

// Float subtraction of two-decimal weights lands a hair under 0.01.
const WEIGHT_EPSILON: f64 = 1e-9;

const ICON_TITLE: &str = "📊";
const ICON_CASH: &str = "💰";
const ICON_ADDED: &str = "🟢";
const ICON_REMOVED: &str = "🔴";
const ICON_ADJUSTED: &str = "⚖️";
const ICON_UP: &str = "🔺";
const ICON_DOWN: &str = "🔻";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    /// Title label, usually the fund code plus "Holdings Report".
    pub title: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_REPORT_TITLE.to_string(),
        }
    }
}

/// Render with the default title.
pub fn render(changes: &ChangeSet, date: NaiveDate, cash_position: f64) -> String {
    render_with(changes, &ReportOptions::default(), date, cash_position)
}

pub fn render_with(
    changes: &ChangeSet,
    opts: &ReportOptions,
    date: NaiveDate,
    cash_position: f64,
) -> String {
    if !changes.has_change() {
        return String::new();
    }

    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "{ICON_TITLE} *{}* ({})",
        escape_markdown(&opts.title),
        date.format("%m/%d")
    ));
    // Zero doubles as "unavailable".
    if cash_position.is_finite() && cash_position != 0.0 {
        lines.push(format!("{ICON_CASH} Cash position: `{cash_position:.2}%`"));
    }

    if !changes.added.is_empty() {
        lines.push(String::new());
        lines.push(format!("{ICON_ADDED} *Added:*"));
        for a in &changes.added {
            lines.push(format!(
                "• {} ({}): {} shares ({:.2}%)",
                escape_markdown(&a.name),
                escape_markdown(&a.code),
                format_thousands(a.shares),
                a.weight
            ));
        }
    }

    if !changes.removed.is_empty() {
        lines.push(String::new());
        lines.push(format!("{ICON_REMOVED} *Removed:*"));
        for r in &changes.removed {
            lines.push(format!(
                "• {} ({}): sold {} shares",
                escape_markdown(&r.name),
                escape_markdown(&r.code),
                format_thousands(r.shares)
            ));
        }
    }

    if !changes.adjusted.is_empty() {
        lines.push(String::new());
        lines.push(format!("{ICON_ADJUSTED} *Adjusted (share changes):*"));
        for adj in &changes.adjusted {
            lines.push(adjustment_line(adj));
        }
    }

    lines.join("\n").trim().to_string()
}

fn adjustment_line(adj: &Adjustment) -> String {
    let icon = if adj.share_delta > 0 { ICON_UP } else { ICON_DOWN };
    let mut line = format!(
        "{icon} {}: {} shares",
        escape_markdown(&adj.name),
        format_signed_thousands(adj.share_delta)
    );
    if adj.weight_delta.abs() + WEIGHT_EPSILON >= WEIGHT_DISPLAY_THRESHOLD {
        line.push_str(&format!(" (weight {:+.2}%)", adj.weight_delta));
    }
    line
}

/// Escape the characters legacy Telegram Markdown treats as markup.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AddedHolding, RemovedHolding};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn adj(code: &str, delta: i64, wd: f64) -> Adjustment {
        Adjustment {
            code: code.to_string(),
            name: format!("N{code}"),
            previous_shares: 1_000_000,
            current_shares: 1_000_000 + delta,
            share_delta: delta,
            weight_delta: wd,
        }
    }

    #[test]
    fn empty_changeset_renders_nothing() {
        assert_eq!(render(&ChangeSet::empty(), date(), 4.2), "");
    }

    #[test]
    fn title_and_cash_line() {
        let c = ChangeSet {
            adjusted: vec![adj("1", 5, 0.0)],
            ..ChangeSet::empty()
        };
        let out = render(&c, date(), 3.456);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("📊 *00981A Holdings Report* (03/09)"));
        assert_eq!(lines.next(), Some("💰 Cash position: `3.46%`"));
    }

    #[test]
    fn zero_cash_line_omitted() {
        let c = ChangeSet {
            adjusted: vec![adj("1", 5, 0.0)],
            ..ChangeSet::empty()
        };
        assert!(!render(&c, date(), 0.0).contains("Cash position"));
    }

    #[test]
    fn adjustment_line_weight_suffix_rules() {
        assert_eq!(adjustment_line(&adj("1", 50_000, 0.1)), "🔺 N1: +50,000 shares (weight +0.10%)");
        assert_eq!(adjustment_line(&adj("1", -300, -0.25)), "🔻 N1: -300 shares (weight -0.25%)");
        assert_eq!(adjustment_line(&adj("1", 7, 0.009)), "🔺 N1: +7 shares");
        // 0.51 - 0.50 == 0.010000000000000009, 9.08 - 9.07 == 0.009999999999999787
        assert!(adjustment_line(&adj("1", 7, 0.51 - 0.50)).ends_with("(weight +0.01%)"));
        assert!(adjustment_line(&adj("1", 7, 9.08 - 9.07)).ends_with("(weight +0.01%)"));
    }

    #[test]
    fn sections_and_blank_line_separation() {
        let c = ChangeSet {
            added: vec![AddedHolding {
                code: "3017".to_string(),
                name: "AVC".to_string(),
                shares: 155_000,
                weight: 2.0,
            }],
            removed: vec![RemovedHolding {
                code: "2317".to_string(),
                name: "Hon Hai".to_string(),
                shares: 1_200_000,
                weight: 3.3,
            }],
            adjusted: vec![adj("2330", -2000, 0.0)],
        };
        let out = render(&c, date(), 0.0);
        let expected = "📊 *00981A Holdings Report* (03/09)\n\
                        \n\
                        🟢 *Added:*\n\
                        • AVC (3017): 155,000 shares (2.00%)\n\
                        \n\
                        🔴 *Removed:*\n\
                        • Hon Hai (2317): sold 1,200,000 shares\n\
                        \n\
                        ⚖️ *Adjusted (share changes):*\n\
                        🔻 N2330: -2,000 shares";
        assert_eq!(out, expected);
    }

    #[test]
    fn custom_title_and_markdown_escape() {
        let c = ChangeSet {
            adjusted: vec![Adjustment {
                name: "FOO_BAR*".to_string(),
                ..adj("9", 1, 0.0)
            }],
            ..ChangeSet::empty()
        };
        let opts = ReportOptions {
            title: "Fund_X".to_string(),
        };
        let out = render_with(&c, &opts, date(), 0.0);
        assert!(out.starts_with("📊 *Fund\\_X* (03/09)"));
        assert!(out.contains("FOO\\_BAR\\*: +1 shares"));
    }
}
