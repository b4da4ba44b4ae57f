//! ehw-diff
//!
//! Holdings diff & report engine.
//!
//! - `diff(previous, current)` derives additions, removals, and share-count
//!   adjustments between two snapshots.
//! - `render(changes, date, cash_position)` turns the change-set into the
//!   text report delivered to the channel.
//!
//! Deterministic, pure logic. No IO.

mod engine;
mod format;
mod report;
mod types;

pub use engine::{diff, diff_with};
pub use format::{format_signed_thousands, format_thousands};
pub use report::{render, render_with, ReportOptions, DEFAULT_REPORT_TITLE, WEIGHT_DISPLAY_THRESHOLD};
pub use types::*;
