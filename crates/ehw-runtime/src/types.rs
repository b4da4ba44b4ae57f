use std::fmt;

use chrono::NaiveDate;
use ehw_diff::{DiffOptions, ReportOptions};
use ehw_model::NormalizeError;
use ehw_notify::Notifier;
use ehw_source::{HoldingsSource, SourceError};
use ehw_store::{SnapshotStore, StoreError};

/// Collaborators for one run. Borrowed; the caller owns construction.
pub struct RunContext<'a> {
    pub source: &'a dyn HoldingsSource,
    pub notifier: &'a dyn Notifier,
    pub store: &'a SnapshotStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Fund label used in notices.
    pub fund_code: String,
    pub report: ReportOptions,
    pub diff: DiffOptions,
    /// Date printed in the report title.
    pub date: NaiveDate,
}

/// How the previous snapshot was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Baseline {
    /// A compatible snapshot was on disk.
    Loaded { holdings: usize },
    /// No prior file; first run.
    Initialized,
    /// Prior file predates share tracking; replaced by an empty baseline.
    Reset { missing_columns: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub baseline: Baseline,
    pub current_holdings: usize,
    pub added: usize,
    pub removed: usize,
    pub adjusted: usize,
    /// The change report went out (not attempted when nothing changed).
    pub report_delivered: bool,
    /// Notices (init/reset) and report deliveries that failed.
    pub delivery_failures: usize,
    pub skipped_entries: usize,
    pub duplicate_codes: usize,
}

impl RunSummary {
    pub fn has_change(&self) -> bool {
        self.added + self.removed + self.adjusted > 0
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// Page could not be fetched or its asset list extracted.
    Source(SourceError),
    /// Asset list produced no usable snapshot.
    Normalize(NormalizeError),
    /// Baseline unreadable (other than legacy format) or save failed.
    Store(StoreError),
}

impl RunError {
    /// `true` when the run stopped before producing a current snapshot.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(self, RunError::Source(_) | RunError::Normalize(_))
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Source(e) => write!(f, "{e}"),
            RunError::Normalize(e) => write!(f, "{e}"),
            RunError::Store(e) => write!(f, "snapshot store: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<SourceError> for RunError {
    fn from(e: SourceError) -> Self {
        RunError::Source(e)
    }
}

impl From<NormalizeError> for RunError {
    fn from(e: NormalizeError) -> Self {
        RunError::Normalize(e)
    }
}

impl From<StoreError> for RunError {
    fn from(e: StoreError) -> Self {
        RunError::Store(e)
    }
}
