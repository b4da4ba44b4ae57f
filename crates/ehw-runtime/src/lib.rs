//! ehw-runtime
//!
//! One invocation of the watcher: fetch, normalize, load the baseline, diff,
//! render, deliver, persist. Serial, single pass, no retries.
//!
//! Failure policy:
//! - no current snapshot (fetch/parse/empty) is fatal; an error notice is
//!   attempted and nothing is persisted
//! - a legacy baseline file self-heals to an empty baseline with a notice
//! - delivery failures are logged and never abort the run

mod notices;
mod run;
mod types;

pub use notices::{error_notice, initialized_notice, reset_notice};
pub use run::{deliver_best_effort, run_once};
pub use types::*;
