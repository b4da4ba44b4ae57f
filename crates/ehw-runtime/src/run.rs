use ehw_diff::{diff_with, render_with};
use ehw_model::{normalize_with_outcome, NormalizeOutcome, Snapshot};
use ehw_notify::Notifier;
use ehw_store::{LoadOutcome, StoreError};
use tracing::{error, info, warn};

use crate::notices::{error_notice, initialized_notice, reset_notice};
use crate::types::{Baseline, RunContext, RunError, RunOptions, RunSummary};

/// Send `text`, logging instead of propagating failure. Returns whether it went out.
pub async fn deliver_best_effort(notifier: &dyn Notifier, text: &str, what: &str) -> bool {
    match notifier.deliver(text).await {
        Ok(()) => {
            info!(notifier = notifier.name(), what, "message delivered");
            true
        }
        Err(e) => {
            warn!(notifier = notifier.name(), what, error = %e, "message delivery failed");
            false
        }
    }
}

/// Execute one watch cycle.
pub async fn run_once(ctx: &RunContext<'_>, opts: &RunOptions) -> Result<RunSummary, RunError> {
    let outcome = match acquire_current(ctx).await {
        Ok(o) => o,
        Err(e) => {
            error!(source = ctx.source.name(), error = %e, "no current snapshot; aborting run");
            return Err(abort(ctx, opts, e).await);
        }
    };
    let current = &outcome.snapshot;

    let mut delivery_failures = 0_usize;
    let (previous, baseline) = match load_baseline(ctx) {
        Ok(v) => v,
        Err(e) => {
            error!(path = %ctx.store.path().display(), error = %e, "baseline unreadable; aborting run");
            return Err(abort(ctx, opts, e).await);
        }
    };
    let notice = match &baseline {
        Baseline::Loaded { .. } => None,
        Baseline::Initialized => Some(initialized_notice(&opts.fund_code)),
        Baseline::Reset { .. } => Some(reset_notice()),
    };
    if let Some(text) = notice {
        if !deliver_best_effort(ctx.notifier, &text, "baseline notice").await {
            delivery_failures += 1;
        }
    }

    let changes = diff_with(&previous, current, &opts.diff);
    let mut report_delivered = false;
    if changes.has_change() {
        let report = render_with(&changes, &opts.report, opts.date, current.cash_position);
        report_delivered = deliver_best_effort(ctx.notifier, &report, "change report").await;
        if !report_delivered {
            delivery_failures += 1;
        }
    } else {
        info!("no share changes today (market closed or no trades)");
    }

    if let Err(e) = ctx.store.save(current) {
        error!(path = %ctx.store.path().display(), error = %e, "snapshot save failed");
        return Err(abort(ctx, opts, e.into()).await);
    }

    let summary = RunSummary {
        baseline,
        current_holdings: current.len(),
        added: changes.added.len(),
        removed: changes.removed.len(),
        adjusted: changes.adjusted.len(),
        report_delivered,
        delivery_failures,
        skipped_entries: outcome.skipped.len(),
        duplicate_codes: outcome.duplicate_codes.len(),
    };
    info!(
        holdings = summary.current_holdings,
        added = summary.added,
        removed = summary.removed,
        adjusted = summary.adjusted,
        report_delivered = summary.report_delivered,
        "run complete"
    );
    Ok(summary)
}

/// Report a fatal error through the notifier and hand it back.
async fn abort(ctx: &RunContext<'_>, opts: &RunOptions, e: RunError) -> RunError {
    deliver_best_effort(
        ctx.notifier,
        &error_notice(&opts.fund_code, &e.to_string()),
        "error notice",
    )
    .await;
    e
}

async fn acquire_current(ctx: &RunContext<'_>) -> Result<NormalizeOutcome, RunError> {
    let assets = ctx.source.fetch_assets().await?;
    let outcome = normalize_with_outcome(&assets)?;
    info!(
        holdings = outcome.snapshot.len(),
        skipped = outcome.skipped.len(),
        duplicates = outcome.duplicate_codes.len(),
        cash_position = outcome.snapshot.cash_position,
        "current snapshot normalized"
    );
    Ok(outcome)
}

fn load_baseline(ctx: &RunContext<'_>) -> Result<(Snapshot, Baseline), RunError> {
    match ctx.store.load() {
        Ok(LoadOutcome::Loaded(s)) => {
            let holdings = s.len();
            Ok((s, Baseline::Loaded { holdings }))
        }
        Ok(LoadOutcome::Missing) => {
            info!(path = %ctx.store.path().display(), "no baseline; initializing");
            Ok((Snapshot::empty(), Baseline::Initialized))
        }
        Err(StoreError::FormatMismatch { missing_columns }) => {
            warn!(
                path = %ctx.store.path().display(),
                missing = ?missing_columns,
                "legacy baseline format; resetting to empty"
            );
            Ok((Snapshot::empty(), Baseline::Reset { missing_columns }))
        }
        Err(e) => Err(e.into()),
    }
}
