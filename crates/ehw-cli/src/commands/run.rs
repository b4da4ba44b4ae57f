use std::time::Duration;

use anyhow::{Context, Result};
use ehw_config::{resolve_secrets, ResolvedSecrets, UnusedKeyPolicy, WatchConfig};
use ehw_diff::{DiffOptions, ReportOptions};
use ehw_notify::{Notifier, StdoutNotifier, TelegramNotifier, TelegramNotifierConfig};
use ehw_runtime::{run_once, RunContext, RunOptions};
use ehw_source::{PageSource, PageSourceConfig};
use ehw_store::SnapshotStore;

use super::{load_watch_config, today_in};

pub async fn run(config_paths: &[String], dry_run: bool, strict_config: bool) -> Result<()> {
    let policy = if strict_config {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let (_loaded, cfg) = load_watch_config(config_paths, policy)?;
    let secrets = resolve_secrets(&cfg, !dry_run)?;

    let source = PageSource::new(page_source_config(&cfg)).context("build page source")?;
    let store = SnapshotStore::new(&cfg.store.path);
    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(StdoutNotifier)
    } else {
        Box::new(telegram_notifier(&cfg, &secrets)?)
    };

    let opts = RunOptions {
        fund_code: cfg.fund.code.clone(),
        report: ReportOptions {
            title: cfg.report_title(),
        },
        diff: DiffOptions {
            min_abs_share_delta: cfg.report.min_abs_share_delta,
        },
        date: today_in(cfg.timezone()?),
    };

    let ctx = RunContext {
        source: &source,
        notifier: notifier.as_ref(),
        store: &store,
    };
    let summary = run_once(&ctx, &opts).await.context("watch run failed")?;

    println!(
        "run_ok holdings={} added={} removed={} adjusted={} report_delivered={} delivery_failures={} skipped={} duplicates={}",
        summary.current_holdings,
        summary.added,
        summary.removed,
        summary.adjusted,
        summary.report_delivered,
        summary.delivery_failures,
        summary.skipped_entries,
        summary.duplicate_codes
    );
    Ok(())
}

pub async fn notify_test(config_paths: &[String]) -> Result<()> {
    let (_loaded, cfg) = load_watch_config(config_paths, UnusedKeyPolicy::Warn)?;
    let secrets = resolve_secrets(&cfg, true)?;
    let notifier = telegram_notifier(&cfg, &secrets)?;

    let now = chrono::Utc::now().with_timezone(&cfg.timezone()?);
    let text = format!(
        "✅ {} watcher test message ({})",
        cfg.fund.code,
        now.format("%Y-%m-%d %H:%M")
    );
    notifier
        .deliver(&text)
        .await
        .context("test message delivery failed")?;
    println!("notify_test_ok");
    Ok(())
}

fn page_source_config(cfg: &WatchConfig) -> PageSourceConfig {
    PageSourceConfig {
        url: cfg.source.url.clone(),
        element_id: cfg.source.element_id.clone(),
        attribute: cfg.source.attribute.clone(),
        user_agent: cfg.source.user_agent.clone(),
        timeout: Duration::from_secs(cfg.source.timeout_secs),
    }
}

fn telegram_notifier(cfg: &WatchConfig, secrets: &ResolvedSecrets) -> Result<TelegramNotifier> {
    let (token, chat_id) = secrets.telegram().with_context(|| {
        format!(
            "SECRETS_MISSING: telegram requires env vars '{}' and '{}'",
            cfg.telegram.token_env, cfg.telegram.chat_id_env
        )
    })?;
    TelegramNotifier::new(TelegramNotifierConfig {
        api_base: cfg.telegram.api_base.clone(),
        token: token.to_string(),
        chat_id: chat_id.to_string(),
        parse_mode: cfg.telegram.parse_mode.clone(),
        timeout: Duration::from_secs(cfg.telegram.timeout_secs),
    })
    .context("build telegram notifier")
}
