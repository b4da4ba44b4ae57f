use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ehw")]
#[command(about = "ETF holdings watcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's holdings, report changes, persist the snapshot
    Run {
        /// Layered config paths in merge order (base -> local overrides)
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Print messages to stdout instead of Telegram. No secrets required.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Fail on config keys the watcher does not read (default: warn)
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Diff two persisted snapshot CSVs and print the report
    Diff {
        #[arg(long)]
        previous: String,

        #[arg(long)]
        current: String,

        /// Report date (YYYY-MM-DD). Defaults to today in Asia/Taipei.
        #[arg(long)]
        date: Option<String>,

        /// Drop adjustments whose |share delta| is below this
        #[arg(long, default_value_t = 0)]
        min_abs_share_delta: i64,

        /// Report title
        #[arg(long)]
        title: Option<String>,
    },

    /// Send a test message through the configured Telegram chat
    NotifyTest {
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Local secrets for development; absent in CI/cron where env is injected.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Run {
            config_paths,
            dry_run,
            strict_config,
        } => commands::run::run(&config_paths, dry_run, strict_config).await?,

        Commands::Diff {
            previous,
            current,
            date,
            min_abs_share_delta,
            title,
        } => commands::diff::diff(commands::diff::DiffArgs {
            previous,
            current,
            date,
            min_abs_share_delta,
            title,
        })?,

        Commands::NotifyTest { config_paths } => {
            commands::run::notify_test(&config_paths).await?
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = ehw_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries reports and command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
