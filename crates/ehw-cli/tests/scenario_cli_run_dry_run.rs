//! `ehw run` end to end against a mock disclosure page.

use std::path::Path;

use assert_cmd::Command;
use ehw_testkit::{asset_list, page_html};
use httpmock::prelude::*;
use predicates::prelude::*;

const HOLDINGS: &[(&str, &str, f64, i64)] = &[
    ("2330", "TSMC", 9.07, 2_722_000),
    ("2454", "MediaTek", 4.10, 310_000),
];

fn write_config(dir: &Path, page_url: &str) -> String {
    let path = dir.join("watch.yaml");
    let yaml = format!(
        r#"
fund:
  code: "00981A"
source:
  url: "{page_url}"
  timeout_secs: 5
store:
  path: "{store}"
telegram:
  token_env: "EHW_CLI_TEST_TOKEN_UNSET"
  chat_id_env: "EHW_CLI_TEST_CHAT_UNSET"
"#,
        store = dir.join("holdings.csv").display()
    );
    std::fs::write(&path, yaml).unwrap();
    path.display().to_string()
}

fn ehw(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ehw").unwrap();
    cmd.current_dir(dir)
        .env_remove("EHW_CLI_TEST_TOKEN_UNSET")
        .env_remove("EHW_CLI_TEST_CHAT_UNSET");
    cmd
}

#[test]
fn dry_run_initializes_then_stays_quiet() {
    let server = MockServer::start();
    let body = page_html(&asset_list(1000.0, 40.0, HOLDINGS)).unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/fund");
        then.status(200).body(body);
    });

    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), &server.url("/fund"));

    ehw(dir.path())
        .args(["run", "--config", cfg.as_str(), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🚀 00981A holdings watcher initialized!"))
        .stdout(predicate::str::contains("💰 Cash position: `4.00%`"))
        .stdout(predicate::str::contains("• TSMC (2330): 2,722,000 shares (9.07%)"))
        .stdout(predicate::str::contains("run_ok holdings=2 added=2"));

    assert!(dir.path().join("holdings.csv").exists());
    assert!(dir.path().join("holdings.csv.meta.json").exists());

    ehw(dir.path())
        .args(["run", "--config", cfg.as_str(), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("📊").not())
        .stdout(predicate::str::contains("run_ok holdings=2 added=0 removed=0 adjusted=0 report_delivered=false"));
}

#[test]
fn dry_run_fetch_failure_reports_and_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/fund");
        then.status(500);
    });

    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), &server.url("/fund"));

    ehw(dir.path())
        .args(["run", "--config", cfg.as_str(), "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("⚠️ 00981A watcher error: fetch failed: http status 500"));

    assert!(!dir.path().join("holdings.csv").exists());
}

#[test]
fn real_run_requires_telegram_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "http://127.0.0.1:9/unused");

    ehw(dir.path())
        .args(["run", "--config", cfg.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRETS_MISSING"))
        .stderr(predicate::str::contains("EHW_CLI_TEST_TOKEN_UNSET"));
}

#[test]
fn strict_config_rejects_unused_keys() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write_config(dir.path(), "http://127.0.0.1:9/unused");
    let overlay = dir.path().join("overlay.yaml");
    std::fs::write(&overlay, "legacy:\n  data_file: \"old.csv\"\n").unwrap();

    ehw(dir.path())
        .args([
            "run",
            "--config",
            cfg.as_str(),
            "--config",
            overlay.to_str().unwrap(),
            "--dry-run",
            "--strict-config",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));
}
