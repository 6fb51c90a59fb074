//! CLI integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use alertline::testkit::fixture::{live_alerts_json, planned, FEED_UPDATED};
use alertline::testkit::http::{StubResponse, StubServer};
use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn alertline(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("alertline");
    cmd.current_dir(dir)
        .env_remove("THREADS_ACCESS_TOKEN")
        .env_remove("THREADS_USER_ID")
        .env_remove("DISCORD_WEBHOOK_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    alertline(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("once"))
        .stdout(predicate::str::contains("refresh-token"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_names_the_binary() {
    let dir = tempfile::tempdir().unwrap();
    alertline(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("alertline"));
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "dry_run = true\n[notifier]\ndiscord = false\n");

    alertline(dir.path())
        .args(["--color", "never", "config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_warns_about_missing_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[notifier]\ndiscord = false\n");

    alertline(dir.path())
        .args(["--color", "never", "config", "validate", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("THREADS_USER_ID"));
}

#[test]
fn config_validate_fails_on_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[schedule]\npoll_interval_secs = 0\n");

    alertline(dir.path())
        .args(["config", "validate", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("schedule.poll_interval_secs"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    alertline(dir.path())
        .args(["config", "validate", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn json_errors_are_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    alertline(dir.path())
        .args(["--json", "config", "validate", "--config", "absent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"type\":\"error\""));
}

#[test]
fn refresh_token_without_token_fails_without_network() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "[notifier]\ndiscord = false\n");

    alertline(dir.path())
        .args(["refresh-token", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("THREADS_"));
}

#[tokio::test(flavor = "multi_thread")]
async fn once_in_dry_run_publishes_then_idles() {
    let body = live_alerts_json(
        FEED_UPDATED,
        &[planned("61748", "Line 1: No service this weekend", 10)],
    );
    let server = StubServer::start(vec![
        StubResponse::json(200, body.clone()),
        StubResponse::json(200, body),
    ])
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        "dry_run = true\ndatabase = \"{}\"\n[feed]\nurl = \"{}/api/alerts/live-alerts\"\n[notifier]\ndiscord = false\n[schedule]\npost_interval_secs = 1\n",
        dir.path().join("alertline.db").display(),
        server.url(),
    );
    let path = write_config(&dir, &config);

    let run = |path: PathBuf, cwd: PathBuf| {
        tokio::task::spawn_blocking(move || {
            alertline(&cwd)
                .args(["--color", "never", "once", "--config"])
                .arg(&path)
                .output()
                .expect("run alertline")
        })
    };

    let first = run(path.clone(), dir.path().to_path_buf()).await.unwrap();
    assert!(first.status.success(), "{first:?}");
    let stdout = String::from_utf8_lossy(&first.stdout);
    assert!(stdout.contains("Published"), "{stdout}");
    assert!(stdout.contains("61748 posted as dry-run-post-1"), "{stdout}");

    let second = run(path, dir.path().to_path_buf()).await.unwrap();
    assert!(second.status.success(), "{second:?}");
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("No new or changed alerts"), "{stdout}");

    assert_eq!(server.requests().len(), 2);
}
