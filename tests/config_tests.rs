use std::fs;
use std::path::PathBuf;

use alertline::error::{ConfigError, Error};
use alertline::infrastructure::config::settings::Config;

fn write_temp_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn example_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.toml");
    let config = Config::load(path).expect("example config is valid");

    assert_eq!(config.database, "alertline.db");
    assert_eq!(config.schedule.poll_interval_secs, 60);
    assert_eq!(config.schedule.token_refresh_interval_secs, 604_800);
    assert!(config.threads.include_route_tag);
    assert!(!config.dry_run);
}

#[test]
fn config_rejects_zero_page_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[cache]\npage_size = 0\n");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "cache.page_size",
            ..
        })
    ));
}

#[test]
fn config_rejects_zero_http_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[threads.http]\ntimeout_ms = 0\n");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "threads.http",
            ..
        })
    ));
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
}

#[test]
fn unknown_section_values_are_type_checked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "[schedule]\npoll_interval_secs = \"often\"\n");

    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn debug_output_redacts_secrets() {
    let mut config = Config::default();
    config.secrets.threads_access_token = Some("THAAsecret".into());

    let rendered = format!("{config:?}");

    assert!(!rendered.contains("THAAsecret"));
    assert!(rendered.contains("<redacted>"));
}
