//! Configuration loading and validation.

use std::fs;
use std::path::PathBuf;

use assetsrates::config::Config;
use assetsrates::error::{ConfigError, Error};
use tempfile::TempDir;

fn write_temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).expect("write temp config");
    (dir, path)
}

#[test]
fn loads_full_config() {
    let (_dir, path) = write_temp_config(
        r#"
[server]
host = "127.0.0.1"
port = 9090

[rates]
url = "https://rates.example.com/feed"
poll_interval_secs = 2
request_timeout_ms = 1000

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = Config::load(Some(&path)).expect("valid config");

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.rates.poll_interval_secs, 2);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let (_dir, path) = write_temp_config("");

    let config = Config::load(Some(&path)).expect("empty config is valid");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.rates.poll_interval_secs, 1);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "pretty");
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nope.toml");

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::ReadFile(_))) => {}
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let (_dir, path) = write_temp_config("[server\nhost = ");

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::Parse(_))) => {}
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn rejects_zero_poll_interval() {
    let (_dir, path) = write_temp_config(
        r#"
[rates]
poll_interval_secs = 0
"#,
    );

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "rates.poll_interval_secs",
            ..
        })) => {}
        other => panic!("expected invalid interval error, got {other:?}"),
    }
}

#[test]
fn rejects_malformed_feed_url() {
    let (_dir, path) = write_temp_config(
        r#"
[rates]
url = "not a url"
"#,
    );

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "rates.url", ..
        })) => {}
        other => panic!("expected invalid url error, got {other:?}"),
    }
}

#[test]
fn rejects_non_http_feed_url() {
    let (_dir, path) = write_temp_config(
        r#"
[rates]
url = "ftp://rates.example.com/feed"
"#,
    );

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "rates.url", ..
        })) => {}
        other => panic!("expected invalid url error, got {other:?}"),
    }
}

#[test]
fn rejects_unknown_log_format() {
    let (_dir, path) = write_temp_config(
        r#"
[logging]
format = "xml"
"#,
    );

    match Config::load(Some(&path)) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        })) => {}
        other => panic!("expected invalid format error, got {other:?}"),
    }
}

#[test]
fn env_override_replaces_file_url() {
    let config = Config::default()
        .with_env_overrides(Some("https://rates.example.com/feed".into()));

    assert_eq!(
        config.rates.url.as_deref(),
        Some("https://rates.example.com/feed")
    );

    // Empty values are treated as unset.
    let config = Config::default().with_env_overrides(Some(String::new()));
    assert_eq!(config.rates.url, None);
}

#[test]
fn cli_overrides_replace_bind_address() {
    let config = Config::default().with_cli_overrides(Some("127.0.0.1".into()), Some(9000));

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);

    let config = Config::default().with_cli_overrides(None, None);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8080);
}
