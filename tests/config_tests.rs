use std::env;
use std::path::PathBuf;

use serial_test::serial;

use diary_client::errors::AppError;
use diary_client::Config;

const VARS: [&str; 5] = [
    "DIARY_SERVER_URL",
    "DIARY_DIR",
    "DIARY_GEOIP_URL",
    "DIARY_TIMEOUT_SECS",
    "HOME",
];

/// Runs `f` with the given variables set and every other config variable removed,
/// restoring the original environment afterwards.
fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
    let saved: Vec<(&str, Option<String>)> =
        VARS.iter().map(|name| (*name, env::var(name).ok())).collect();
    for name in VARS {
        env::remove_var(name);
    }
    for (name, value) in vars {
        env::set_var(name, value);
    }

    let result = f();

    for (name, value) in saved {
        match value {
            Some(value) => env::set_var(name, value),
            None => env::remove_var(name),
        }
    }
    result
}

#[test]
#[serial]
fn test_defaults() {
    let config = with_env(&[("HOME", "/home/writer")], Config::load).unwrap();

    assert_eq!(config.server_url, "http://127.0.0.1:8080");
    assert_eq!(config.state_dir, PathBuf::from("/home/writer/.diary"));
    assert_eq!(config.geoip_url.as_deref(), Some("https://api.ip.sb/geoip"));
    assert_eq!(config.timeout_secs, 30);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_overrides() {
    let config = with_env(
        &[
            ("DIARY_SERVER_URL", "https://diary.example.org"),
            ("DIARY_DIR", "/var/lib/diary"),
            ("DIARY_GEOIP_URL", "http://geo.local/lookup"),
            ("DIARY_TIMEOUT_SECS", "7"),
        ],
        Config::load,
    )
    .unwrap();

    assert_eq!(config.server_url, "https://diary.example.org");
    assert_eq!(config.state_dir, PathBuf::from("/var/lib/diary"));
    assert_eq!(config.geoip_url.as_deref(), Some("http://geo.local/lookup"));
    assert_eq!(config.timeout_secs, 7);
}

#[test]
#[serial]
fn test_empty_geoip_url_disables_lookup() {
    let config = with_env(
        &[("HOME", "/home/writer"), ("DIARY_GEOIP_URL", "")],
        Config::load,
    )
    .unwrap();
    assert!(config.geoip_url.is_none());
}

#[test]
#[serial]
fn test_state_dir_expands_variables() {
    let config = with_env(
        &[("HOME", "/home/writer"), ("DIARY_DIR", "$HOME/journal-keys")],
        Config::load,
    )
    .unwrap();
    assert_eq!(config.state_dir, PathBuf::from("/home/writer/journal-keys"));
}

#[test]
#[serial]
fn test_relative_state_dir_fails_validation() {
    let config = with_env(&[("DIARY_DIR", "keys")], Config::load).unwrap();
    match config.validate() {
        Err(AppError::Config(message)) => assert!(message.contains("absolute")),
        other => panic!("Expected absolute path error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_non_http_server_url_fails_validation() {
    let config = with_env(
        &[("HOME", "/home/writer"), ("DIARY_SERVER_URL", "diary.example.org")],
        Config::load,
    )
    .unwrap();
    assert!(config.validate().is_err());
}
