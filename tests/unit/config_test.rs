//! Tests for configuration validation

use std::io::Write;
use std::time::Duration;

use slot_booker::config::{BookingConfig, Credentials, PASSWORD_ENV, USERNAME_ENV};
use slot_booker::core::BookingError;

#[test]
fn test_default_config_is_valid() {
    let config = BookingConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.max_attempts, 1000);
    assert_eq!(config.min_wait_secs, 5);
    assert_eq!(config.max_wait_secs, 15);
    assert_eq!(config.snapshot_every, 5);
    assert_eq!(config.notify_repeat, 6);
}

#[test]
fn test_config_invalid_max_attempts() {
    let invalid = BookingConfig {
        max_attempts: 0,
        ..BookingConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_wait_range() {
    let invalid = BookingConfig {
        min_wait_secs: 30,
        max_wait_secs: 10,
        ..BookingConfig::default()
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("must not exceed max wait"));
}

#[test]
fn test_config_partial_json_uses_defaults() {
    let config = BookingConfig::from_json_str(r#"{"max_attempts": 480, "max_wait_secs": 60}"#)
        .expect("valid config");
    assert_eq!(config.max_attempts, 480);
    assert_eq!(config.min_wait_secs, 5);

    let policy = config.retry_policy();
    assert_eq!(policy.max_wait, Duration::from_secs(60));
    assert_eq!(config.schedule().every(), 5);
}

#[test]
fn test_config_rejects_bad_json() {
    assert!(BookingConfig::from_json_str("{not json").is_err());
    assert!(BookingConfig::from_json_str(r#"{"max_attempts": 0}"#).is_err());
}

#[test]
fn test_config_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"max_attempts": 12, "snapshot_every": 0}}"#).expect("write config");

    let config = BookingConfig::from_path(file.path()).expect("load config");
    assert_eq!(config.max_attempts, 12);
    assert_eq!(config.snapshot_every, 0);
}

#[test]
fn test_config_from_missing_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = BookingConfig::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(format!("{err:#}").contains("reading booking config"));
}

#[test]
fn test_credentials_from_lookup() {
    let creds = Credentials::from_lookup(|key| match key {
        k if k == USERNAME_ENV => Some("shopper".to_string()),
        k if k == PASSWORD_ENV => Some("hunter2".to_string()),
        _ => None,
    })
    .expect("credentials");
    assert_eq!(creds.username, "shopper");
    assert_eq!(creds.password(), "hunter2");
    assert!(!format!("{creds:?}").contains("hunter2"));
}

#[test]
fn test_credentials_missing_username() {
    let err = Credentials::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, BookingError::Config(msg) if msg.contains(USERNAME_ENV)));
}

#[test]
fn test_blank_credentials_rejected() {
    assert!(Credentials::new("  ", "secret").validate().is_err());
    assert!(Credentials::new("shopper", "").validate().is_err());
}
