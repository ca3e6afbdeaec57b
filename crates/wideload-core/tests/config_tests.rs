#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use tempfile::NamedTempFile;
use wideload_core::{ExError, ExErrorKind, LogLevel, WideLoadConfig, WideLoadError};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_from_file_reads_section() {
    let file = write_config(
        r#"
[wide_load]
enabled = true
auto_report = false
log_level = "notice"
log_message = "Unit of work completed."
"#,
    );

    let config = WideLoadConfig::from_file(file.path()).unwrap();
    assert!(!config.auto_report);
    assert_eq!(config.log_level, LogLevel::Notice);
    assert_eq!(config.log_message, "Unit of work completed.");
    assert!(config.serializable);
}

#[test]
fn test_from_file_empty_gives_defaults() {
    let file = write_config("");
    let config = WideLoadConfig::from_file(file.path()).unwrap();
    assert_eq!(config, WideLoadConfig::default());
}

#[test]
fn test_from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("wide_load.toml");

    let err = WideLoadConfig::from_file(&missing).unwrap_err();
    assert!(matches!(err, WideLoadError::Io { .. }));
    assert_eq!(ExError::from(err).kind(), ExErrorKind::Io);
}

#[test]
fn test_from_file_rejects_unknown_keys() {
    let file = write_config("log_levle = \"debug\"\n");
    let err = WideLoadConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, WideLoadError::InvalidConfig { .. }));
}

#[test]
fn test_file_then_overrides() {
    let file = write_config("log_level = \"debug\"\nserializable = false\n");
    let mut config = WideLoadConfig::from_file(file.path()).unwrap();

    config
        .apply_overrides(|name| match name {
            "WIDE_LOAD_LOG_LEVEL" => Some("critical".to_string()),
            "WIDE_LOAD_SERIALIZABLE" => Some("on".to_string()),
            _ => None,
        })
        .unwrap();

    assert_eq!(config.log_level, LogLevel::Critical);
    assert!(config.serializable);
}
