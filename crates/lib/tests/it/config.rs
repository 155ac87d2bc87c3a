use std::io::Write;

use dealsdive::{ReplyMode, Settings, config::ConfigError};

#[test]
fn test_load_settings_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"reply_mode": "echo", "reply_delay_ms": 250, "default_amount": 50000}}"#
    )
    .unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.reply_mode, ReplyMode::Echo);
    assert_eq!(settings.reply_delay_ms, 250);
    assert_eq!(settings.default_amount, 50_000);
    assert_eq!(settings.payment_dwell_ms, 3000);
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"reply_mode": "echo", "echo_preview_chars": 0}}"#).unwrap();
    let err = Settings::load(file.path()).unwrap_err();
    assert!(err.is_validation_error());
}
