//! `config.json` loading: happy path, defaults, and error messages.

use std::fs;

use backup_helper_core::{Config, ConfigError, MailEncryption, ToolConfig};
use tempfile::TempDir;

const FULL: &str = r#"{
    "MailHost": "smtp.example.com",
    "MailPort": 465,
    "MailUser": "backup",
    "MailPass": "secret",
    "MailEncryption": "SSL/TLS",
    "FromMail": "backup@example.com",
    "ToMail": "me@example.com"
}"#;

#[test]
fn load_minimal_config_uses_tool_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, FULL).expect("write");

    let cfg = Config::load_from(&path).expect("load");
    assert_eq!(cfg.mail_host, "smtp.example.com");
    assert_eq!(cfg.mail_port, 465);
    assert_eq!(cfg.from_mail, "backup@example.com");
    assert_eq!(cfg.to_mail, "me@example.com");
    assert_eq!(cfg.encryption().unwrap(), MailEncryption::SslTls);
    assert_eq!(cfg.tools, ToolConfig::default());
    assert_eq!(cfg.tools.verify_program, "cshatag");
    assert_eq!(cfg.tools.sync_program, "rsync");
    assert!(cfg.command_timeout().is_none());
}

#[test]
fn load_config_with_tool_overrides() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    let json = FULL.replace(
        "\"ToMail\": \"me@example.com\"",
        r#""ToMail": "me@example.com",
           "Tools": { "SyncProgram": "/usr/local/bin/rsync" },
           "CommandTimeoutSecs": 3600"#,
    );
    fs::write(&path, json).expect("write");

    let cfg = Config::load_from(&path).expect("load");
    assert_eq!(cfg.tools.sync_program, "/usr/local/bin/rsync");
    assert_eq!(cfg.tools.verify_program, "cshatag", "unset keys keep defaults");
    assert_eq!(cfg.command_timeout().unwrap().as_secs(), 3600);
}

#[test]
fn missing_config_returns_read_error_with_path() {
    let dir = TempDir::new().expect("tempdir");
    let err = Config::load_from(&dir.path().join("config.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }), "got: {err}");
    assert!(err.to_string().contains("config.json"));
}

#[test]
fn malformed_config_returns_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, "{ \"MailHost\": ").expect("write");

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn config_missing_required_key_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "MailHost": "h", "MailPort": 25 }"#).expect("write");

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn unknown_encryption_is_only_rejected_when_asked() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, FULL.replace("SSL/TLS", "PLAIN")).expect("write");

    let cfg = Config::load_from(&path).expect("load succeeds; mode is checked at send time");
    let err = cfg.encryption().unwrap_err();
    assert!(err.to_string().contains("PLAIN"));
}
