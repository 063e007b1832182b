//! `config.json`: mail settings plus the external tool invocations.
//!
//! Keys are PascalCase (`MailHost`, `MailPort`, ...). `Tools` and
//! `CommandTimeoutSecs` are optional and fall back to `cshatag` / `rsync`
//! with no deadline.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Run configuration, loaded once at startup and passed down explicitly.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    pub mail_host: String,
    pub mail_port: u16,
    pub mail_user: String,
    pub mail_pass: String,
    /// Either `SSL/TLS` or `STARTTLS`; validated at send time.
    pub mail_encryption: String,
    pub from_mail: String,
    pub to_mail: String,

    #[serde(default)]
    pub tools: ToolConfig,

    /// Deadline applied to every external command. `None` waits forever.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("mail_host", &self.mail_host)
            .field("mail_port", &self.mail_port)
            .field("mail_user", &self.mail_user)
            .field("mail_pass", &"<redacted>")
            .field("mail_encryption", &self.mail_encryption)
            .field("from_mail", &self.from_mail)
            .field("to_mail", &self.to_mail)
            .field("tools", &self.tools)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load `config.json` from the current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Load and parse a config file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let shown = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: shown,
            source,
        })
    }

    /// Parse [`Config::mail_encryption`].
    pub fn encryption(&self) -> Result<MailEncryption, ConfigError> {
        self.mail_encryption.parse()
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Programs and leading arguments for the verification and sync steps.
///
/// The folder paths are appended by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ToolConfig {
    pub verify_program: String,
    pub verify_args: Vec<String>,
    pub sync_program: String,
    pub sync_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            verify_program: "cshatag".to_string(),
            verify_args: vec!["-recursive".to_string()],
            sync_program: "rsync".to_string(),
            sync_args: vec![
                "--archive".to_string(),
                "--delete".to_string(),
                "--itemize-changes".to_string(),
            ],
        }
    }
}

/// SMTP transport security.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailEncryption {
    /// Implicit TLS from the first byte (usually port 465).
    SslTls,
    /// Plain connection upgraded with `STARTTLS` (usually port 587).
    StartTls,
}

impl FromStr for MailEncryption {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SSL/TLS" => Ok(MailEncryption::SslTls),
            "STARTTLS" => Ok(MailEncryption::StartTls),
            other => Err(ConfigError::UnknownEncryption(other.to_string())),
        }
    }
}

impl fmt::Display for MailEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailEncryption::SslTls => f.write_str("SSL/TLS"),
            MailEncryption::StartTls => f.write_str("STARTTLS"),
        }
    }
}
