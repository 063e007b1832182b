//! Error types for backup-helper-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or interpreting `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read (missing, permission denied, etc.).
    #[error("could not read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file was read but is not valid JSON for [`crate::Config`].
    #[error("could not parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `MailEncryption` is neither `SSL/TLS` nor `STARTTLS`.
    #[error("unknown encryption in config: {0:?} (expected \"SSL/TLS\" or \"STARTTLS\")")]
    UnknownEncryption(String),
}
