//! backup-helper core library: report model, configuration, errors.
//!
//! - [`report`]: [`Section`], [`ReportDraft`] and the finished [`Report`]
//! - [`config`]: `config.json` loading and mail transport settings
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod report;

pub use config::{Config, MailEncryption, ToolConfig, CONFIG_FILE_NAME};
pub use error::ConfigError;
pub use report::{Report, ReportDraft, Section};
