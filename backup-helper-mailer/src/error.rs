//! Error types for backup-helper-mailer.

use thiserror::Error;

use backup_helper_core::ConfigError;
use backup_helper_renderer::RenderError;

/// All errors that can arise while building or sending the report mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// The configured transport security mode is not recognised.
    #[error("mail config error: {0}")]
    Encryption(#[from] ConfigError),

    #[error("could not template report: {0}")]
    Render(#[from] RenderError),

    /// A sender or recipient address failed to parse.
    #[error("invalid mail address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("could not build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// Connecting, authenticating or sending failed.
    #[error("could not send email via {host}:{port}: {source}")]
    Transport {
        host: String,
        port: u16,
        #[source]
        source: lettre::transport::smtp::Error,
    },
}
