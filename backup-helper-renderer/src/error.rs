//! Error types for backup-helper-renderer.

use thiserror::Error;

/// Failure to turn a report into its HTML body.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The embedded report template failed to load, or the report could
    /// not be serialized into it.
    #[error("cannot render report email: {0}")]
    Template(#[from] tera::Error),
}
