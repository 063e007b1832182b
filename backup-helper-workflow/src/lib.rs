//! # backup-helper-workflow
//!
//! The end-to-end backup run: probe both folders, verify both concurrently,
//! mirror source into destination, and always finish by mailing a report.

mod error;
pub mod folder_check;
pub mod orchestrator;

pub use error::{FolderRole, VerificationFailures, WorkflowError};
pub use folder_check::{check_folder, FolderCheckError};
pub use orchestrator::{BackupJob, Orchestrator};
