use std::fmt;

use thiserror::Error;

use backup_helper_mailer::MailError;
use backup_helper_runner::CommandFailure;

use crate::folder_check::FolderCheckError;

/// Which side of the mirror a step concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderRole {
    Source,
    Destination,
}

impl FolderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderRole::Source => "source",
            FolderRole::Destination => "destination",
        }
    }
}

impl fmt::Display for FolderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One or both verification runs failed.
#[derive(Debug)]
pub struct VerificationFailures(pub Vec<(FolderRole, CommandFailure)>);

impl fmt::Display for VerificationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (role, failure)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "verification of {role} folder failed: {failure}")?;
        }
        Ok(())
    }
}

/// Error surface of a backup run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{role} folder: {source}")]
    FolderCheck {
        role: FolderRole,
        #[source]
        source: FolderCheckError,
    },

    #[error("{0}")]
    Verification(VerificationFailures),

    #[error("sync failed: {0}")]
    Sync(#[source] CommandFailure),

    #[error("backup run panicked: {0}")]
    Panicked(String),

    #[error("report not sent: {0}")]
    Notification(#[from] MailError),

    /// The run failed and the report about it could not be sent either.
    #[error("{workflow}\nreport not sent: {notification}")]
    Joined {
        workflow: Box<WorkflowError>,
        notification: MailError,
    },
}

impl WorkflowError {
    /// Combine the run result with the result of sending its report.
    pub fn join(workflow: Result<(), WorkflowError>, sent: Result<(), MailError>) -> Result<(), WorkflowError> {
        match (workflow, sent) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) => Err(err),
            (Ok(()), Err(notification)) => Err(WorkflowError::Notification(notification)),
            (Err(err), Err(notification)) => Err(WorkflowError::Joined {
                workflow: Box::new(err),
                notification,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backup_helper_core::ConfigError;

    fn mail_err() -> MailError {
        MailError::Encryption(ConfigError::UnknownEncryption("NONE".into()))
    }

    #[test]
    fn join_keeps_both_errors() {
        let joined = WorkflowError::join(Err(WorkflowError::Panicked("boom".into())), Err(mail_err()))
            .unwrap_err();
        let text = joined.to_string();
        assert!(text.contains("boom"), "got: {text}");
        assert!(text.contains("NONE"), "got: {text}");
        assert!(matches!(joined, WorkflowError::Joined { .. }));
    }

    #[test]
    fn join_of_notification_only_failure_is_still_an_error() {
        let err = WorkflowError::join(Ok(()), Err(mail_err())).unwrap_err();
        assert!(matches!(err, WorkflowError::Notification(_)));
    }

    #[test]
    fn join_of_two_successes_is_ok() {
        assert!(WorkflowError::join(Ok(()), Ok(())).is_ok());
    }
}
