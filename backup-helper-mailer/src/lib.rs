//! # backup-helper-mailer
//!
//! Delivery of the finished report. [`Notifier`] is the seam the workflow
//! talks to; [`SmtpNotifier`] renders the report to HTML and sends it over
//! SMTP with the configured transport security.

pub mod error;
pub mod smtp;

pub use error::MailError;
pub use smtp::{MailSettings, SmtpNotifier};

use std::future::Future;

use backup_helper_core::Report;

/// Something that can deliver a finished report.
pub trait Notifier {
    fn deliver(&self, report: &Report) -> impl Future<Output = Result<(), MailError>> + Send;
}

impl<N: Notifier + Sync + ?Sized> Notifier for &N {
    async fn deliver(&self, report: &Report) -> Result<(), MailError> {
        (**self).deliver(report).await
    }
}
