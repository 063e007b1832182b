//! SMTP delivery of the rendered report.
//!
//! `SSL/TLS` connects with implicit TLS, `STARTTLS` upgrades a plain
//! connection. The mode is parsed when sending; an unknown value fails before
//! any connection is attempted. Nothing is retried.

use chrono::{DateTime, Local, SecondsFormat};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use backup_helper_core::{Config, MailEncryption, Report};
use backup_helper_renderer::ReportRenderer;

use crate::error::MailError;
use crate::Notifier;

/// Display name used in the `From:` header.
pub const SENDER_NAME: &str = "backup-helper";

/// The mail-related slice of [`Config`].
#[derive(Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub encryption: String,
    pub from: String,
    pub to: String,
}

impl MailSettings {
    pub fn from_config(config: &Config) -> Self {
        MailSettings {
            host: config.mail_host.clone(),
            port: config.mail_port,
            user: config.mail_user.clone(),
            pass: config.mail_pass.clone(),
            encryption: config.mail_encryption.clone(),
            from: config.from_mail.clone(),
            to: config.to_mail.clone(),
        }
    }
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("encryption", &self.encryption)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

/// Sends each report as one HTML email.
pub struct SmtpNotifier {
    settings: MailSettings,
    renderer: ReportRenderer,
}

impl SmtpNotifier {
    pub fn new(settings: MailSettings) -> Result<Self, MailError> {
        Ok(SmtpNotifier {
            settings,
            renderer: ReportRenderer::new()?,
        })
    }

    /// Build the message for `report` as of `now`.
    pub fn build_message(&self, report: &Report, now: DateTime<Local>) -> Result<Message, MailError> {
        let body = self.renderer.render(report, now)?;
        let from = mailbox(&format!("{SENDER_NAME} <{}>", self.settings.from))?;
        let to = mailbox(&self.settings.to)?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject(report, now))
            .header(ContentType::TEXT_HTML)
            .body(body)?;
        Ok(message)
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let s = &self.settings;
        let encryption: MailEncryption = s.encryption.parse()?;
        let builder = match encryption {
            MailEncryption::SslTls => AsyncSmtpTransport::<Tokio1Executor>::relay(&s.host),
            MailEncryption::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&s.host),
        }
        .map_err(|source| self.transport_err(source))?;

        Ok(builder
            .port(s.port)
            .credentials(Credentials::new(s.user.clone(), s.pass.clone()))
            .build())
    }

    fn transport_err(&self, source: lettre::transport::smtp::Error) -> MailError {
        MailError::Transport {
            host: self.settings.host.clone(),
            port: self.settings.port,
            source,
        }
    }
}

impl Notifier for SmtpNotifier {
    async fn deliver(&self, report: &Report) -> Result<(), MailError> {
        let transport = self.transport()?;
        let message = self.build_message(report, Local::now())?;

        tracing::debug!(host = %self.settings.host, port = self.settings.port, to = %self.settings.to, "sending report");
        transport
            .send(message)
            .await
            .map_err(|source| self.transport_err(source))?;
        tracing::info!(to = %self.settings.to, title = %report.title(), "report sent");
        Ok(())
    }
}

fn mailbox(raw: &str) -> Result<Mailbox, MailError> {
    raw.parse().map_err(|source| MailError::Address {
        address: raw.to_string(),
        source,
    })
}

/// `backup-helper: <title> (<RFC3339 timestamp>)`.
pub fn subject(report: &Report, now: DateTime<Local>) -> String {
    format!(
        "{SENDER_NAME}: {} ({})",
        report.title(),
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}
