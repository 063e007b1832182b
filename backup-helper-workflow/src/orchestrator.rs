//! The backup run.
//!
//! ```text
//! check(source) → check(destination) → verify(source) ∥ verify(destination) → sync
//!                                                                             ↓
//!                         finalize: outcome section, title, notify  ←  (always)
//! ```
//!
//! Every step before finalize is fail-fast. Sections are appended only here,
//! on the orchestrating task, so their order is fixed no matter which
//! verification finishes first.

use std::ffi::OsString;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use futures::FutureExt;

use backup_helper_core::{ReportDraft, Section, ToolConfig};
use backup_helper_mailer::Notifier;
use backup_helper_runner::{run_command, CommandFailure, CommandSpec, LiveLog};

use crate::error::{FolderRole, VerificationFailures, WorkflowError};
use crate::folder_check::check_folder;

pub const TITLE_SUCCESS: &str = "Backup succeeded";
pub const TITLE_FAILURE: &str = "Backup FAILED";
pub const OUTCOME_SECTION: &str = "Outcome";
pub const SUCCESS_BANNER: &str = "Backup completed successfully.";

/// The two folders of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupJob {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl BackupJob {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        BackupJob {
            source: source.into(),
            destination: destination.into(),
        }
    }

    fn folder(&self, role: FolderRole) -> &Path {
        match role {
            FolderRole::Source => &self.source,
            FolderRole::Destination => &self.destination,
        }
    }
}

/// Drives a [`BackupJob`] and reports it through `N`.
pub struct Orchestrator<N> {
    live: LiveLog,
    tools: ToolConfig,
    notifier: N,
    command_timeout: Option<Duration>,
}

impl<N: Notifier> Orchestrator<N> {
    pub fn new(live: LiveLog, tools: ToolConfig, notifier: N) -> Self {
        Orchestrator {
            live,
            tools,
            notifier,
            command_timeout: None,
        }
    }

    pub fn with_command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Run the whole backup and send its report.
    ///
    /// The report is sent whether the steps succeed, fail, or panic. The
    /// returned error combines the run's failure with any delivery failure.
    pub async fn run(&self, job: &BackupJob) -> Result<(), WorkflowError> {
        let started = Local::now();
        let mut draft = ReportDraft::new(format!(
            "Mirror of {} into {}, started {}.",
            job.source.display(),
            job.destination.display(),
            started.format("%Y-%m-%d %H:%M:%S"),
        ));

        let outcome = AssertUnwindSafe(self.steps(job, &mut draft))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(WorkflowError::Panicked(panic_message(panic.as_ref()))));

        self.finalize(draft, outcome).await
    }

    async fn steps(&self, job: &BackupJob, draft: &mut ReportDraft) -> Result<(), WorkflowError> {
        for role in [FolderRole::Source, FolderRole::Destination] {
            check_folder(job.folder(role)).map_err(|source| WorkflowError::FolderCheck { role, source })?;
        }
        draft.push_section(Section::new("Folder checks").with_detail(format!(
            "Source {} is OK. Destination {} is OK.",
            job.source.display(),
            job.destination.display(),
        )));

        tracing::debug!("running verification on source and destination (in parallel)");
        let source_spec = self.verify_spec(job, FolderRole::Source);
        let destination_spec = self.verify_spec(job, FolderRole::Destination);
        let (source_result, destination_result) = tokio::join!(
            run_command(&self.live, &source_spec),
            run_command(&self.live, &destination_spec),
        );

        let mut failures = Vec::new();
        for (role, result) in [
            (FolderRole::Source, source_result),
            (FolderRole::Destination, destination_result),
        ] {
            let title = format!("Verification of {role} ({})", job.folder(role).display());
            let (section, failure) = command_section(title, result);
            tracing::info!(role = %role, dir = %job.folder(role).display(), lines = section.lines.len(), ok = failure.is_none(), "verification finished");
            draft.push_section(section);
            if let Some(failure) = failure {
                failures.push((role, failure));
            }
        }
        if !failures.is_empty() {
            return Err(WorkflowError::Verification(VerificationFailures(failures)));
        }

        let sync_spec = self.sync_spec(job);
        let (section, failure) = command_section(
            format!("Sync {} → {}", job.source.display(), job.destination.display()),
            run_command(&self.live, &sync_spec).await,
        );
        tracing::info!(lines = section.lines.len(), ok = failure.is_none(), "sync finished");
        draft.push_section(section);
        match failure {
            Some(failure) => Err(WorkflowError::Sync(failure)),
            None => Ok(()),
        }
    }

    async fn finalize(&self, mut draft: ReportDraft, outcome: Result<(), WorkflowError>) -> Result<(), WorkflowError> {
        let (title, detail) = match &outcome {
            Ok(()) => (TITLE_SUCCESS, SUCCESS_BANNER.to_string()),
            Err(err) => {
                tracing::error!(error = %err, "backup failed");
                (TITLE_FAILURE, err.to_string())
            }
        };
        draft.push_section(Section::new(OUTCOME_SECTION).with_detail(detail));
        let report = draft.finish(title);

        let sent = self.notifier.deliver(&report).await;
        if let Err(err) = &sent {
            tracing::error!(error = %err, "could not send report");
        }
        WorkflowError::join(outcome, sent)
    }

    fn verify_spec(&self, job: &BackupJob, role: FolderRole) -> CommandSpec {
        CommandSpec::new(format!("verify:{role}"), &self.tools.verify_program)
            .args(&self.tools.verify_args)
            .arg(job.folder(role))
            .timeout(self.command_timeout)
    }

    fn sync_spec(&self, job: &BackupJob) -> CommandSpec {
        CommandSpec::new("sync", &self.tools.sync_program)
            .args(&self.tools.sync_args)
            .arg(contents_of(&job.source))
            .arg(&job.destination)
            .timeout(self.command_timeout)
    }
}

/// Source argument with a trailing separator so the sync tool copies the
/// folder's contents rather than the folder itself.
fn contents_of(dir: &Path) -> OsString {
    let mut arg = dir.as_os_str().to_os_string();
    if !arg.to_string_lossy().ends_with(std::path::MAIN_SEPARATOR) {
        arg.push(std::path::MAIN_SEPARATOR_STR);
    }
    arg
}

/// Turn a command result into its report section, splitting off the failure.
fn command_section(
    title: String,
    result: Result<Vec<String>, CommandFailure>,
) -> (Section, Option<CommandFailure>) {
    match result {
        Ok(lines) => (Section::new(title).with_detail("OK").with_lines(lines), None),
        Err(mut failure) => {
            let lines = std::mem::take(&mut failure.lines);
            let section = Section::new(title)
                .with_detail(format!("FAILED: {failure}"))
                .with_lines(lines);
            (section, Some(failure))
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
