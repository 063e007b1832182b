//! # backup-helper-renderer
//!
//! Tera-based rendering of a finished [`Report`](backup_helper_core::Report)
//! into the HTML body of the notification email.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use backup_helper_core::{ReportDraft, Section};
//! use backup_helper_renderer::ReportRenderer;
//!
//! let mut draft = ReportDraft::new("Mirror of /data into /mnt/backup");
//! draft.push_section(Section::new("Outcome").with_detail("Backup completed successfully."));
//! let report = draft.finish("Backup succeeded");
//!
//! if let Ok(renderer) = ReportRenderer::new() {
//!     let html = renderer.render(&report, chrono::Local::now()).unwrap();
//!     println!("{} bytes", html.len());
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::ReportContext;
pub use engine::ReportRenderer;
pub use error::RenderError;
