//! Template context: the serializable rendering payload built from a [`Report`].

use chrono::{DateTime, Local};
use serde::Serialize;

use backup_helper_core::Report;

use crate::error::RenderError;

/// Everything the report template can see.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    pub title: String,
    pub detail: String,
    pub sections: Vec<SectionCtx>,
    pub section_count: usize,
    /// Formatted `YYYY-MM-DD HH:MM:SS ±ZZ:ZZ`.
    pub generated_at: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionCtx {
    pub title: String,
    pub detail: Option<String>,
    pub lines: Vec<String>,
}

impl ReportContext {
    pub fn from_report(report: &Report, generated_at: DateTime<Local>) -> Self {
        let sections: Vec<SectionCtx> = report
            .sections()
            .iter()
            .map(|s| SectionCtx {
                title: s.title.clone(),
                detail: s.detail.clone(),
                lines: s.lines.clone(),
            })
            .collect();

        ReportContext {
            title: report.title().to_string(),
            detail: report.detail().to_string(),
            section_count: sections.len(),
            sections,
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}
