//! Report model.
//!
//! A run accumulates [`Section`]s into a [`ReportDraft`]. The draft has no
//! title; [`ReportDraft::finish`] sets it exactly once and yields a [`Report`]
//! that can no longer be changed.

use serde::Serialize;

/// One discrete step of a run: a folder check, a tool invocation, the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub detail: Option<String>,
    /// Captured output lines; empty when the step produced none.
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Section {
            title: title.into(),
            detail: None,
            lines: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = (!detail.is_empty()).then_some(detail);
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }
}

/// Report under construction. Sections are append-only.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    detail: String,
    sections: Vec<Section>,
}

impl ReportDraft {
    pub fn new(detail: impl Into<String>) -> Self {
        ReportDraft {
            detail: detail.into(),
            sections: Vec::new(),
        }
    }

    pub fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Seal the draft with its title.
    pub fn finish(self, title: impl Into<String>) -> Report {
        Report {
            title: title.into(),
            detail: self.detail,
            sections: self.sections,
        }
    }
}

/// Finished, read-only report handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    title: String,
    detail: String,
    sections: Vec<Section>,
}

impl Report {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
