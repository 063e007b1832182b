//! Tera rendering engine for the report email.
//!
//! The template is embedded at compile time and registered as `report.html`;
//! the `.html` suffix turns on Tera's autoescaping, so captured tool output
//! such as `<dir>` or `&` arrives in the mail as text, never as markup.

use chrono::{DateTime, Local};
use tera::Tera;

use backup_helper_core::Report;

use crate::context::ReportContext;
use crate::error::RenderError;

const REPORT_TEMPLATE: &str = "report.html";

const TPLS: &[(&str, &str)] = &[(REPORT_TEMPLATE, include_str!("templates/report.html.tera"))];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.iter().copied())?;
    Ok(tera)
}

/// Renders finished reports to HTML. Create once and reuse.
pub struct ReportRenderer {
    tera: Tera,
}

impl ReportRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(ReportRenderer { tera: build_tera()? })
    }

    /// Render `report` as a complete HTML document.
    pub fn render(&self, report: &Report, generated_at: DateTime<Local>) -> Result<String, RenderError> {
        let tera_ctx = ReportContext::from_report(report, generated_at).to_tera_context()?;
        Ok(self.tera.render(REPORT_TEMPLATE, &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use backup_helper_core::{ReportDraft, Section};

    fn render(report: &Report) -> String {
        ReportRenderer::new()
            .expect("ReportRenderer::new")
            .render(report, Local::now())
            .expect("render")
    }

    #[test]
    fn renderer_new_succeeds() {
        ReportRenderer::new().expect("ReportRenderer::new should not fail");
    }

    #[test]
    fn title_detail_and_sections_render_in_order() {
        let mut draft = ReportDraft::new("Nightly mirror");
        draft.push_section(Section::new("Folder checks").with_detail("both OK"));
        draft.push_section(Section::new("Outcome").with_detail("Backup completed successfully."));
        let html = render(&draft.finish("Backup succeeded"));

        assert!(html.contains("<h2>Backup succeeded</h2>"));
        assert!(html.contains("<p>Nightly mirror</p>"));
        let checks = html.find("<h3>Folder checks</h3>").expect("first section");
        let outcome = html.find("<h3>Outcome</h3>").expect("second section");
        assert!(checks < outcome, "sections must keep report order");
        assert!(html.contains("2 step(s)"));
    }

    #[test]
    fn optional_blocks_are_omitted_when_empty() {
        let mut draft = ReportDraft::new("");
        draft.push_section(Section::new("Bare step"));
        let html = render(&draft.finish("t"));

        assert!(html.contains("<h3>Bare step</h3>"));
        assert!(!html.contains("<pre"), "no log block without lines");
        assert!(!html.contains("<p></p>"), "no empty paragraphs");
    }

    #[test]
    fn log_lines_render_inside_pre_block() {
        let mut draft = ReportDraft::new("");
        draft.push_section(
            Section::new("Sync").with_lines(vec!["first line".into(), "second line".into()]),
        );
        let html = render(&draft.finish("t"));

        let pre = html.find("<pre").expect("log block");
        let first = html.find("first line").expect("first");
        let second = html.find("second line").expect("second");
        let end = html.find("</pre>").expect("end of block");
        assert!(pre < first && first < second && second < end);
    }

    #[test]
    fn subprocess_output_is_escaped() {
        let mut draft = ReportDraft::new("");
        draft.push_section(
            Section::new("Verify <source>")
                .with_lines(vec!["<script>alert(1)</script> & \"quoted\"".into()]),
        );
        let html = render(&draft.finish("t"));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
        assert!(html.contains("Verify &lt;source&gt;"));
    }

    #[test]
    fn no_crlf_in_rendered_output() {
        let html = render(&ReportDraft::new("x").finish("y"));
        assert!(!html.contains('\r'));
    }
}
