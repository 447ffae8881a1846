//! # Reports
//!
//! Human-readable renderings of a [`CalculationRecord`]. Renderers consume
//! the record as is; nothing here recomputes quantities.
//!
//! - [`TextReport`] - plain UTF-8 text, for terminals and logs
//! - [`PdfReport`](crate::pdf::PdfReport) - one-page PDF via Typst
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{assemble, Strictness, SystemClock};
//! use takeoff_core::elements::Element;
//! use takeoff_core::project::Project;
//! use takeoff_core::report::{ReportHeader, ReportRenderer, TextReport};
//!
//! let project = Project::new("Casa Verde", "Acme", "12 Harbor Rd");
//! let record = assemble(project.id, Element::square_column(3.0, 0.3), Strictness::Strict, &SystemClock).unwrap();
//!
//! let report = TextReport::new(3).with_header(ReportHeader::from(&project));
//! let text = String::from_utf8(report.render(&record).unwrap()).unwrap();
//! assert!(text.contains("Cement"));
//! assert!(text.contains("12 Harbor Rd"));
//! ```

use crate::calculations::CalculationRecord;
use crate::elements::Dimension;
use crate::errors::CalcResult;
use crate::project::Project;

/// Renders a calculation record to bytes in some document format.
pub trait ReportRenderer {
    /// Short format name ("text", "pdf")
    fn format(&self) -> &'static str;

    /// Render one record
    fn render(&self, record: &CalculationRecord) -> CalcResult<Vec<u8>>;
}

/// Project details printed at the top of a report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportHeader {
    pub project_name: String,
    pub client: String,
    pub address: String,
    pub engineer: String,
}

impl From<&Project> for ReportHeader {
    fn from(project: &Project) -> Self {
        ReportHeader {
            project_name: project.meta.name.clone(),
            client: project.meta.client.clone(),
            address: project.meta.address.clone(),
            engineer: project.meta.engineer.clone(),
        }
    }
}

impl ReportHeader {
    /// Non-empty (label, value) pairs in print order
    pub(crate) fn rows(&self) -> Vec<(&'static str, &str)> {
        [
            ("Project", self.project_name.as_str()),
            ("Client", self.client.as_str()),
            ("Address", self.address.as_str()),
            ("Engineer", self.engineer.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect()
    }
}

/// The dimensions that drive the element's formulas, with their values.
pub(crate) fn relevant_dimensions(record: &CalculationRecord) -> Vec<(Dimension, f64)> {
    let required = record.element.element_type.required_dimensions();
    record
        .element
        .dimensions()
        .filter(|(d, _)| required.contains(d))
        .collect()
}

/// Record id as printed on reports.
pub(crate) fn record_label(record: &CalculationRecord) -> String {
    record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(unsaved)".to_string())
}

/// Plain-text report.
#[derive(Debug, Clone, Default)]
pub struct TextReport {
    decimals: usize,
    header: Option<ReportHeader>,
}

impl TextReport {
    /// `decimals` applies to every non-count quantity.
    pub fn new(decimals: usize) -> Self {
        TextReport {
            decimals,
            header: None,
        }
    }

    pub fn with_header(mut self, header: ReportHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Render to a string.
    pub fn render_string(&self, record: &CalculationRecord) -> String {
        let d = self.decimals;
        let title = "MATERIAL ESTIMATE";
        let mut lines = vec![title.to_string(), "=".repeat(title.len())];

        if let Some(header) = &self.header {
            for (label, value) in header.rows() {
                lines.push(format!("{:<10} {}", format!("{}:", label), value));
            }
        }
        lines.push(format!("{:<10} {}", "Date:", record.date.format("%Y-%m-%d %H:%M UTC")));
        lines.push(format!("{:<10} {}", "Record:", record_label(record)));
        lines.push(String::new());

        lines.push(format!("{:<10} {}", "Element:", record.element.element_type));
        for (dim, value) in relevant_dimensions(record) {
            lines.push(format!("  {:<10} {:>12.*} m", dim.name(), d, value));
        }
        lines.push(format!("{:<10} {:.*} m³", "Volume:", d, record.computed_volume));
        lines.push(String::new());

        lines.push("Materials".to_string());
        lines.push("---------".to_string());
        for m in &record.materials {
            lines.push(format!("  {:<10} {:>12} {}", m.kind.name(), m.format_amount(d), m.unit));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

impl ReportRenderer for TextReport {
    fn format(&self) -> &'static str {
        "text"
    }

    fn render(&self, record: &CalculationRecord) -> CalcResult<Vec<u8>> {
        Ok(self.render_string(record).into_bytes())
    }
}
