//! # PDF Generation Module
//!
//! Generates PDF material reports from calculation records using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is an embedded string constant
//! - Record data is injected via string formatting before compilation
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::calculations::{assemble, Strictness, SystemClock};
//! use takeoff_core::elements::Element;
//! use takeoff_core::pdf::PdfReport;
//! use takeoff_core::project::Project;
//! use takeoff_core::report::{ReportHeader, ReportRenderer};
//!
//! let project = Project::new("Casa Verde", "Acme", "12 Harbor Rd");
//! let record = assemble(project.id, Element::brick_wall(3.0, 2.5, 0.15), Strictness::Strict, &SystemClock).unwrap();
//!
//! let pdf = PdfReport::new(3).with_header(ReportHeader::from(&project));
//! std::fs::write("wall.pdf", pdf.render(&record).unwrap()).unwrap();
//! ```

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use tracing::debug;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::CalculationRecord;
use crate::errors::{CalcError, CalcResult};
use crate::report::{record_label, relevant_dimensions, ReportHeader, ReportRenderer};

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed once
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data.to_vec())))
        .collect()
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Page setup and title block; `{{...}}` placeholders are substituted.
const PAGE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Takeoff Material Estimate]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[Record: {{RECORD_ID}}]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 11pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Material Estimate]
    #v(4pt)
    #text(size: 14pt)[{{ELEMENT_LABEL}}]
  ]
]

#v(12pt)
"##;

// ============================================================================
// PDF Rendering
// ============================================================================

/// One-page PDF report.
#[derive(Debug, Clone, Default)]
pub struct PdfReport {
    decimals: usize,
    header: Option<ReportHeader>,
}

impl PdfReport {
    /// `decimals` applies to every non-count quantity.
    pub fn new(decimals: usize) -> Self {
        PdfReport {
            decimals,
            header: None,
        }
    }

    pub fn with_header(mut self, header: ReportHeader) -> Self {
        self.header = Some(header);
        self
    }

    /// Build the Typst source for a record.
    pub fn typst_source(&self, record: &CalculationRecord) -> String {
        let d = self.decimals;
        let mut source = PAGE_TEMPLATE
            .replace("{{RECORD_ID}}", &escape_typst(&record_label(record)))
            .replace("{{DATE}}", &record.date.format("%Y-%m-%d %H:%M UTC").to_string())
            .replace("{{ELEMENT_LABEL}}", &escape_typst(record.element.element_type.label()));

        if let Some(header) = &self.header {
            let rows: Vec<String> = header
                .rows()
                .into_iter()
                .map(|(label, value)| format!("  [{}:], [{}],", label, escape_typst(value)))
                .collect();
            if !rows.is_empty() {
                source.push_str(&format!(
                    r##"
*Project Information*
#v(4pt)
#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
{rows}
)

#v(12pt)
"##,
                    rows = rows.join("\n"),
                ));
            }
        }

        let dimension_rows: Vec<String> = relevant_dimensions(record)
            .into_iter()
            .map(|(dim, value)| format!("  [{}], [{:.*}], [m],", capitalize(dim.name()), d, value))
            .collect();

        let material_rows: Vec<String> = record
            .materials
            .iter()
            .map(|m| {
                format!(
                    "  [{}], [{}], [{}],",
                    m.kind.name(),
                    m.format_amount(d),
                    escape_typst(m.unit.symbol())
                )
            })
            .collect();

        source.push_str(&format!(
            r##"
== Element Dimensions

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Dimension*], [*Value*], [*Unit*]),
{dimension_rows}
)

#v(8pt)

Characteristic volume: *{volume} m#super[3]*

#v(12pt)

== Materials

#table(
  columns: (1fr, auto, auto),
  inset: 8pt,
  stroke: 0.5pt,
  align: (left, right, left),
  table.header([*Material*], [*Quantity*], [*Unit*]),
{material_rows}
)

#v(24pt)
#line(length: 100%, stroke: 0.5pt)
#v(8pt)

#text(size: 9pt, fill: gray)[
  Generated by Takeoff. Quantities exclude waste allowances.
]
"##,
            dimension_rows = dimension_rows.join("\n"),
            volume = format!("{:.*}", d, record.computed_volume),
            material_rows = material_rows.join("\n"),
        ));

        source
    }
}

impl ReportRenderer for PdfReport {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, record: &CalculationRecord) -> CalcResult<Vec<u8>> {
        let world = PdfWorld::new(self.typst_source(record));
        let warned = typst::compile(&world);

        let document = warned.output.map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            CalcError::report("pdf", format!("Typst compilation failed: {}", error_msgs.join("; ")))
        })?;

        let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
            CalcError::report("pdf", format!("PDF rendering failed: {}", error_msgs.join("; ")))
        })?;

        debug!(bytes = pdf_bytes.len(), record = %record_label(record), "pdf rendered");
        Ok(pdf_bytes)
    }
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{assemble, FixedClock, Strictness};
    use crate::elements::Element;
    use crate::project::Project;
    use chrono::TimeZone;

    fn record_and_project() -> (CalculationRecord, Project) {
        let project = Project::new("Casa #1 [phase_2]", "Acme", "12 Harbor Rd");
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
        let record = assemble(
            project.id,
            Element::leveling_floor(4.0, 2.5, 0.04),
            Strictness::Strict,
            &clock,
        )
        .unwrap();
        (record, project)
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("Casa #1 [a_b]"), "Casa \\#1 \\[a\\_b\\]");
        assert_eq!(escape_typst("plain"), "plain");
    }

    #[test]
    fn test_typst_source_contents() {
        let (record, project) = record_and_project();
        let source = PdfReport::new(2)
            .with_header(ReportHeader::from(&project))
            .typst_source(&record);

        assert!(source.contains("Leveling (floors, horizontal)"));
        assert!(source.contains("Casa \\#1 \\[phase\\_2\\]"));
        assert!(source.contains("[Resin], [4.00], [L],"));
        assert!(source.contains("[Thickness], [0.04], [m],"));
        assert!(!source.contains("{{"));
    }

    #[test]
    fn test_pdf_generation() {
        let (record, project) = record_and_project();
        let report = PdfReport::new(3).with_header(ReportHeader::from(&project));
        assert_eq!(report.format(), "pdf");
        let pdf = report.render(&record);

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());

        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }
}
