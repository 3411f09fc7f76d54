//! Document sinks drawing laid out pages
//!
//! A sink receives the pages produced by [`paginate`](crate::paginate) and the
//! geometry they were laid out with, and is responsible for drawing every
//! fragment at its position while honoring page boundaries.

mod encoding;
mod html;
pub mod objects;
mod pdf;

pub use encoding::encode_win_ansi;
pub use html::HtmlSink;
pub use pdf::PdfSink;

use crate::error::{PrintError, Result};
use crate::geometry::PageGeometry;
use crate::layout::{paginate_with, Document, Page, WrapMode};
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Something that can draw a sequence of laid out pages
pub trait DocumentSink {
    fn write_pages(&mut self, pages: &[Page], geometry: &PageGeometry) -> Result<()>;
}

/// Standard Type 1 fonts available without embedding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StandardFont {
    #[default]
    Helvetica,
    TimesRoman,
    Courier,
}

impl StandardFont {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
        }
    }

    pub fn css_family(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica, Arial, sans-serif",
            StandardFont::TimesRoman => "'Times New Roman', Times, serif",
            StandardFont::Courier => "'Courier New', Courier, monospace",
        }
    }
}

/// Output formats supported by [`export`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExportFormat {
    #[default]
    Pdf,
    Html,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Html => "text/html; charset=utf-8",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Html => "html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "html" => Ok(ExportFormat::Html),
            other => Err(PrintError::InvalidConfig(format!(
                "unknown export format '{other}', expected pdf or html"
            ))),
        }
    }
}

/// Presentation options shared by the sinks
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    pub font: StandardFont,
    /// Font size in points
    pub font_size: f64,
    /// Flate-compress PDF content streams (needs the `compression` feature)
    pub compress: bool,
    /// How over-long lines are broken
    pub wrap_mode: WrapMode,
    /// Creation date recorded in the PDF info dictionary; now when unset
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            font: StandardFont::Helvetica,
            font_size: 12.0,
            compress: cfg!(feature = "compression"),
            wrap_mode: WrapMode::Naive,
            creation_date: None,
        }
    }
}

impl ExportOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Paginate `text` and render it in the requested format into memory
pub fn export(
    text: &str,
    geometry: &PageGeometry,
    format: ExportFormat,
    options: ExportOptions,
) -> Result<Vec<u8>> {
    if !options.font_size.is_finite() || options.font_size <= 0.0 {
        return Err(PrintError::InvalidConfig(format!(
            "font size must be a positive number, got {}",
            options.font_size
        )));
    }

    let pages = paginate_with(&Document::from_text(text), geometry, options.wrap_mode)?;
    match format {
        ExportFormat::Pdf => {
            let mut sink = PdfSink::new_with_writer(Vec::new(), options);
            sink.write_pages(&pages, geometry)?;
            Ok(sink.into_inner())
        }
        ExportFormat::Html => {
            let mut sink = HtmlSink::new(Vec::new(), options);
            sink.write_pages(&pages, geometry)?;
            Ok(sink.into_inner())
        }
    }
}

/// Paginate `text` and render it as a PDF into memory
pub fn export_pdf(text: &str, geometry: &PageGeometry, options: ExportOptions) -> Result<Vec<u8>> {
    export(text, geometry, ExportFormat::Pdf, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("html".parse::<ExportFormat>().unwrap(), ExportFormat::Html);
        assert!(matches!(
            "docx".parse::<ExportFormat>(),
            Err(PrintError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_export_pdf() {
        let bytes = export_pdf("Hello", &PageGeometry::default(), ExportOptions::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn test_export_rejects_invalid_geometry() {
        let geometry = PageGeometry::default().with_max_chars_per_line(0);
        let result = export("Hello", &geometry, ExportFormat::Html, ExportOptions::default());
        assert!(matches!(result, Err(PrintError::InvalidGeometry(_))));
    }

    #[test]
    fn test_export_rejects_bad_font_size() {
        let options = ExportOptions {
            font_size: 0.0,
            ..ExportOptions::default()
        };
        let result = export_pdf("Hello", &PageGeometry::default(), options);
        assert!(matches!(result, Err(PrintError::InvalidConfig(_))));
    }

    #[test]
    fn test_font_names() {
        assert_eq!(StandardFont::Helvetica.pdf_name(), "Helvetica");
        assert_eq!(StandardFont::TimesRoman.pdf_name(), "Times-Roman");
        assert_eq!(StandardFont::Courier.pdf_name(), "Courier");
    }
}
