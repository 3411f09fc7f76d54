use crate::error::Result;
use crate::geometry::PageGeometry;
use crate::layout::Page;
use crate::writer::{DocumentSink, ExportOptions};
use std::io::Write;
use tracing::debug;

/// Writes laid out pages as a printable HTML file: one fixed-size section per
/// page, fragments absolutely positioned at their layout coordinates.
pub struct HtmlSink<W: Write> {
    writer: W,
    options: ExportOptions,
}

impl<W: Write> HtmlSink<W> {
    pub fn new(writer: W, options: ExportOptions) -> Self {
        Self { writer, options }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DocumentSink for HtmlSink<W> {
    fn write_pages(&mut self, pages: &[Page], geometry: &PageGeometry) -> Result<()> {
        geometry.validate()?;

        let title = self.options.title.as_deref().unwrap_or("storyprint");
        let width = geometry.page_width();
        let height = geometry.page_height();

        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html>\n<head>\n<meta charset=\"utf-8\">")?;
        writeln!(self.writer, "<title>{}</title>", escape_html(title))?;
        writeln!(self.writer, "<style>")?;
        writeln!(self.writer, "@page {{ size: {width:.2}pt {height:.2}pt; margin: 0; }}")?;
        writeln!(
            self.writer,
            ".page {{ position: relative; width: {width:.2}pt; height: {height:.2}pt; \
             overflow: hidden; page-break-after: always; font-family: {}; font-size: {}pt; }}",
            self.options.font.css_family(),
            self.options.font_size
        )?;
        writeln!(self.writer, ".page span {{ position: absolute; white-space: pre; }}")?;
        writeln!(self.writer, "</style>\n</head>\n<body>")?;

        for page in pages {
            writeln!(
                self.writer,
                "<section class=\"page\" data-page=\"{}\">",
                page.index() + 1
            )?;
            for fragment in page.fragments() {
                // sink coordinates grow upwards, CSS grows downwards
                writeln!(
                    self.writer,
                    "<span style=\"left: {:.2}pt; top: {:.2}pt;\">{}</span>",
                    fragment.x,
                    height - fragment.y - self.options.font_size,
                    escape_html(&fragment.text)
                )?;
            }
            writeln!(self.writer, "</section>")?;
        }

        writeln!(self.writer, "</body>\n</html>")?;
        self.writer.flush()?;

        debug!(pages = pages.len(), "wrote HTML document");
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
