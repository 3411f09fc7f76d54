use crate::error::Result;
use crate::geometry::PageGeometry;
use crate::layout::Page;
use crate::writer::encoding::{encode_win_ansi, escape_literal};
use crate::writer::objects::{name, Dictionary, Object, ObjectId, Stream};
use crate::writer::{DocumentSink, ExportOptions};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

const CATALOG_ID: u32 = 1;
const PAGE_TREE_ID: u32 = 2;
const FONT_ID: u32 = 3;
const INFO_ID: u32 = 4;
const FIRST_PAGE_ID: u32 = 5;

/// Writes laid out pages as a PDF 1.7 file using a standard Type 1 font.
///
/// A sink holds one document; xref offsets count from the first byte it
/// wrote, so a second `write_pages` call is rejected.
pub struct PdfSink<W: Write> {
    writer: W,
    options: ExportOptions,
    xref_positions: BTreeMap<ObjectId, u64>,
    current_position: u64,
}

impl<W: Write> PdfSink<W> {
    pub fn new_with_writer(writer: W, options: ExportOptions) -> Self {
        Self {
            writer,
            options,
            xref_positions: BTreeMap::new(),
            current_position: 0,
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self) -> Result<()> {
        let mut catalog = Dictionary::new();
        catalog.set("Type", name("Catalog"));
        catalog.set("Pages", ObjectId::new(PAGE_TREE_ID, 0));

        self.write_object(ObjectId::new(CATALOG_ID, 0), catalog.into())
    }

    fn write_page_tree(&mut self, page_count: usize) -> Result<()> {
        let kids: Vec<Object> = (0..page_count)
            .map(|i| Object::Reference(page_object_id(i)))
            .collect();

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", name("Pages"));
        pages_dict.set("Kids", kids);
        pages_dict.set("Count", page_count as i64);

        self.write_object(ObjectId::new(PAGE_TREE_ID, 0), pages_dict.into())
    }

    fn write_font(&mut self) -> Result<()> {
        let mut font = Dictionary::new();
        font.set("Type", name("Font"));
        font.set("Subtype", name("Type1"));
        font.set("BaseFont", name(self.options.font.pdf_name()));
        font.set("Encoding", name("WinAnsiEncoding"));

        self.write_object(ObjectId::new(FONT_ID, 0), font.into())
    }

    fn write_info(&mut self) -> Result<()> {
        let mut info = Dictionary::new();

        if let Some(ref title) = self.options.title {
            info.set("Title", Object::String(encode_win_ansi(title)));
        }
        if let Some(ref author) = self.options.author {
            info.set("Author", Object::String(encode_win_ansi(author)));
        }
        let producer = concat!("storyprint ", env!("CARGO_PKG_VERSION"));
        info.set("Creator", Object::String(producer.as_bytes().to_vec()));
        info.set("Producer", Object::String(producer.as_bytes().to_vec()));

        let created = self.options.creation_date.unwrap_or_else(Utc::now);
        info.set(
            "CreationDate",
            Object::String(format_pdf_date(created).into_bytes()),
        );

        self.write_object(ObjectId::new(INFO_ID, 0), info.into())
    }

    fn write_page(&mut self, index: usize, geometry: &PageGeometry) -> Result<()> {
        let mut font_dict = Dictionary::new();
        font_dict.set("F1", ObjectId::new(FONT_ID, 0));
        let mut resources = Dictionary::new();
        resources.set("Font", font_dict);

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", name("Page"));
        page_dict.set("Parent", ObjectId::new(PAGE_TREE_ID, 0));
        page_dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.page_width()),
                Object::Real(geometry.page_height()),
            ],
        );
        page_dict.set("Resources", resources);
        page_dict.set("Contents", content_object_id(index));

        self.write_object(page_object_id(index), page_dict.into())
    }

    fn write_page_content(&mut self, index: usize, page: &Page) -> Result<()> {
        let content = render_page_content(page, self.options.font_size);

        #[allow(unused_mut)]
        let mut stream = Stream::new(content);
        #[cfg(feature = "compression")]
        if self.options.compress {
            stream.compress_flate()?;
        }

        self.write_object(content_object_id(index), stream.into_object())
    }

    fn write_object(&mut self, id: ObjectId, object: Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(&object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes())?,
            Object::String(s) => {
                self.write_bytes(b"(")?;
                self.write_bytes(&escape_literal(s))?;
                self.write_bytes(b")")?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => {
                self.write_bytes(b"<<")?;
                for (key, value) in dict.entries() {
                    self.write_bytes(b"\n/")?;
                    self.write_bytes(key.as_bytes())?;
                    self.write_bytes(b" ")?;
                    self.write_object_value(value)?;
                }
                self.write_bytes(b"\n>>")?;
            }
            Object::Stream(dict, data) => {
                self.write_object_value(&Object::Dictionary(dict.clone()))?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_xref(&mut self) -> Result<()> {
        // objects are numbered densely from 1, so one subsection covers them
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        self.write_bytes(b"xref\n")?;
        self.write_bytes(format!("0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        let entries: Vec<String> = (1..=max_obj_num)
            .map(|num| match self.xref_positions.get(&ObjectId::new(num, 0)) {
                Some(position) => format!("{:010} {:05} n \n", position, 0),
                None => "0000000000 00000 f \n".to_string(),
            })
            .collect();
        for entry in entries {
            self.write_bytes(entry.as_bytes())?;
        }

        Ok(())
    }

    fn write_trailer(&mut self, xref_position: u64) -> Result<()> {
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", (max_obj_num + 1) as i64);
        trailer.set("Root", ObjectId::new(CATALOG_ID, 0));
        trailer.set("Info", ObjectId::new(INFO_ID, 0));

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

impl PdfSink<BufWriter<std::fs::File>> {
    /// Create a sink writing to a new file at `path`
    pub fn create(path: impl AsRef<Path>, options: ExportOptions) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file), options))
    }
}

impl<W: Write> DocumentSink for PdfSink<W> {
    fn write_pages(&mut self, pages: &[Page], geometry: &PageGeometry) -> Result<()> {
        geometry.validate()?;
        if self.current_position > 0 {
            return Err(std::io::Error::other("PDF sink already holds a document").into());
        }

        self.write_header()?;
        self.write_catalog()?;
        self.write_page_tree(pages.len())?;
        self.write_font()?;
        self.write_info()?;

        for (index, page) in pages.iter().enumerate() {
            self.write_page(index, geometry)?;
            self.write_page_content(index, page)?;
        }

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(xref_position)?;
        self.writer.flush()?;

        debug!(
            pages = pages.len(),
            bytes = self.current_position,
            "wrote PDF document"
        );
        Ok(())
    }
}

fn page_object_id(index: usize) -> ObjectId {
    ObjectId::new(FIRST_PAGE_ID + index as u32 * 2, 0)
}

fn content_object_id(index: usize) -> ObjectId {
    ObjectId::new(FIRST_PAGE_ID + index as u32 * 2 + 1, 0)
}

/// Content stream operators drawing every fragment of the page
fn render_page_content(page: &Page, font_size: f64) -> Vec<u8> {
    let mut content = Vec::new();
    for fragment in page.fragments() {
        content.extend_from_slice(b"BT\n");
        content.extend_from_slice(format!("/F1 {} Tf\n", format_real(font_size)).as_bytes());
        content.extend_from_slice(
            format!("{:.2} {:.2} Td\n", fragment.x, fragment.y).as_bytes(),
        );
        content.push(b'(');
        content.extend_from_slice(&escape_literal(&encode_win_ansi(&fragment.text)));
        content.extend_from_slice(b") Tj\nET\n");
    }
    content
}

fn format_real(value: f64) -> String {
    let formatted = format!("{value:.6}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm')
fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");

    // For UTC, the offset is always +00'00'
    format!("{formatted}+00'00'")
}
