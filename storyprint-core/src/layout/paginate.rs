use crate::error::Result;
use crate::geometry::PageGeometry;
use crate::layout::document::Document;
use crate::layout::wrap::{wrap_line, WrapMode};
use tracing::{debug, trace};

/// One positioned slice of text on a page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fragment {
    /// Text of the fragment, at most `max_chars_per_line` characters
    pub text: String,
    /// Left edge, in points
    pub x: f64,
    /// Baseline, in points from the bottom of the page
    pub y: f64,
    /// 0-based line slot on the page
    pub line: usize,
}

/// One fixed-size page of laid out fragments. Pages are never modified once
/// returned by [`paginate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    index: usize,
    fragments: Vec<Fragment>,
    lines_used: usize,
}

impl Page {
    fn new(index: usize) -> Self {
        Self {
            index,
            fragments: Vec::new(),
            lines_used: 0,
        }
    }

    /// 0-based position of the page in the output
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Line slots consumed on this page, blank lines included
    pub fn lines_used(&self) -> usize {
        self.lines_used
    }

    /// True when the page carries no text (it may still hold blank lines)
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Text of each line slot, with `""` for blank slots
    pub fn text_lines(&self) -> Vec<&str> {
        let mut lines = vec![""; self.lines_used];
        for fragment in &self.fragments {
            if let Some(slot) = lines.get_mut(fragment.line) {
                *slot = fragment.text.as_str();
            }
        }
        lines
    }
}

/// Vertical position while laying out, counted in whole line slots
struct Cursor {
    slot: usize,
    capacity: usize,
}

impl Cursor {
    fn new(capacity: usize) -> Self {
        Self { slot: 0, capacity }
    }

    /// The next line would pass the bottom margin
    fn is_past_bottom(&self) -> bool {
        self.slot >= self.capacity
    }

    fn advance(&mut self) {
        self.slot += 1;
    }

    fn reset(&mut self) {
        self.slot = 0;
    }
}

struct Paginator<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<Page>,
    current: Page,
    cursor: Cursor,
}

impl<'a> Paginator<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page::new(0),
            cursor: Cursor::new(geometry.lines_per_page()),
        }
    }

    fn make_room(&mut self) {
        if self.cursor.is_past_bottom() {
            self.close_page();
            self.current = Page::new(self.pages.len());
            self.cursor.reset();
            trace!(page = self.current.index, "page break");
        }
    }

    fn blank_line(&mut self) {
        self.make_room();
        self.cursor.advance();
    }

    fn emit(&mut self, text: String) {
        self.make_room();
        self.current.fragments.push(Fragment {
            text,
            x: self.geometry.left_margin(),
            y: self.geometry.baseline_for_slot(self.cursor.slot),
            line: self.cursor.slot,
        });
        self.cursor.advance();
    }

    fn close_page(&mut self) {
        let mut page = std::mem::replace(&mut self.current, Page::new(0));
        page.lines_used = self.cursor.slot;
        self.pages.push(page);
    }

    fn finish(mut self) -> Vec<Page> {
        self.close_page();
        self.pages
    }
}

/// Lay out `document` on pages of the given geometry, slicing long lines
/// every `max_chars_per_line` characters.
///
/// Blank lines advance the cursor without emitting a fragment. A new page is
/// started whenever the next line would cross the bottom margin. The result
/// always holds at least one page.
///
/// # Errors
///
/// Returns [`PrintError::InvalidGeometry`](crate::PrintError::InvalidGeometry)
/// when the geometry is invalid.
///
/// # Example
///
/// ```rust
/// use storyprint::{paginate, Document, PageGeometry};
///
/// let doc = Document::from_text("Hello\n\nWorld");
/// let pages = paginate(&doc, &PageGeometry::default()).unwrap();
/// assert_eq!(pages.len(), 1);
/// assert_eq!(pages[0].fragments().len(), 2);
/// ```
pub fn paginate(document: &Document, geometry: &PageGeometry) -> Result<Vec<Page>> {
    paginate_with(document, geometry, WrapMode::Naive)
}

/// [`paginate`] with an explicit [`WrapMode`]
pub fn paginate_with(
    document: &Document,
    geometry: &PageGeometry,
    mode: WrapMode,
) -> Result<Vec<Page>> {
    geometry.validate()?;

    let mut paginator = Paginator::new(geometry);
    for line in document.lines() {
        if line.is_empty() {
            paginator.blank_line();
            continue;
        }
        for chunk in wrap_line(line, geometry.max_chars_per_line(), mode) {
            paginator.emit(chunk);
        }
    }

    let pages = paginator.finish();
    debug!(
        lines = document.len(),
        pages = pages.len(),
        fragments = pages.iter().map(|p| p.fragments.len()).sum::<usize>(),
        "paginated document"
    );
    Ok(pages)
}

/// Rebuild the line sequence from laid out pages, blank slots included.
///
/// Inverse of [`paginate`] for documents where no line had to be sliced.
pub fn reconstruct(pages: &[Page]) -> Vec<String> {
    pages
        .iter()
        .flat_map(|page| page.text_lines().into_iter().map(str::to_string))
        .collect()
}
