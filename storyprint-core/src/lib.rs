//! # storyprint
//!
//! Fixed-geometry pagination of plain text, with PDF and HTML export.
//!
//! ## Features
//!
//! - **Pagination**: lay out lines on fixed-size pages using a per-line character budget
//! - **Blank lines**: empty lines keep their vertical spacing and can push text to the next page
//! - **Wrapping**: hard character slicing, or word-aware wrapping on request
//! - **PDF export**: dependency-free PDF 1.7 writer with the standard Type 1 fonts
//! - **HTML export**: printable HTML with one fixed-size section per page
//! - **Stories**: request validation, generation prompts and request-scoped contexts
//!
//! ## Quick Start
//!
//! ```rust
//! use storyprint::{paginate, Document, PageGeometry, Result};
//!
//! # fn main() -> Result<()> {
//! let story = "Hei, Sofie!\n\nVelkommen til Bergen.";
//! let pages = paginate(&Document::from_text(story), &PageGeometry::default())?;
//!
//! assert_eq!(pages.len(), 1);
//! for fragment in pages[0].fragments() {
//!     println!("{:.1} {:.1} {}", fragment.x, fragment.y, fragment.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Exporting
//!
//! ```rust,no_run
//! use storyprint::{export_pdf, ExportOptions, PageGeometry};
//!
//! # fn main() -> storyprint::Result<()> {
//! let options = ExportOptions::default().with_title("Bergen 18.08.1894");
//! let bytes = export_pdf("Hei, Sofie!", &PageGeometry::default(), options)?;
//! std::fs::write("story.pdf", bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod story;
pub mod units;
pub mod writer;

pub use error::{PrintError, Result};
pub use geometry::PageGeometry;
pub use layout::{paginate, paginate_with, reconstruct, Document, Fragment, Page, WrapMode};
pub use story::{ArtifactCache, ContextId, StoryContext, StoryRequest};
pub use units::PageSize;
pub use writer::{
    export, export_pdf, DocumentSink, ExportFormat, ExportOptions, HtmlSink, PdfSink,
    StandardFont,
};

/// Current version of storyprint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
