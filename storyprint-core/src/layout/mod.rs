//! Fixed-geometry pagination of plain text
//!
//! A [`Document`] of lines is laid out against a [`PageGeometry`](crate::PageGeometry)
//! into an ordered list of [`Page`]s. Each page holds positioned
//! [`Fragment`]s that any page-based sink can draw: the layout never performs
//! I/O and never depends on font metrics, only on the character budget.

mod document;
mod paginate;
mod wrap;

pub use document::Document;
pub use paginate::{paginate, paginate_with, reconstruct, Fragment, Page};
pub use wrap::{wrap_line, WrapMode};
