//! Page geometry used by the paginator and the document sinks

use crate::error::{PrintError, Result};
use crate::units::{cm, PageSize};

/// Tolerance applied when counting how many line slots fit on a page, so that
/// a usable height of exactly `n * line_height` yields `n` slots despite
/// floating point rounding.
const SLOT_EPSILON: f64 = 1e-9;

/// Immutable page configuration: page size, margins, line height and the
/// per-line character budget.
///
/// All lengths are points. The vertical cursor of a page starts at
/// `page_height - top_margin` and moves down by `line_height` per line.
///
/// # Example
///
/// ```rust
/// use storyprint::{PageGeometry, units::cm};
///
/// let geometry = PageGeometry::default()
///     .with_margins(cm(2.0), cm(2.0), cm(2.5))
///     .with_max_chars_per_line(80);
/// assert!(geometry.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageGeometry {
    page_width: f64,
    page_height: f64,
    top_margin: f64,
    bottom_margin: f64,
    left_margin: f64,
    line_height: f64,
    max_chars_per_line: usize,
}

impl Default for PageGeometry {
    /// A4 with 2 cm margins, 0.6 cm lines and 90 characters per line
    fn default() -> Self {
        let a4 = PageSize::a4();
        Self {
            page_width: a4.width,
            page_height: a4.height,
            top_margin: cm(2.0),
            bottom_margin: cm(2.0),
            left_margin: cm(2.0),
            line_height: cm(0.6),
            max_chars_per_line: 90,
        }
    }
}

impl PageGeometry {
    /// Build a geometry and validate it
    pub fn new(
        page_size: PageSize,
        top_margin: f64,
        bottom_margin: f64,
        left_margin: f64,
        line_height: f64,
        max_chars_per_line: usize,
    ) -> Result<Self> {
        let geometry = Self {
            page_width: page_size.width,
            page_height: page_size.height,
            top_margin,
            bottom_margin,
            left_margin,
            line_height,
            max_chars_per_line,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_width = page_size.width;
        self.page_height = page_size.height;
        self
    }

    pub fn with_margins(mut self, top: f64, bottom: f64, left: f64) -> Self {
        self.top_margin = top;
        self.bottom_margin = bottom;
        self.left_margin = left;
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_max_chars_per_line(mut self, max_chars_per_line: usize) -> Self {
        self.max_chars_per_line = max_chars_per_line;
        self
    }

    /// Check every invariant of the geometry.
    ///
    /// Fails with [`PrintError::InvalidGeometry`] when a length is not a
    /// positive finite number, when the character budget is zero, or when
    /// the space between the margins cannot hold a single line.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("top margin", self.top_margin),
            ("bottom margin", self.bottom_margin),
            ("left margin", self.left_margin),
            ("line height", self.line_height),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(PrintError::InvalidGeometry(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.max_chars_per_line == 0 {
            return Err(PrintError::InvalidGeometry(
                "max characters per line must be at least 1".to_string(),
            ));
        }

        if self.left_margin >= self.page_width {
            return Err(PrintError::InvalidGeometry(format!(
                "left margin {} leaves no room on a page {} wide",
                self.left_margin, self.page_width
            )));
        }

        if self.lines_per_page() == 0 {
            return Err(PrintError::InvalidGeometry(format!(
                "usable height {:.2} cannot hold a line of height {:.2}",
                self.usable_height(),
                self.line_height
            )));
        }

        Ok(())
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    pub fn top_margin(&self) -> f64 {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> f64 {
        self.bottom_margin
    }

    pub fn left_margin(&self) -> f64 {
        self.left_margin
    }

    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    pub fn max_chars_per_line(&self) -> usize {
        self.max_chars_per_line
    }

    /// Baseline of the first line on a page, in sink coordinates
    pub fn top_y(&self) -> f64 {
        self.page_height - self.top_margin
    }

    /// Vertical space between the top and bottom margins
    pub fn usable_height(&self) -> f64 {
        self.page_height - self.top_margin - self.bottom_margin
    }

    /// Number of line slots on one page. A slot fits when its whole line box
    /// stays above the bottom margin.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.usable_height();
        if usable <= 0.0 || self.line_height <= 0.0 {
            return 0;
        }
        (usable / self.line_height + SLOT_EPSILON).floor() as usize
    }

    /// Baseline of the given 0-based line slot
    pub fn baseline_for_slot(&self, slot: usize) -> f64 {
        self.top_y() - slot as f64 * self.line_height
    }

    /// Parse a geometry from JSON and validate it. Missing fields take their
    /// default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let geometry: Self =
            serde_json::from_str(json).map_err(|e| PrintError::InvalidConfig(e.to_string()))?;
        geometry.validate()?;
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let geometry = PageGeometry::default();
        assert!(geometry.validate().is_ok());
        assert!((geometry.top_y() - cm(27.7)).abs() < 1e-9);
        assert_eq!(geometry.max_chars_per_line(), 90);
    }

    #[test]
    fn test_zero_max_chars_rejected() {
        let geometry = PageGeometry::default().with_max_chars_per_line(0);
        match geometry.validate() {
            Err(PrintError::InvalidGeometry(msg)) => assert!(msg.contains("max characters")),
            other => panic!("Expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_lengths_rejected() {
        let cases = [
            PageGeometry::default().with_line_height(0.0),
            PageGeometry::default().with_line_height(-1.0),
            PageGeometry::default().with_margins(0.0, 10.0, 10.0),
            PageGeometry::default().with_margins(10.0, -5.0, 10.0),
            PageGeometry::default().with_margins(10.0, 10.0, f64::NAN),
            PageGeometry::default().with_page_size(PageSize::new(0.0, 100.0)),
        ];
        for geometry in cases {
            assert!(
                matches!(geometry.validate(), Err(PrintError::InvalidGeometry(_))),
                "geometry should be rejected: {:?}",
                geometry
            );
        }
    }

    #[test]
    fn test_margins_leaving_no_room_rejected() {
        let geometry = PageGeometry::default()
            .with_page_size(PageSize::new(100.0, 100.0))
            .with_margins(45.0, 45.0, 10.0)
            .with_line_height(12.0);
        assert!(matches!(
            geometry.validate(),
            Err(PrintError::InvalidGeometry(_))
        ));

        let geometry = PageGeometry::default()
            .with_page_size(PageSize::new(100.0, 100.0))
            .with_margins(10.0, 10.0, 100.0);
        assert!(matches!(
            geometry.validate(),
            Err(PrintError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_lines_per_page_exact_multiple() {
        let geometry = PageGeometry::default()
            .with_page_size(PageSize::new(200.0, 120.0))
            .with_margins(10.0, 10.0, 10.0)
            .with_line_height(10.0);
        assert_eq!(geometry.usable_height(), 100.0);
        assert_eq!(geometry.lines_per_page(), 10);
    }

    #[test]
    fn test_lines_per_page_with_fractional_centimetres() {
        // 0.6 cm lines on a 0.6 * 40 cm usable area
        let geometry = PageGeometry::default()
            .with_page_size(PageSize::new(cm(21.0), cm(28.0)))
            .with_margins(cm(2.0), cm(2.0), cm(2.0))
            .with_line_height(cm(0.6));
        assert_eq!(geometry.lines_per_page(), 40);
    }

    #[test]
    fn test_baseline_for_slot() {
        let geometry = PageGeometry::default()
            .with_page_size(PageSize::new(200.0, 120.0))
            .with_margins(10.0, 10.0, 10.0)
            .with_line_height(10.0);
        assert_eq!(geometry.baseline_for_slot(0), 110.0);
        assert_eq!(geometry.baseline_for_slot(9), 20.0);
    }

    #[test]
    fn test_new_validates() {
        assert!(PageGeometry::new(PageSize::a4(), 50.0, 50.0, 50.0, 14.4, 80).is_ok());
        assert!(PageGeometry::new(PageSize::a4(), 50.0, 50.0, 50.0, 14.4, 0).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let geometry = PageGeometry::from_json(r#"{"max_chars_per_line": 60}"#).unwrap();
        assert_eq!(geometry.max_chars_per_line(), 60);
        assert_eq!(geometry.page_height(), PageGeometry::default().page_height());

        assert!(matches!(
            PageGeometry::from_json(r#"{"max_chars_per_line": 0}"#),
            Err(PrintError::InvalidGeometry(_))
        ));
        assert!(matches!(
            PageGeometry::from_json("not json"),
            Err(PrintError::InvalidConfig(_))
        ));
    }
}
