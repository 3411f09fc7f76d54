//! Length conversions and standard paper sizes.
//!
//! Every length in this crate is expressed in PDF points (1/72 inch), with
//! the origin at the bottom-left corner of the page.

/// Points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert centimetres to points
pub fn cm(value: f64) -> f64 {
    value * POINTS_PER_INCH / 2.54
}

/// Convert millimetres to points
pub fn mm(value: f64) -> f64 {
    value * POINTS_PER_INCH / 25.4
}

/// Convert inches to points
pub fn inch(value: f64) -> f64 {
    value * POINTS_PER_INCH
}

/// Page dimensions in points, portrait orientation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// ISO A4, 210 x 297 mm
    pub fn a4() -> Self {
        Self::new(mm(210.0), mm(297.0))
    }

    /// ISO A5, 148 x 210 mm
    pub fn a5() -> Self {
        Self::new(mm(148.0), mm(210.0))
    }

    /// US Letter, 8.5 x 11 in
    pub fn letter() -> Self {
        Self::new(inch(8.5), inch(11.0))
    }

    /// US Legal, 8.5 x 14 in
    pub fn legal() -> Self {
        Self::new(inch(8.5), inch(14.0))
    }

    /// Look up a paper size by name (case-insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::a4()),
            "a5" => Some(Self::a5()),
            "letter" => Some(Self::letter()),
            "legal" => Some(Self::legal()),
            _ => None,
        }
    }
}
