use crate::error::{PrintError, Result};
use chrono::{Datelike, NaiveDate};

/// Date format the form asks for, e.g. `18.08.1894`
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// The form input of one trip: who travels, and when and where to
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoryRequest {
    /// Name of the student
    pub name: String,
    /// Free-text date, usually `DD.MM.YYYY`
    pub date: String,
    /// Place and country, e.g. "Bridgetown, Barbados"
    pub location: String,
    /// Optional ethnicity and social class of the narrator
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_details: Option<String>,
}

impl StoryRequest {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            location: location.into(),
            extra_details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.extra_details = Some(details.into());
        self
    }

    /// Trim every field and drop blank details, then check that name, date
    /// and location are filled in.
    pub fn validated(self) -> Result<Self> {
        let request = Self {
            name: self.name.trim().to_string(),
            date: self.date.trim().to_string(),
            location: self.location.trim().to_string(),
            extra_details: self
                .extra_details
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        };

        for (field, value) in [
            ("name", &request.name),
            ("date", &request.date),
            ("location", &request.location),
        ] {
            if value.is_empty() {
                return Err(PrintError::InvalidRequest(format!("{field} is required")));
            }
        }

        Ok(request)
    }

    /// The date parsed as `DD.MM.YYYY`, if it is in that format
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    /// Year of the trip: from the parsed date, or else the trailing four
    /// digits of the date text
    pub fn year(&self) -> Option<i32> {
        if let Some(date) = self.parsed_date() {
            return Some(date.year());
        }

        let chars: Vec<char> = self.date.trim().chars().collect();
        if chars.len() < 4 {
            return None;
        }
        let tail = &chars[chars.len() - 4..];
        if tail.iter().all(|c| c.is_ascii_digit()) {
            tail.iter().collect::<String>().parse().ok()
        } else {
            None
        }
    }

    /// Heading of the story: location followed by date
    pub fn title(&self) -> String {
        format!("{} {}", self.location.trim(), self.date.trim())
    }

    /// File name offered for the PDF download
    pub fn download_file_name(&self) -> String {
        let mut slug = String::new();
        for ch in self.title().to_lowercase().chars() {
            if ch.is_alphanumeric() {
                slug.push(ch);
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            "story.pdf".to_string()
        } else {
            format!("{slug}.pdf")
        }
    }
}
