use unicode_normalization::UnicodeNormalization;

/// An ordered sequence of text lines to be laid out.
///
/// Blank lines are kept: they become vertical spacing on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from explicit lines, taken as-is
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split free text into lines.
    ///
    /// `\r\n` and lone `\r` count as line breaks, the text is NFC-normalized
    /// so composed characters count once against the character budget, and a
    /// trailing newline produces a trailing blank line. The empty string is
    /// the empty document.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let normalized: String = text.replace("\r\n", "\n").replace('\r', "\n").nfc().collect();
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines joined back with `\n`
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl<S: Into<String>> FromIterator<S> for Document {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_lines(iter)
    }
}
