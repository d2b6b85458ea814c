use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Half-open range of characters (not bytes) in a [`NormalizedText`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} is after end {end}");
        Self { start, end }
    }

    /// Returns true if the two spans share at least one character.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lowercased, trimmed concatenation of a record's text fields.
///
/// Owned by a single classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    char_starts: Vec<usize>,
}

impl NormalizedText {
    /// Joins title, description and tags with single spaces, then lowercases
    /// and trims the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use bjj_tagger::NormalizedText;
    ///
    /// let text = NormalizedText::new("Heel Hook ", "", &["No-Gi", "Leg Locks"]);
    /// assert_eq!(text.as_str(), "heel hook   no-gi leg locks");
    ///
    /// let empty = NormalizedText::new("", "", &[] as &[&str]);
    /// assert!(empty.is_empty());
    /// ```
    pub fn new<S: AsRef<str>>(title: &str, description: &str, tags: &[S]) -> Self {
        let tags = tags.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(" ");
        Self::from_raw(&format!("{title} {description} {tags}"))
    }

    /// Normalizes a single free-form string.
    pub fn from_raw(raw: &str) -> Self {
        let text = raw.to_lowercase().trim().to_string();
        let char_starts = text.char_indices().map(|(offset, _)| offset).collect();
        Self { text, char_starts }
    }

    /// Returns the normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.char_starts.len()
    }

    /// Returns the text covered by a character span.
    pub fn slice(&self, span: Span) -> &str {
        let start = self.byte_offset(span.start);
        let end = self.byte_offset(span.end);
        &self.text[start..end]
    }

    /// Converts a byte range on char boundaries into a character span.
    pub(crate) fn char_span(&self, bytes: Range<usize>) -> Span {
        let start = self.char_starts.partition_point(|&offset| offset < bytes.start);
        let end = self.char_starts.partition_point(|&offset| offset < bytes.end);
        Span::new(start, end)
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.char_starts
            .get(char_index)
            .copied()
            .unwrap_or(self.text.len())
    }
}
