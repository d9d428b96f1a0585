//! Ordered submitted field values.
//!
//! Unlike a query dict, a [`RawSubmission`] keeps every entry in the order the
//! client sent it, including repeated names and indexed array fields such as
//! `photo[0]` and `photo[1]`.

use crate::upload::UploadedFile;

/// A single submitted value: plain text or an uploaded file.
#[derive(Debug, Clone)]
pub enum SubmittedValue {
    /// A plain string value.
    Text(String),
    /// An uploaded file.
    File(UploadedFile),
}

impl SubmittedValue {
    /// Returns the text value, or `None` for a file.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::File(_) => None,
        }
    }

    /// Returns `true` if this value is an uploaded file.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl From<&str> for SubmittedValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SubmittedValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<UploadedFile> for SubmittedValue {
    fn from(file: UploadedFile) -> Self {
        Self::File(file)
    }
}

/// The field values of one form submission, in submission order.
///
/// # Examples
///
/// ```
/// use webform_http::{RawSubmission, UploadedFile};
///
/// let submission = RawSubmission::new()
///     .text("email", "a@b.com")
///     .file("photo[0]", UploadedFile::new("a.png", vec![1, 2, 3]));
///
/// assert_eq!(submission.len(), 2);
/// assert_eq!(submission.get_text("email"), Some("a@b.com"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    entries: Vec<(String, SubmittedValue)>,
}

impl RawSubmission {
    /// Creates an empty submission.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<SubmittedValue>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Appends a text entry (builder style).
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, SubmittedValue::Text(value.into()));
        self
    }

    /// Appends a file entry (builder style).
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.push(name, SubmittedValue::File(file));
        self
    }

    /// Returns the **last** text value submitted under `name`.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|(n, _)| n == name)
            .find_map(|(_, v)| v.as_text())
    }

    /// Returns an iterator over `(name, value)` entries in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubmittedValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns a mutable iterator over entries in submission order.
    ///
    /// Names stay read-only; values can be read from or tagged in place.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SubmittedValue)> {
        self.entries.iter_mut().map(|(n, v)| (n.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the submission has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RawSubmission {
    type Item = (String, SubmittedValue);
    type IntoIter = std::vec::IntoIter<(String, SubmittedValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<SubmittedValue>> FromIterator<(K, V)> for RawSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Strips an array indexing suffix from a field name.
///
/// Everything from the first `[` onwards is removed.
///
/// # Examples
///
/// ```
/// use webform_http::base_field_name;
///
/// assert_eq!(base_field_name("photo[0]"), "photo");
/// assert_eq!(base_field_name("photo[0][1]"), "photo");
/// assert_eq!(base_field_name("photo"), "photo");
/// ```
pub fn base_field_name(name: &str) -> &str {
    name.split_once('[').map_or(name, |(base, _)| base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_duplicates_preserved() {
        let submission = RawSubmission::new()
            .text("b", "1")
            .text("a", "2")
            .text("b", "3");
        let names: Vec<&str> = submission.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
        assert_eq!(submission.get_text("b"), Some("3"));
    }

    #[test]
    fn test_get_text_skips_files() {
        let submission = RawSubmission::new()
            .text("doc", "inline")
            .file("doc", UploadedFile::new("d.txt", "x"));
        assert_eq!(submission.get_text("doc"), Some("inline"));
        assert_eq!(submission.get_text("missing"), None);
    }

    #[test]
    fn test_from_iterator() {
        let submission: RawSubmission = vec![("name", "Ada"), ("age", "36")].into_iter().collect();
        assert_eq!(submission.len(), 2);
        assert!(!submission.is_empty());
    }

    #[test]
    fn test_submitted_value_helpers() {
        let text = SubmittedValue::from("x");
        assert_eq!(text.as_text(), Some("x"));
        assert!(!text.is_file());

        let file = SubmittedValue::from(UploadedFile::new("f.bin", vec![0]));
        assert!(file.is_file());
        assert_eq!(file.as_text(), None);
    }

    #[test]
    fn test_base_field_name_edge_cases() {
        assert_eq!(base_field_name("[0]"), "");
        assert_eq!(base_field_name("a]b"), "a]b");
    }
}
