//! Uploaded files from a multipart form submission.
//!
//! An [`UploadedFile`] owns its content behind a seekable cursor, so reading
//! it consumes the stream the way a real upload would. Callers that read a
//! file must [`rewind`](UploadedFile::rewind) it before handing it on.

use std::io::{Cursor, Read, Seek, SeekFrom};

use webform_core::{FormError, FormResult};

/// An uploaded file from a multipart form submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub filename: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The form field this file was routed from, once classified.
    pub field_name: Option<String>,
    stream: Cursor<Vec<u8>>,
}

impl UploadedFile {
    /// Creates an uploaded file with the default `application/octet-stream` type.
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/octet-stream".to_string(),
            field_name: None,
            stream: Cursor::new(content.into()),
        }
    }

    /// Sets the MIME content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the total size of the content in bytes.
    pub fn size(&self) -> usize {
        self.stream.get_ref().len()
    }

    /// Returns the current read position of the stream.
    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    /// Reads the remainder of the stream.
    pub fn read_remaining(&mut self) -> FormResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size());
        self.stream.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Seeks the stream back to its start.
    pub fn rewind(&mut self) -> FormResult<()> {
        self.stream.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Returns `true` for a file input the client left empty.
    ///
    /// Browsers submit an unselected file input as a part with an empty
    /// filename and no content. Such a part is well-formed.
    pub fn is_empty_part(&self) -> bool {
        self.filename.is_empty() && self.size() == 0
    }

    /// Checks that the upload carries usable metadata.
    ///
    /// Content without a filename, or a filename containing control
    /// characters, is rejected. An [empty part](Self::is_empty_part) passes.
    pub fn validate(&self) -> FormResult<()> {
        if self.filename.trim().is_empty() && !self.is_empty_part() {
            return Err(FormError::MalformedUpload(format!(
                "uploaded file of {} bytes has no filename",
                self.size()
            )));
        }
        if self.filename.chars().any(char::is_control) {
            return Err(FormError::MalformedUpload(format!(
                "uploaded filename {:?} contains control characters",
                self.filename
            )));
        }
        Ok(())
    }
}

impl Read for UploadedFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Seek for UploadedFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.stream.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_then_rewind() {
        let mut file = UploadedFile::new("cv.pdf", b"%PDF-1.4".to_vec());
        assert_eq!(file.read_remaining().unwrap(), b"%PDF-1.4");
        assert_eq!(file.position(), 8);
        assert!(file.read_remaining().unwrap().is_empty());

        file.rewind().unwrap();
        assert_eq!(file.position(), 0);
        assert_eq!(file.read_remaining().unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_defaults() {
        let file = UploadedFile::new("a.txt", "hello");
        assert_eq!(file.content_type, "application/octet-stream");
        assert!(file.field_name.is_none());
        assert_eq!(file.size(), 5);
    }

    #[test]
    fn test_with_content_type() {
        let file = UploadedFile::new("me.jpg", vec![0xFF, 0xD8]).with_content_type("image/jpeg");
        assert_eq!(file.content_type, "image/jpeg");
    }

    #[test]
    fn test_validate_missing_filename() {
        let file = UploadedFile::new("  ", "data");
        assert!(matches!(file.validate(), Err(FormError::MalformedUpload(_))));
        assert!(UploadedFile::new("ok.bin", "data").validate().is_ok());
    }

    #[test]
    fn test_validate_control_characters() {
        let file = UploadedFile::new("evil\0.txt", "data");
        assert!(matches!(file.validate(), Err(FormError::MalformedUpload(_))));
    }

    #[test]
    fn test_empty_part() {
        let file = UploadedFile::new("", Vec::<u8>::new());
        assert!(file.is_empty_part());
        assert!(file.validate().is_ok());
        assert!(!UploadedFile::new("", "x").is_empty_part());
    }

    #[test]
    fn test_std_read_trait() {
        let mut file = UploadedFile::new("a.txt", "abc");
        let mut buf = String::new();
        file.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "abc");
    }
}
