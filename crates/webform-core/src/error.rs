//! Error types for form submission processing.
//!
//! [`ValidationError`] is the only error a well-formed submission can produce:
//! it lists every offending field at once. Everything else in [`FormError`]
//! is a hard failure that aborts the submission without being folded into the
//! field list.

use std::fmt;

use thiserror::Error;

/// Error code for a value outside its field type's domain.
pub const CODE_INVALID: &str = "invalid";

/// Error code for a required field missing from the final record.
pub const CODE_REQUIRED: &str = "required";

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field name.
    pub field: String,
    /// A short code identifying the failure ("invalid" or "required").
    pub code: String,
    /// A human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a new `FieldError`.
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates an "invalid" error for a value that failed coercion.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, CODE_INVALID, message)
    }

    /// Creates a "required" error for a field absent from the record.
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, CODE_REQUIRED, "This field is required.")
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that made a submission unacceptable.
///
/// Field names are unique within one error: a field that failed coercion is
/// reported once even if it is also required.
///
/// # Examples
///
/// ```
/// use webform_core::error::{FieldError, ValidationError};
///
/// let mut err = ValidationError::new();
/// err.push(FieldError::invalid("age", "Enter a whole number."));
/// err.push(FieldError::required("email"));
/// err.push(FieldError::required("age"));
///
/// assert_eq!(err.field_names(), vec!["age", "email"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// The individual field errors, in report order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates an empty `ValidationError`.
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error unless the field is already reported.
    pub fn push(&mut self, error: FieldError) {
        if !self.contains(&error.field) {
            self.errors.push(error);
        }
    }

    /// Returns `true` if `field` is already reported.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Returns the offending field names in report order.
    pub fn field_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Returns `true` if no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of offending fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The error type for submission extraction.
///
/// Only [`FormError::Validation`] describes a problem with the submitted
/// values. The other variants are fatal and map to a server error.
#[derive(Error, Debug)]
pub enum FormError {
    /// One or more fields failed coercion or are required but missing.
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A field definition names a type with no coercion rule.
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    /// A declared field received a value its type cannot be coerced from.
    #[error("Field '{field}' of type '{field_type}' cannot be coerced from a text value")]
    UnsupportedCoercion {
        /// The declared field name.
        field: String,
        /// The declared field type.
        field_type: String,
    },

    /// An uploaded file carries unusable metadata.
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),

    /// Reading or rewinding an uploaded file stream failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl FormError {
    /// Returns the HTTP status code a request handler should answer with.
    ///
    /// - `Validation` -> 400
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UnknownFieldType(_)
            | Self::UnsupportedCoercion { .. }
            | Self::MalformedUpload(_)
            | Self::Io(_)
            | Self::ConfigurationError(_) => 500,
        }
    }

    /// Returns the validation payload, if this is a validation error.
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for FormError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let mut err = ValidationError::new();
        err.push(FieldError::invalid("age", "Enter a whole number."));
        err.push(FieldError::required("email"));
        assert_eq!(
            err.to_string(),
            "age: Enter a whole number.; email: This field is required."
        );
    }

    #[test]
    fn test_validation_error_dedup() {
        let mut err = ValidationError::new();
        err.push(FieldError::invalid("age", "Enter a whole number."));
        err.push(FieldError::required("age"));
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors[0].code, CODE_INVALID);
    }

    #[test]
    fn test_validation_error_empty() {
        let err = ValidationError::new();
        assert!(err.is_empty());
        assert_eq!(err.to_string(), "");
    }

    #[test]
    fn test_form_error_status_codes() {
        assert_eq!(FormError::Validation(ValidationError::new()).status_code(), 400);
        assert_eq!(FormError::UnknownFieldType("x".into()).status_code(), 500);
        assert_eq!(
            FormError::UnsupportedCoercion {
                field: "resume".into(),
                field_type: "binary".into(),
            }
            .status_code(),
            500
        );
        assert_eq!(FormError::MalformedUpload("x".into()).status_code(), 500);
        assert_eq!(FormError::ConfigurationError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        let err: FormError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("stream closed"));
        assert!(err.as_validation().is_none());
    }

    #[test]
    fn test_as_validation() {
        let mut inner = ValidationError::new();
        inner.push(FieldError::required("email"));
        let err = FormError::from(inner);
        assert_eq!(err.as_validation().unwrap().field_names(), vec!["email"]);
    }
}
