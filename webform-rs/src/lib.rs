//! # webform-rs
//!
//! Classifies and validates website form submissions against a target model.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! Depend on `webform-rs` to get everything, or on the individual crates for
//! finer-grained control.

/// Error types, settings, and logging.
pub use webform_core as core;

/// Request data: submitted entries, uploaded files, request metadata.
#[cfg(feature = "http")]
pub use webform_http as http;

/// Field types, value coercion, and the extraction pipeline.
#[cfg(feature = "forms")]
pub use webform_forms as forms;

/// Third-party crates re-exported for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;

/// The types most callers need.
///
/// ```
/// use webform_rs::prelude::*;
///
/// let model = StaticModel::new(
///     "crm.lead",
///     FieldRegistry::new().with(FieldDefinition::new("email", FieldType::Email).required(true)),
/// );
/// let mut submission = RawSubmission::new()
///     .text("email", "a@b.com")
///     .text("source", "footer");
///
/// let result = Extractor::default()
///     .extract(&model, &mut submission, &RequestContext::new())
///     .unwrap();
/// assert_eq!(result.custom, "source : footer");
/// ```
pub mod prelude {
    pub use webform_core::logging::setup_logging;
    pub use webform_core::{FieldError, FormError, FormResult, Settings, ValidationError};

    #[cfg(feature = "http")]
    pub use webform_http::{RawSubmission, RequestContext, SubmittedValue, UploadedFile};

    #[cfg(feature = "forms")]
    pub use webform_forms::{
        extract, ExtractionConfig, ExtractionResult, Extractor, FieldDefinition, FieldRegistry,
        FieldType, FilenameSidecar, InputFilter, Record, RequiredPolicy, StaticModel, TargetModel,
        Value,
    };
}
