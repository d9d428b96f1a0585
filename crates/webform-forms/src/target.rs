//! The target model a submission is extracted for.
//!
//! A [`TargetModel`] names the model, exposes its writable fields, and may
//! offer two optional capabilities:
//!
//! - [`FilenameSidecar`]: reports which structural fields exist, so a binary
//!   field's `<name>_filename` companion can be filled in.
//! - [`InputFilter`]: post-processes the finished record.
//!
//! The extraction pipeline asks for each capability and skips it when the
//! model returns `None`.

use std::collections::{BTreeSet, HashMap};

use webform_core::FormResult;
use webform_http::RequestContext;

use crate::fields::FieldRegistry;
use crate::value::Value;

/// The record values extracted from a submission, keyed by field name.
pub type Record = HashMap<String, Value>;

/// A model that form submissions are extracted for.
pub trait TargetModel: Send + Sync {
    /// The model's technical name (e.g. `"crm.lead"`).
    fn model_name(&self) -> &str;

    /// The fields a submission may write.
    fn writable_fields(&self) -> &FieldRegistry;

    /// The filename sidecar capability, if the model offers one.
    fn filename_sidecar(&self) -> Option<&dyn FilenameSidecar> {
        None
    }

    /// The record post-processing capability, if the model offers one.
    fn input_filter(&self) -> Option<&dyn InputFilter> {
        None
    }
}

/// Reports whether the model structurally has a field.
pub trait FilenameSidecar: Send + Sync {
    /// Returns `true` if `field` exists on the model.
    fn has_field(&self, field: &str) -> bool;
}

/// Model-specific filtering of the extracted record.
///
/// ```
/// use webform_core::FormResult;
/// use webform_forms::target::{InputFilter, Record};
/// use webform_forms::value::Value;
/// use webform_http::RequestContext;
///
/// struct ApplicationTitle;
///
/// impl InputFilter for ApplicationTitle {
///     fn filter(&self, _request: &RequestContext, mut record: Record) -> FormResult<Record> {
///         let name = record.get("partner_name").map(ToString::to_string).unwrap_or_default();
///         record.insert("name".into(), Value::String(format!("{name}'s Application")));
///         Ok(record)
///     }
/// }
/// ```
pub trait InputFilter: Send + Sync {
    /// Returns the record that replaces `record`.
    fn filter(&self, request: &RequestContext, record: Record) -> FormResult<Record>;
}

/// A target model described entirely by data.
///
/// Suitable when the caller only has a field registry and, optionally, the
/// names of the model's other structural fields (such as `resume_filename`).
///
/// # Examples
///
/// ```
/// use webform_forms::fields::{FieldDefinition, FieldRegistry, FieldType};
/// use webform_forms::target::{StaticModel, TargetModel};
///
/// let model = StaticModel::new(
///     "hr.applicant",
///     FieldRegistry::new().with(FieldDefinition::new("resume", FieldType::Binary)),
/// )
/// .with_structural_field("resume_filename");
///
/// let sidecar = model.filename_sidecar().unwrap();
/// assert!(sidecar.has_field("resume_filename"));
/// assert!(sidecar.has_field("resume"));
/// assert!(!sidecar.has_field("photo_filename"));
/// ```
#[derive(Debug, Clone)]
pub struct StaticModel {
    name: String,
    fields: FieldRegistry,
    structural_fields: BTreeSet<String>,
}

impl StaticModel {
    /// Creates a model with the given name and writable fields.
    pub fn new(name: impl Into<String>, fields: FieldRegistry) -> Self {
        Self {
            name: name.into(),
            fields,
            structural_fields: BTreeSet::new(),
        }
    }

    /// Declares a structural field that is not in the writable registry.
    #[must_use]
    pub fn with_structural_field(mut self, field: impl Into<String>) -> Self {
        self.structural_fields.insert(field.into());
        self
    }
}

impl TargetModel for StaticModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn writable_fields(&self) -> &FieldRegistry {
        &self.fields
    }

    fn filename_sidecar(&self) -> Option<&dyn FilenameSidecar> {
        Some(self)
    }
}

impl FilenameSidecar for StaticModel {
    fn has_field(&self, field: &str) -> bool {
        self.structural_fields.contains(field) || self.fields.contains(field)
    }
}
