//! The submission classification pipeline.
//!
//! [`Extractor::extract`] walks a [`RawSubmission`] once, in order, and sends
//! every entry to exactly one destination:
//!
//! 1. The reserved control field is dropped, whatever the model declares.
//! 2. Uploaded files go into the record when they target a declared binary
//!    field and into the attachments otherwise.
//! 3. Text for a declared field is coerced by its type into the record.
//! 4. Text for a [legacy carve-out](crate::legacy) field is coerced as an
//!    integer into the record.
//! 5. Anything else becomes a line of the custom text.
//!
//! Coercion failures are collected rather than returned immediately, so the
//! resulting [`ValidationError`] lists every offending field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::{debug, info, warn};

use webform_core::logging::submission_span;
use webform_core::settings::Settings;
use webform_core::{FieldError, FormError, FormResult, ValidationError};
use webform_http::{base_field_name, RawSubmission, RequestContext, SubmittedValue, UploadedFile};

use crate::fields::{coerce_value, parse_integer, CoercionError, CoercionOptions, FieldType};
use crate::legacy::is_legacy_numeric_field;
use crate::target::{Record, TargetModel};
use crate::value::Value;

/// The submitted field name callers use for submission context. Never classified.
pub const RESERVED_CONTROL_FIELD: &str = "context";

/// When missing required fields fail a submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredPolicy {
    /// A missing required field fails the submission on its own.
    #[default]
    Strict,
    /// Missing required fields are only reported when at least one field
    /// also failed coercion. Otherwise the submission passes.
    Legacy,
}

/// Per-call knobs for the extraction pipeline.
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Whether request metadata is written to [`ExtractionResult::meta`].
    pub metadata_enabled: bool,
    /// When missing required fields fail a submission.
    pub required_policy: RequiredPolicy,
    /// Date, datetime, and time zone parameters.
    pub coercion: CoercionOptions,
}

impl ExtractionConfig {
    /// Builds a config from settings.
    ///
    /// Fails if the configured time zone cannot be parsed.
    pub fn from_settings(settings: &Settings) -> FormResult<Self> {
        Ok(Self {
            metadata_enabled: settings.website_form_enable_metadata,
            required_policy: if settings.strict_required_fields {
                RequiredPolicy::Strict
            } else {
                RequiredPolicy::Legacy
            },
            coercion: CoercionOptions::from_settings(settings)?,
        })
    }
}

/// Everything extracted from one submission.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Coerced values for the target model's fields.
    pub record: Record,
    /// Uploaded files that are not binary record fields, tagged with their
    /// base field name.
    pub attachments: Vec<UploadedFile>,
    /// Unclassified fields as `"name : value"` lines.
    pub custom: String,
    /// Client request metadata, or empty when capture is disabled.
    pub meta: String,
}

/// Classifies submissions for target models.
///
/// An `Extractor` holds no per-submission state and can be shared freely.
///
/// # Examples
///
/// ```
/// use webform_forms::extract::{ExtractionConfig, Extractor};
/// use webform_forms::fields::{FieldDefinition, FieldRegistry, FieldType};
/// use webform_forms::target::StaticModel;
/// use webform_forms::value::Value;
/// use webform_http::{RawSubmission, RequestContext};
///
/// let model = StaticModel::new(
///     "crm.lead",
///     FieldRegistry::new()
///         .with(FieldDefinition::new("email", FieldType::Email).required(true))
///         .with(FieldDefinition::new("age", FieldType::Integer)),
/// );
/// let mut submission = RawSubmission::new()
///     .text("email", "a@b.com")
///     .text("age", "42")
///     .text("promo_code", "X1");
///
/// let extractor = Extractor::new(ExtractionConfig::default());
/// let result = extractor
///     .extract(&model, &mut submission, &RequestContext::new())
///     .unwrap();
///
/// assert_eq!(result.record["age"], Value::Int(42));
/// assert_eq!(result.custom, "promo_code : X1");
/// assert!(result.meta.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    /// Creates an extractor with the given config.
    pub const fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor configured from settings.
    pub fn from_settings(settings: &Settings) -> FormResult<Self> {
        ExtractionConfig::from_settings(settings).map(Self::new)
    }

    /// Returns the extractor's config.
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Classifies, coerces, and validates one submission for `target`.
    ///
    /// Binary uploads are read and rewound in place, so the caller can read
    /// them again. Attachments are copies tagged with their base field name.
    /// When several entries write the same record field, the last one wins.
    ///
    /// # Errors
    ///
    /// - [`FormError::Validation`] listing every field that failed coercion,
    ///   followed by every required field missing from the final record.
    /// - [`FormError::UnsupportedCoercion`] when a declared binary field
    ///   receives text.
    /// - [`FormError::MalformedUpload`] or [`FormError::Io`] for unusable
    ///   uploaded files.
    /// - Any error returned by the target's input filter.
    pub fn extract(
        &self,
        target: &dyn TargetModel,
        submission: &mut RawSubmission,
        request: &RequestContext,
    ) -> FormResult<ExtractionResult> {
        let model = target.model_name();
        let span = submission_span(model);
        let _guard = span.enter();

        let fields = target.writable_fields();

        let mut result = ExtractionResult::default();
        let mut errors = ValidationError::new();
        let mut custom_fields: Vec<(String, String)> = Vec::new();

        for (name, value) in submission.iter_mut() {
            if name == RESERVED_CONTROL_FIELD {
                debug!(field = name, "ignoring reserved control field");
                continue;
            }

            match value {
                SubmittedValue::File(file) => {
                    file.validate()?;

                    let base = base_field_name(name);
                    match fields.get(base) {
                        Some(def) if def.field_type == FieldType::Binary => {
                            let content = file.read_remaining()?;
                            file.rewind()?;
                            debug!(field = base, bytes = content.len(), "binary field");
                            result
                                .record
                                .insert(base.to_string(), Value::Binary(STANDARD.encode(content)));

                            let sidecar = format!("{base}_filename");
                            if def.manual
                                && target
                                    .filename_sidecar()
                                    .is_some_and(|s| s.has_field(&sidecar))
                            {
                                result
                                    .record
                                    .insert(sidecar, Value::String(file.filename.clone()));
                            }
                        }
                        _ => {
                            debug!(field = base, filename = %file.filename, "attachment");
                            file.field_name = Some(base.to_string());
                            result.attachments.push(file.clone());
                        }
                    }
                }

                SubmittedValue::Text(raw) => {
                    if let Some(def) = fields.get(name) {
                        match coerce_value(def.field_type, raw, &self.config.coercion) {
                            Ok(coerced) => {
                                debug!(field = name, field_type = %def.field_type, "record field");
                                result.record.insert(name.to_string(), coerced);
                            }
                            Err(CoercionError::Invalid(message)) => {
                                warn!(field = name, field_type = %def.field_type, "invalid value");
                                errors.push(FieldError::invalid(name, message));
                            }
                            Err(CoercionError::Unsupported) => {
                                return Err(FormError::UnsupportedCoercion {
                                    field: name.to_string(),
                                    field_type: def.field_type.to_string(),
                                });
                            }
                        }
                    } else if is_legacy_numeric_field(model, name) {
                        match parse_integer(raw) {
                            Ok(n) => {
                                debug!(field = name, "legacy numeric field");
                                result.record.insert(name.to_string(), Value::Int(n));
                            }
                            Err(message) => {
                                warn!(field = name, "invalid legacy numeric value");
                                errors.push(FieldError::invalid(name, message));
                            }
                        }
                    } else {
                        debug!(field = name, "custom field");
                        custom_fields.push((name.to_string(), raw.clone()));
                    }
                }
            }
        }

        result.custom = custom_fields
            .iter()
            .map(|(name, value)| format!("{name} : {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        if self.config.metadata_enabled {
            result.meta = format_metadata(request);
        }

        if let Some(filter) = target.input_filter() {
            result.record = filter.filter(request, result.record)?;
        }

        let has_coercion_errors = !errors.is_empty();
        let missing: Vec<&str> = fields
            .required()
            .filter(|def| !result.record.contains_key(&def.name))
            .map(|def| def.name.as_str())
            .collect();

        let fail = match self.config.required_policy {
            RequiredPolicy::Strict => has_coercion_errors || !missing.is_empty(),
            RequiredPolicy::Legacy => has_coercion_errors,
        };
        if fail {
            for name in missing {
                errors.push(FieldError::required(name));
            }
            warn!(fields = ?errors.field_names(), "submission rejected");
            return Err(FormError::Validation(errors));
        }

        info!(
            record_fields = result.record.len(),
            attachments = result.attachments.len(),
            custom_fields = custom_fields.len(),
            "submission extracted"
        );
        Ok(result)
    }
}

/// Classifies one submission with an explicit config.
///
/// Shorthand for `Extractor::new(config.clone()).extract(...)`.
pub fn extract(
    target: &dyn TargetModel,
    submission: &mut RawSubmission,
    request: &RequestContext,
    config: &ExtractionConfig,
) -> FormResult<ExtractionResult> {
    Extractor::new(config.clone()).extract(target, submission, request)
}

/// Renders the four metadata lines, using an empty string for absent values.
fn format_metadata(request: &RequestContext) -> String {
    let lines = [
        ("IP", &request.ip),
        ("USER_AGENT", &request.user_agent),
        ("ACCEPT_LANGUAGE", &request.accept_language),
        ("REFERER", &request.referrer),
    ];
    lines
        .iter()
        .map(|(label, value)| format!("{label} : {}\n", value.as_deref().unwrap_or("")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldDefinition, FieldRegistry};
    use crate::target::{InputFilter, StaticModel};

    fn lead_model() -> StaticModel {
        StaticModel::new(
            "crm.lead",
            FieldRegistry::new()
                .with(FieldDefinition::new("email", FieldType::Email).required(true))
                .with(FieldDefinition::new("age", FieldType::Integer))
                .with(FieldDefinition::new("newsletter", FieldType::Boolean)),
        )
    }

    fn run(model: &dyn TargetModel, submission: &mut RawSubmission) -> FormResult<ExtractionResult> {
        Extractor::default().extract(model, submission, &RequestContext::new())
    }

    #[test]
    fn test_declared_fields_are_coerced() {
        let mut submission = RawSubmission::new()
            .text("email", "a@b.com")
            .text("age", "42")
            .text("newsletter", "on");
        let result = run(&lead_model(), &mut submission).unwrap();
        assert_eq!(result.record["email"], Value::from("a@b.com"));
        assert_eq!(result.record["age"], Value::Int(42));
        assert_eq!(result.record["newsletter"], Value::Bool(true));
        assert!(result.custom.is_empty());
        assert!(result.attachments.is_empty());
    }

    #[test]
    fn test_coercion_errors_accumulate() {
        let model = StaticModel::new(
            "crm.lead",
            FieldRegistry::new()
                .with(FieldDefinition::new("age", FieldType::Integer))
                .with(FieldDefinition::new("budget", FieldType::Float)),
        );
        let mut submission = RawSubmission::new()
            .text("age", "old")
            .text("budget", "lots");
        let err = run(&model, &mut submission).unwrap_err();
        assert_eq!(err.as_validation().unwrap().field_names(), vec!["age", "budget"]);
    }

    #[test]
    fn test_invalid_field_reported_once_when_also_required() {
        let model = StaticModel::new(
            "crm.lead",
            FieldRegistry::new().with(FieldDefinition::new("age", FieldType::Integer).required(true)),
        );
        let mut submission = RawSubmission::new().text("age", "x");
        let err = run(&model, &mut submission).unwrap_err();
        let validation = err.as_validation().unwrap();
        assert_eq!(validation.field_names(), vec!["age"]);
        assert_eq!(validation.errors[0].code, "invalid");
    }

    #[test]
    fn test_custom_fields_in_submission_order() {
        let mut submission = RawSubmission::new()
            .text("zeta", "1")
            .text("email", "a@b.com")
            .text("alpha", "two words");
        let result = run(&lead_model(), &mut submission).unwrap();
        assert_eq!(result.custom, "zeta : 1\nalpha : two words");
    }

    #[test]
    fn test_reserved_control_field_ignored() {
        let model = StaticModel::new(
            "crm.lead",
            FieldRegistry::new().with(FieldDefinition::new("context", FieldType::Char)),
        );
        let mut submission = RawSubmission::new()
            .text("context", "{\"lang\": \"en_US\"}")
            .file("context", UploadedFile::new("ctx.json", "{}"));
        let result = run(&model, &mut submission).unwrap();
        assert!(result.record.is_empty());
        assert!(result.attachments.is_empty());
        assert!(result.custom.is_empty());
    }

    #[test]
    fn test_binary_text_value_is_fatal() {
        let model = StaticModel::new(
            "hr.applicant",
            FieldRegistry::new().with(FieldDefinition::new("resume", FieldType::Binary)),
        );
        let mut submission = RawSubmission::new().text("resume", "not a file");
        let err = run(&model, &mut submission).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedCoercion { ref field, .. } if field == "resume"));
    }

    #[test]
    fn test_empty_file_input_becomes_attachment() {
        let mut submission = RawSubmission::new()
            .text("email", "a@b.com")
            .file("photo", UploadedFile::new("", Vec::<u8>::new()));
        let result = run(&lead_model(), &mut submission).unwrap();
        assert_eq!(result.attachments.len(), 1);
        assert_eq!(result.attachments[0].field_name.as_deref(), Some("photo"));
        assert!(!result.record.contains_key("photo"));
    }

    #[test]
    fn test_empty_upload_satisfies_required_binary() {
        let model = StaticModel::new(
            "hr.applicant",
            FieldRegistry::new().with(FieldDefinition::new("resume", FieldType::Binary).required(true)),
        );
        let mut submission =
            RawSubmission::new().file("resume", UploadedFile::new("", Vec::<u8>::new()));
        let result = run(&model, &mut submission).unwrap();
        assert_eq!(result.record["resume"], Value::Binary(String::new()));
        assert!(result.attachments.is_empty());
    }

    #[test]
    fn test_malformed_upload_is_fatal() {
        let mut submission = RawSubmission::new()
            .text("email", "a@b.com")
            .file("photo", UploadedFile::new("", "content"));
        let err = run(&lead_model(), &mut submission).unwrap_err();
        assert!(matches!(err, FormError::MalformedUpload(_)));
    }

    #[test]
    fn test_legacy_policy_tolerates_missing_required() {
        let config = ExtractionConfig {
            required_policy: RequiredPolicy::Legacy,
            ..ExtractionConfig::default()
        };
        let mut submission = RawSubmission::new().text("age", "30");
        let result = extract(&lead_model(), &mut submission, &RequestContext::new(), &config);
        assert!(result.is_ok());

        let mut submission = RawSubmission::new().text("age", "thirty");
        let err = extract(&lead_model(), &mut submission, &RequestContext::new(), &config)
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().field_names(), vec!["age", "email"]);
    }

    struct Titled(StaticModel);

    impl TargetModel for Titled {
        fn model_name(&self) -> &str {
            self.0.model_name()
        }

        fn writable_fields(&self) -> &FieldRegistry {
            self.0.writable_fields()
        }

        fn input_filter(&self) -> Option<&dyn InputFilter> {
            Some(self)
        }
    }

    impl InputFilter for Titled {
        fn filter(&self, request: &RequestContext, mut record: Record) -> FormResult<Record> {
            let ip = request.ip.clone().unwrap_or_default();
            record.insert("email".to_string(), Value::String(format!("filtered@{ip}")));
            Ok(record)
        }
    }

    #[test]
    fn test_input_filter_satisfies_required() {
        let model = Titled(lead_model());
        let mut submission = RawSubmission::new().text("age", "5");
        let request = RequestContext::new().ip("10.0.0.1");
        let result = Extractor::default()
            .extract(&model, &mut submission, &request)
            .unwrap();
        assert_eq!(result.record["email"], Value::from("filtered@10.0.0.1"));
    }

    #[test]
    fn test_format_metadata_absent_values() {
        let meta = format_metadata(&RequestContext::new().ip("1.2.3.4"));
        assert_eq!(
            meta,
            "IP : 1.2.3.4\nUSER_AGENT : \nACCEPT_LANGUAGE : \nREFERER : \n"
        );
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = Settings::default();
        settings.website_form_enable_metadata = true;
        settings.strict_required_fields = false;
        let config = ExtractionConfig::from_settings(&settings).unwrap();
        assert!(config.metadata_enabled);
        assert_eq!(config.required_policy, RequiredPolicy::Legacy);

        settings.time_zone = "nowhere".to_string();
        assert!(matches!(
            Extractor::from_settings(&settings),
            Err(FormError::ConfigurationError(_))
        ));
    }
}
