//! Field definitions and type-level coercion.
//!
//! Each [`FieldDefinition`] describes one writable field of the target model.
//! The [`FieldType`] enum is closed: every kind maps to exactly one coercion
//! rule in [`coerce_value`], except `binary`, which only accepts uploaded
//! files and is handled by the extraction pipeline itself.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use webform_core::settings::Settings;
use webform_core::utils::text::plaintext_to_html;
use webform_core::{FormError, FormResult};

use crate::value::Value;

/// The semantic kind of a target field.
///
/// Parsed from and serialized to its lowercase wire name (`"many2one"`,
/// `"datetime"`, ...). An unrecognized name is a fatal
/// [`FormError::UnknownFieldType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// A short text field.
    Char,
    /// A long text field.
    Text,
    /// An HTML field; plain text input is converted to paragraph markup.
    Html,
    /// An email address, passed through unchanged.
    Email,
    /// A selection key, passed through unchanged.
    Selection,
    /// A boolean field.
    Boolean,
    /// An integer field.
    Integer,
    /// A floating-point field.
    Float,
    /// A monetary amount, coerced like `Float`.
    Monetary,
    /// A date field.
    Date,
    /// A date-time field.
    Datetime,
    /// A reference to one record, submitted as its integer id.
    Many2one,
    /// A list of record ids, comma-separated.
    One2many,
    /// A set of record ids, comma-separated, replacing the current links.
    Many2many,
    /// File content; only uploaded files are accepted.
    Binary,
}

impl FieldType {
    /// Every field type, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Char,
        Self::Text,
        Self::Html,
        Self::Email,
        Self::Selection,
        Self::Boolean,
        Self::Integer,
        Self::Float,
        Self::Monetary,
        Self::Date,
        Self::Datetime,
        Self::Many2one,
        Self::One2many,
        Self::Many2many,
        Self::Binary,
    ];

    /// Returns the wire name of this type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Text => "text",
            Self::Html => "html",
            Self::Email => "email",
            Self::Selection => "selection",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Monetary => "monetary",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Many2one => "many2one",
            Self::One2many => "one2many",
            Self::Many2many => "many2many",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FormError::UnknownFieldType(s.to_string()))
    }
}

impl TryFrom<String> for FieldType {
    type Error = FormError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.as_str().to_string()
    }
}

/// A writable field of the target model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The field name.
    pub name: String,
    /// The field type, selecting the coercion rule.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must end up in the record.
    #[serde(default)]
    pub required: bool,
    /// Whether the field was made writable by configuration rather than
    /// being structurally writable.
    #[serde(default)]
    pub manual: bool,
}

impl FieldDefinition {
    /// Creates an optional, non-manual field definition.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            manual: false,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether this field was declared writable by configuration.
    #[must_use]
    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }
}

/// The writable fields of a target model, keyed by name.
///
/// Read-only once built, so a single registry can serve concurrent
/// extractions.
///
/// # Examples
///
/// ```
/// use webform_forms::fields::{FieldDefinition, FieldRegistry, FieldType};
///
/// let fields = FieldRegistry::new()
///     .with(FieldDefinition::new("email", FieldType::Email).required(true))
///     .with(FieldDefinition::new("age", FieldType::Integer));
///
/// assert!(fields.contains("email"));
/// assert_eq!(fields.required().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldDefinition>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Adds a definition (builder style), replacing any with the same name.
    #[must_use]
    pub fn with(mut self, field: FieldDefinition) -> Self {
        self.insert(field);
        self
    }

    /// Adds a definition, replacing any with the same name.
    pub fn insert(&mut self, field: FieldDefinition) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Returns `true` if `name` is a declared field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns all definitions, ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Returns the required definitions, ordered by name.
    pub fn required(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values().filter(|f| f.required)
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a JSON array of field definitions.
    ///
    /// ```
    /// use webform_forms::fields::{FieldRegistry, FieldType};
    ///
    /// let fields = FieldRegistry::from_json_str(
    ///     r#"[{"name": "resume", "type": "binary", "manual": true}]"#,
    /// ).unwrap();
    /// assert_eq!(fields.get("resume").unwrap().field_type, FieldType::Binary);
    /// ```
    pub fn from_json_str(json: &str) -> FormResult<Self> {
        let raw: Vec<RawDefinition> = serde_json::from_str(json).map_err(|e| {
            FormError::ConfigurationError(format!("Invalid field definitions: {e}"))
        })?;
        raw.into_iter()
            .map(|def| -> FormResult<FieldDefinition> {
                Ok(FieldDefinition {
                    field_type: def.field_type.parse()?,
                    name: def.name,
                    required: def.required,
                    manual: def.manual,
                })
            })
            .collect()
    }
}

/// A field definition whose type name has not been resolved yet.
#[derive(Deserialize)]
struct RawDefinition {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    manual: bool,
}

impl FromIterator<FieldDefinition> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for field in iter {
            registry.insert(field);
        }
        registry
    }
}

/// Locale parameters used by the date and datetime rules.
#[derive(Debug, Clone)]
pub struct CoercionOptions {
    /// `strftime` format for dates.
    pub date_format: String,
    /// `strftime` format for datetimes.
    pub datetime_format: String,
    /// The time zone submitted datetimes are expressed in.
    pub time_zone: FixedOffset,
}

impl Default for CoercionOptions {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            datetime_format: settings.datetime_format(),
            date_format: settings.date_format,
            time_zone: Utc.fix(),
        }
    }
}

impl CoercionOptions {
    /// Builds options from settings, resolving the configured time zone.
    pub fn from_settings(settings: &Settings) -> FormResult<Self> {
        Ok(Self {
            date_format: settings.date_format.clone(),
            datetime_format: settings.datetime_format(),
            time_zone: settings.time_zone_offset()?,
        })
    }
}

/// Why a raw value could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The value is outside the type's domain; carries a user-facing message.
    Invalid(String),
    /// The type has no rule for text input.
    Unsupported,
}

/// Coerces a raw submitted string into a value of the given field type.
///
/// # Examples
///
/// ```
/// use webform_forms::fields::{coerce_value, CoercionOptions, FieldType};
/// use webform_forms::value::Value;
///
/// let opts = CoercionOptions::default();
/// assert_eq!(coerce_value(FieldType::Integer, "42", &opts), Ok(Value::Int(42)));
/// assert!(coerce_value(FieldType::Integer, "forty", &opts).is_err());
/// ```
pub fn coerce_value(
    field_type: FieldType,
    raw: &str,
    opts: &CoercionOptions,
) -> Result<Value, CoercionError> {
    match field_type {
        FieldType::Char | FieldType::Text | FieldType::Email | FieldType::Selection => {
            Ok(Value::String(raw.to_string()))
        }

        FieldType::Html => Ok(Value::String(plaintext_to_html(raw))),

        FieldType::Boolean => Ok(Value::Bool(!raw.is_empty())),

        FieldType::Integer | FieldType::Many2one => {
            parse_integer(raw).map(Value::Int).map_err(CoercionError::Invalid)
        }

        FieldType::Float | FieldType::Monetary => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoercionError::Invalid("Enter a number.".to_string())),

        FieldType::Date => NaiveDate::parse_from_str(raw.trim(), &opts.date_format)
            .map(Value::Date)
            .map_err(|_| CoercionError::Invalid("Enter a valid date.".to_string())),

        FieldType::Datetime => {
            let local = NaiveDateTime::parse_from_str(raw.trim(), &opts.datetime_format)
                .map_err(|_| CoercionError::Invalid("Enter a valid date/time.".to_string()))?;
            opts.time_zone
                .from_local_datetime(&local)
                .single()
                .map(|dt| Value::DateTime(dt.naive_utc()))
                .ok_or_else(|| CoercionError::Invalid("Enter a valid date/time.".to_string()))
        }

        FieldType::One2many => parse_ids(raw).map(Value::Ids),

        FieldType::Many2many => parse_ids(raw).map(Value::ReplaceIds),

        FieldType::Binary => Err(CoercionError::Unsupported),
    }
}

/// Parses a decimal integer, ignoring surrounding whitespace.
pub(crate) fn parse_integer(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| "Enter a whole number.".to_string())
}

fn parse_ids(raw: &str) -> Result<Vec<i64>, CoercionError> {
    raw.split(',')
        .map(|id| id.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CoercionError::Invalid("Enter a comma-separated list of ids.".to_string()))
}
