//! Coerced record values.
//!
//! A [`Value`] is what a submitted string (or file) becomes once its target
//! field's type has been applied. Values are handed to the caller, which
//! writes them to the target model.

use std::fmt;

/// A coerced value ready to be written to a record field.
///
/// # Examples
///
/// ```
/// use webform_forms::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
/// assert_eq!(v.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    /// No value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer (also used for many2one record ids).
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A date without time.
    Date(chrono::NaiveDate),
    /// A date and time, normalized to UTC.
    DateTime(chrono::NaiveDateTime),
    /// File content, base64-encoded.
    Binary(String),
    /// Record ids to link to a one2many field.
    Ids(Vec<i64>),
    /// Record ids that replace the whole linked set of a many2many field.
    ReplaceIds(Vec<i64>),
}

impl Value {
    /// Returns the integer value, if this is an `Int`.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string content of a `String` or `Binary` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Binary(s) => Some(s),
            _ => None,
        }
    }
}

fn write_ids(f: &mut fmt::Formatter<'_>, ids: &[i64]) -> fmt::Result {
    write!(f, "[")?;
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{id}")?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Date(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Binary(b) => write!(f, "<{} base64 chars>", b.len()),
            Self::Ids(ids) => write_ids(f, ids),
            Self::ReplaceIds(ids) => {
                write!(f, "replace ")?;
                write_ids(f, ids)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Ids(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::ReplaceIds(vec![3]).to_string(), "replace [3]");
        assert_eq!(Value::Binary("aGk=".into()).to_string(), "<4 base64 chars>");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::from("x").as_int(), None);
        assert_eq!(Value::Binary("aGk=".into()).as_str(), Some("aGk="));
        assert_eq!(Value::Float(1.5).as_str(), None);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(Value::Int(42)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Int", "value": 42}));
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, Value::Int(42));
    }
}
