//! Settings for the form extraction engine.
//!
//! [`Settings`] holds every knob the engine reads. Callers build one (usually
//! through [`settings_loader`](crate::settings_loader)) and pass it, or values
//! derived from it, explicitly into each extraction call.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// The complete set of engine settings.
///
/// # Examples
///
/// ```
/// use webform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(!settings.website_form_enable_metadata);
/// assert_eq!(settings.date_format, "%m/%d/%Y");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or filter directive (e.g. "info", "webform_forms=debug").
    pub log_level: String,

    // ── Submission handling ──────────────────────────────────────────

    /// Whether client request metadata is recorded with each submission.
    pub website_form_enable_metadata: bool,
    /// Whether a missing required field fails a submission on its own.
    ///
    /// When `false`, missing required fields are only reported alongside at
    /// least one coercion failure.
    pub strict_required_fields: bool,

    // ── Localization ─────────────────────────────────────────────────

    /// `strftime` format used to parse submitted dates.
    pub date_format: String,
    /// `strftime` format used to parse the time part of submitted datetimes.
    pub time_format: String,
    /// The time zone submitted datetimes are expressed in ("UTC" or `±HH:MM`).
    pub time_zone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            website_form_enable_metadata: false,
            strict_required_fields: true,
            date_format: "%m/%d/%Y".to_string(),
            time_format: "%H:%M:%S".to_string(),
            time_zone: "UTC".to_string(),
        }
    }
}

impl Settings {
    /// Returns the format used to parse submitted datetimes.
    pub fn datetime_format(&self) -> String {
        format!("{} {}", self.date_format, self.time_format)
    }

    /// Resolves [`time_zone`](Self::time_zone) into a fixed UTC offset.
    pub fn time_zone_offset(&self) -> Result<FixedOffset, FormError> {
        parse_time_zone(&self.time_zone)
    }
}

/// Parses "UTC", "Z", or a `±HH:MM` / `±HHMM` offset.
///
/// # Examples
///
/// ```
/// use webform_core::settings::parse_time_zone;
///
/// assert_eq!(parse_time_zone("UTC").unwrap().local_minus_utc(), 0);
/// assert_eq!(parse_time_zone("+05:30").unwrap().local_minus_utc(), 19_800);
/// assert_eq!(parse_time_zone("-0800").unwrap().local_minus_utc(), -28_800);
/// assert!(parse_time_zone("Mars/Olympus").is_err());
/// ```
pub fn parse_time_zone(tz: &str) -> Result<FixedOffset, FormError> {
    let invalid = || FormError::ConfigurationError(format!("Invalid time zone '{tz}'"));

    let tz = tz.trim();
    if tz.eq_ignore_ascii_case("utc") || tz == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match tz.as_bytes().first() {
        Some(b'+') => (1, &tz[1..]),
        Some(b'-') => (-1, &tz[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert!(!s.website_form_enable_metadata);
        assert!(s.strict_required_fields);
        assert_eq!(s.time_format, "%H:%M:%S");
        assert_eq!(s.time_zone, "UTC");
    }

    #[test]
    fn test_datetime_format() {
        let s = Settings::default();
        assert_eq!(s.datetime_format(), "%m/%d/%Y %H:%M:%S");
    }

    #[test]
    fn test_time_zone_offset() {
        let mut s = Settings::default();
        assert_eq!(s.time_zone_offset().unwrap().local_minus_utc(), 0);
        s.time_zone = "+02:00".to_string();
        assert_eq!(s.time_zone_offset().unwrap().local_minus_utc(), 7200);
    }

    #[test]
    fn test_parse_time_zone_rejects_garbage() {
        assert!(parse_time_zone("").is_err());
        assert!(parse_time_zone("+5").is_err());
        assert!(parse_time_zone("+05:75").is_err());
        assert!(parse_time_zone("+99:00").is_err());
        assert!(parse_time_zone("Europe/Paris").is_err());
    }
}
