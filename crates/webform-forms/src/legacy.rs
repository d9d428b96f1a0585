//! Per-model compatibility carve-outs.
//!
//! Some models accept a fixed list of numeric fields from their web forms that
//! are not part of their writable field registry. Those names skip the normal
//! lookup and are always written to the record as integers. The table is
//! closed; removing an entry removes the carve-out and nothing else.

/// Model name to the numeric fields it accepts outside its registry.
pub const LEGACY_NUMERIC_FIELDS: &[(&str, &[&str])] = &[(
    "helpdesk.ticket",
    &["x_project", "x_family", "x_sub_group"],
)];

/// Returns the carve-out field names for `model`, or an empty slice.
///
/// # Examples
///
/// ```
/// use webform_forms::legacy::legacy_numeric_fields;
///
/// assert_eq!(legacy_numeric_fields("helpdesk.ticket").len(), 3);
/// assert!(legacy_numeric_fields("crm.lead").is_empty());
/// ```
pub fn legacy_numeric_fields(model: &str) -> &'static [&'static str] {
    LEGACY_NUMERIC_FIELDS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

/// Returns `true` if `field` is a carve-out numeric field of `model`.
pub fn is_legacy_numeric_field(model: &str, field: &str) -> bool {
    legacy_numeric_fields(model).contains(&field)
}
