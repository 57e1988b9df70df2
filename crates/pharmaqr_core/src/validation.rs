//! Raw form input validation.
//!
//! # Responsibility
//! - Check a raw field map against the required tablet schema.
//! - Convert `YYYY-MM-DD` strings into calendar dates.
//! - Default optional text fields to empty strings.
//!
//! # Invariants
//! - Pure transformation: no I/O, no logging, no identity assignment.
//! - Presence of every required key is checked before any date is parsed.
//! - Text values are kept exactly as submitted.

use crate::model::tablet::{TabletDraft, DATE_FORMAT};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw form input: field name to submitted string value.
pub type RawFields = HashMap<String, String>;

/// Required keys, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "name",
    "manufacturer",
    "batch_number",
    "mfg_date",
    "expiry_date",
    "composition",
    "dosage",
    "use_cases",
];

/// Optional keys; absent values default to an empty string.
pub const OPTIONAL_FIELDS: [&str; 3] = ["side_effects", "precautions", "storage_instructions"];

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Client input errors raised before any persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required key is absent or blank.
    MissingField(&'static str),
    /// A date field is not a real `YYYY-MM-DD` calendar date.
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) => *field,
            Self::InvalidDate { field, .. } => *field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field: '{field}'"),
            Self::InvalidDate { field, value } => write!(
                f,
                "invalid date `{value}` for field '{field}'; expected YYYY-MM-DD"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Validates raw input and returns a normalized draft.
///
/// # Errors
/// - `MissingField` naming the first absent or blank required key.
/// - `InvalidDate` when `mfg_date` or `expiry_date` does not parse.
pub fn validate_fields(fields: &RawFields) -> Result<TabletDraft, ValidationError> {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|key| fields.get(**key).map_or(true, |value| value.trim().is_empty()))
    {
        return Err(ValidationError::MissingField(*missing));
    }

    let mfg_date = parse_date("mfg_date", required(fields, "mfg_date"))?;
    let expiry_date = parse_date("expiry_date", required(fields, "expiry_date"))?;

    Ok(TabletDraft {
        name: required(fields, "name").to_string(),
        manufacturer: required(fields, "manufacturer").to_string(),
        batch_number: required(fields, "batch_number").to_string(),
        mfg_date,
        expiry_date,
        composition: required(fields, "composition").to_string(),
        dosage: required(fields, "dosage").to_string(),
        use_cases: required(fields, "use_cases").to_string(),
        side_effects: optional(fields, "side_effects"),
        precautions: optional(fields, "precautions"),
        storage_instructions: optional(fields, "storage_instructions"),
    })
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if !ISO_DATE_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

// Presence is checked up front, so a missing key here reads as empty.
fn required<'a>(fields: &'a RawFields, key: &str) -> &'a str {
    fields.get(key).map(String::as_str).unwrap_or_default()
}

fn optional(fields: &RawFields, key: &str) -> String {
    fields.get(key).cloned().unwrap_or_default()
}
