//! Display shaping for stored tablet records.
//!
//! # Responsibility
//! - Derive expiry status from a record and a reference date.
//! - Hand renderers a flat, read-only view that needs no date arithmetic.
//!
//! # Invariants
//! - `present` is a pure function of its inputs.
//! - Renderers branch only on `status`, never on raw dates.

use crate::model::tablet::{TabletRecord, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Records expiring within this many days are flagged as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

const DISPLAY_DATE_FORMAT: &str = "%d %B %Y";

/// Expiry state relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    Ok,
}

impl ExpiryStatus {
    /// Classifies a signed day distance to expiry.
    pub fn from_days(days_to_expiry: i64) -> Self {
        if days_to_expiry < 0 {
            Self::Expired
        } else if days_to_expiry < EXPIRY_WARNING_DAYS {
            Self::ExpiringSoon
        } else {
            Self::Ok
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ExpiringSoon => "expiring_soon",
            Self::Ok => "ok",
        }
    }
}

/// Read-only view of one record for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayModel {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub batch_number: String,
    pub mfg_date: String,
    pub expiry_date: String,
    /// Long form such as `01 January 2025`.
    pub mfg_date_display: String,
    pub expiry_date_display: String,
    pub composition: String,
    pub dosage: String,
    pub use_cases: String,
    pub side_effects: String,
    pub precautions: String,
    pub storage_instructions: String,
    pub as_of: String,
    pub days_to_expiry: i64,
    pub status: ExpiryStatus,
}

/// Optional text block shown only when non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySection<'a> {
    pub title: &'static str,
    pub body: &'a str,
}

impl DisplayModel {
    /// Non-empty optional sections in display order.
    pub fn sections(&self) -> Vec<DisplaySection<'_>> {
        [
            ("Side Effects", self.side_effects.as_str()),
            ("Precautions", self.precautions.as_str()),
            ("Storage Instructions", self.storage_instructions.as_str()),
        ]
        .into_iter()
        .filter(|(_, body)| !body.trim().is_empty())
        .map(|(title, body)| DisplaySection { title, body })
        .collect()
    }
}

/// Builds the display model of `record` as seen on `as_of`.
pub fn present(record: &TabletRecord, as_of: NaiveDate) -> DisplayModel {
    let days_to_expiry = (record.expiry_date - as_of).num_days();

    DisplayModel {
        id: record.id.to_string(),
        name: record.name.clone(),
        manufacturer: record.manufacturer.clone(),
        batch_number: record.batch_number.clone(),
        mfg_date: record.mfg_date.format(DATE_FORMAT).to_string(),
        expiry_date: record.expiry_date.format(DATE_FORMAT).to_string(),
        mfg_date_display: record.mfg_date.format(DISPLAY_DATE_FORMAT).to_string(),
        expiry_date_display: record.expiry_date.format(DISPLAY_DATE_FORMAT).to_string(),
        composition: record.composition.clone(),
        dosage: record.dosage.clone(),
        use_cases: record.use_cases.clone(),
        side_effects: record.side_effects.clone(),
        precautions: record.precautions.clone(),
        storage_instructions: record.storage_instructions.clone(),
        as_of: as_of.format(DATE_FORMAT).to_string(),
        days_to_expiry,
        status: ExpiryStatus::from_days(days_to_expiry),
    }
}
