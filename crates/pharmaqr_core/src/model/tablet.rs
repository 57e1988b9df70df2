//! Tablet batch record model.
//!
//! # Responsibility
//! - Define the validated draft produced from raw form input.
//! - Define the persisted record that owns identity and creation time.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused for another record.
//! - Dates are calendar dates internally; `YYYY-MM-DD` is a wire concern only.
//! - Optional text fields are empty strings, never absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one tablet record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TabletId = Uuid;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalized record content, validated but not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabletDraft {
    pub name: String,
    pub manufacturer: String,
    pub batch_number: String,
    pub mfg_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub composition: String,
    pub dosage: String,
    pub use_cases: String,
    pub side_effects: String,
    pub precautions: String,
    pub storage_instructions: String,
}

impl TabletDraft {
    /// Returns whether the expiry date precedes the manufacturing date.
    ///
    /// Inverted ranges are accepted; callers may use this to flag them.
    pub fn has_inverted_dates(&self) -> bool {
        self.expiry_date < self.mfg_date
    }
}

/// Persisted tablet record.
///
/// Serializes with ISO dates and `created_at` in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletRecord {
    pub id: TabletId,
    pub name: String,
    pub manufacturer: String,
    pub batch_number: String,
    pub mfg_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub composition: String,
    pub dosage: String,
    pub use_cases: String,
    pub side_effects: String,
    pub precautions: String,
    pub storage_instructions: String,
    /// Unix epoch milliseconds (UTC) of the persistence call.
    pub created_at: i64,
}

impl TabletRecord {
    /// Binds a validated draft to its identity and creation time.
    pub fn from_draft(id: TabletId, draft: TabletDraft, created_at: i64) -> Self {
        Self {
            id,
            name: draft.name,
            manufacturer: draft.manufacturer,
            batch_number: draft.batch_number,
            mfg_date: draft.mfg_date,
            expiry_date: draft.expiry_date,
            composition: draft.composition,
            dosage: draft.dosage,
            use_cases: draft.use_cases,
            side_effects: draft.side_effects,
            precautions: draft.precautions,
            storage_instructions: draft.storage_instructions,
            created_at,
        }
    }

    /// Returns the public field view of this record.
    pub fn fields(&self) -> TabletFields {
        TabletFields {
            id: self.id.to_string(),
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            batch_number: self.batch_number.clone(),
            mfg_date: self.mfg_date.format(DATE_FORMAT).to_string(),
            expiry_date: self.expiry_date.format(DATE_FORMAT).to_string(),
            composition: self.composition.clone(),
            dosage: self.dosage.clone(),
            use_cases: self.use_cases.clone(),
            side_effects: self.side_effects.clone(),
            precautions: self.precautions.clone(),
            storage_instructions: self.storage_instructions.clone(),
        }
    }
}

/// Flat string view of a record, as returned by the fetch API.
///
/// Does not expose `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletFields {
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub batch_number: String,
    pub mfg_date: String,
    pub expiry_date: String,
    pub composition: String,
    pub dosage: String,
    pub use_cases: String,
    pub side_effects: String,
    pub precautions: String,
    pub storage_instructions: String,
}
