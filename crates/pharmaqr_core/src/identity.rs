//! Record identity generation.
//!
//! # Invariants
//! - Identifiers are random 128-bit UUIDv4 values; no counter is involved,
//!   so concurrent callers need no coordination.
//! - The canonical string form is lowercase hyphenated.

use crate::model::tablet::TabletId;
use uuid::Uuid;

/// Returns a fresh identifier for a new tablet record.
pub fn new_tablet_id() -> TabletId {
    Uuid::new_v4()
}

/// Parses a canonical id string, returning `None` for malformed input.
pub fn parse_tablet_id(value: &str) -> Option<TabletId> {
    Uuid::parse_str(value.trim()).ok()
}
