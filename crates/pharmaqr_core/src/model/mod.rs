//! Domain model for pharmaceutical batch records.
//!
//! # Responsibility
//! - Define the canonical record persisted and served by core.
//! - Keep wire naming stable for HTTP and storage callers.
//!
//! # Invariants
//! - Every record is identified by a stable `TabletId`.
//! - Records are immutable once persisted; there is no update or delete path.

pub mod tablet;
