//! Record store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the keyed put/get contract for tablet records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Only `put` and `get` exist; records are never updated or deleted.
//! - A missing id is a semantic `NotFound`, distinct from storage failures.

pub mod tablet_repo;
