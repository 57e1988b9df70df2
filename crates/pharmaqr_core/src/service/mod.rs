//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, identity, storage, encoding and presentation.
//! - Keep HTTP and CLI layers decoupled from storage details.

pub mod tablet_service;
