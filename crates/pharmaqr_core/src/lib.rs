//! Core domain logic for PharmaQR.
//! Validation, storage and code generation for pharmaceutical batch records.

pub mod codegen;
pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod service;
pub mod validation;

pub use codegen::qr::{
    encode, encode_with, CodeEncoderOptions, EncodeError, EncodedCode, ErrorCorrection,
    PNG_MIME_TYPE,
};
pub use identity::{new_tablet_id, parse_tablet_id};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::tablet::{TabletDraft, TabletFields, TabletId, TabletRecord};
pub use presentation::{present, DisplayModel, DisplaySection, ExpiryStatus};
pub use repo::tablet_repo::{RepoError, RepoResult, SqliteTabletRepository, TabletRepository};
pub use service::tablet_service::{
    info_url, render_code, CodeTarget, GeneratedCode, TabletError, TabletResult, TabletService,
};
pub use validation::{
    validate_fields, RawFields, ValidationError, OPTIONAL_FIELDS, REQUIRED_FIELDS,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
