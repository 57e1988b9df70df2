//! Tablet use-case service: create, fetch, generate code, resolve.
//!
//! # Responsibility
//! - Run the validate -> identify -> persist pipeline for new records.
//! - Build info URLs and encode them as scannable codes.
//! - Map component errors into one structured error with a stable kind.
//!
//! # Invariants
//! - Validation completes before any storage call (no partial writes).
//! - Encoding failures never touch stored state.
//! - Service logs carry ids and error kinds only, never record text.

use crate::codegen::qr::{self, CodeEncoderOptions, EncodeError, EncodedCode};
use crate::identity::new_tablet_id;
use crate::model::tablet::{TabletFields, TabletId, TabletRecord};
use crate::presentation::{present, DisplayModel};
use crate::repo::tablet_repo::{RepoError, TabletRepository};
use crate::validation::{validate_fields, RawFields, ValidationError};
use chrono::{NaiveDate, Utc};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TabletResult<T> = Result<T, TabletError>;

/// Structured failure of a tablet use case.
#[derive(Debug)]
pub enum TabletError {
    Validation(ValidationError),
    NotFound(TabletId),
    Encoding(EncodeError),
    Storage(RepoError),
}

impl TabletError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingField(_)) => "missing_field",
            Self::Validation(ValidationError::InvalidDate { .. }) => "invalid_date",
            Self::NotFound(_) => "not_found",
            Self::Encoding(_) => "encoding",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether the caller supplied bad input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl Display for TabletError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "tablet not found: {id}"),
            Self::Encoding(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TabletError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Encoding(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ValidationError> for TabletError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EncodeError> for TabletError {
    fn from(value: EncodeError) -> Self {
        Self::Encoding(value)
    }
}

impl From<RepoError> for TabletError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Scannable code for one record plus the record it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    /// URL encoded in the symbol.
    pub target_url: String,
    pub code: EncodedCode,
    pub tablet: TabletFields,
}

/// Record and URL a code is about to be rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTarget {
    pub target_url: String,
    pub tablet: TabletFields,
}

/// Use-case service over any tablet store.
pub struct TabletService<R: TabletRepository> {
    repo: R,
    encoder_options: CodeEncoderOptions,
}

impl<R: TabletRepository> TabletService<R> {
    /// Creates a service using default encoder options.
    pub fn new(repo: R) -> Self {
        Self::with_encoder_options(repo, CodeEncoderOptions::default())
    }

    pub fn with_encoder_options(repo: R, encoder_options: CodeEncoderOptions) -> Self {
        Self {
            repo,
            encoder_options,
        }
    }

    /// Validates raw input, assigns an id and persists the new record.
    ///
    /// # Contract
    /// - Returns the new id only after the record is committed.
    /// - Inverted `mfg_date`/`expiry_date` ranges are accepted and logged.
    pub fn create(&self, fields: &RawFields) -> TabletResult<TabletId> {
        let draft = validate_fields(fields).map_err(|err| {
            let field = err.field();
            let err = TabletError::from(err);
            info!(
                "event=tablet_create module=service status=rejected error_code={} field={field}",
                err.kind()
            );
            err
        })?;

        let id = new_tablet_id();
        if draft.has_inverted_dates() {
            warn!("event=tablet_create module=service status=warn tablet_id={id} reason=expiry_before_mfg");
        }

        let record = TabletRecord::from_draft(id, draft, Utc::now().timestamp_millis());
        self.repo.put(&record).map_err(|err| {
            let error_code = match &err {
                RepoError::Db(db_err) if db_err.is_unique_violation() => "id_collision",
                _ => "storage",
            };
            error!(
                "event=tablet_create module=service status=error tablet_id={id} error_code={error_code} error={err}"
            );
            TabletError::from(err)
        })?;

        info!("event=tablet_create module=service status=ok tablet_id={id}");
        Ok(id)
    }

    /// Loads one record by id.
    pub fn fetch(&self, id: TabletId) -> TabletResult<TabletRecord> {
        Ok(self.repo.get(id)?)
    }

    /// Encodes `<base_url>/info/<id>` for an existing record.
    ///
    /// # Contract
    /// - Fails with `NotFound` before encoding when the id is unknown.
    /// - A trailing `/` on `base_url` is ignored.
    pub fn generate_code(&self, id: TabletId, base_url: &str) -> TabletResult<GeneratedCode> {
        let target = self.code_target(id, base_url)?;
        render_code(target, &self.encoder_options)
    }

    /// Store half of [`Self::generate_code`]: loads the record and builds its URL.
    pub fn code_target(&self, id: TabletId, base_url: &str) -> TabletResult<CodeTarget> {
        let record = self.fetch(id)?;
        Ok(CodeTarget {
            target_url: info_url(base_url, id),
            tablet: record.fields(),
        })
    }

    /// Returns the display model of one record as seen on `as_of`.
    pub fn resolve(&self, id: TabletId, as_of: NaiveDate) -> TabletResult<DisplayModel> {
        let record = self.fetch(id)?;
        Ok(present(&record, as_of))
    }

    /// Number of stored records.
    pub fn count(&self) -> TabletResult<u64> {
        Ok(self.repo.count()?)
    }
}

/// Builds the public info-page URL for a record.
pub fn info_url(base_url: &str, id: TabletId) -> String {
    format!("{}/info/{id}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::{info_url, TabletError};
    use crate::repo::tablet_repo::RepoError;
    use uuid::Uuid;

    #[test]
    fn info_url_strips_trailing_slashes() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(
            info_url("http://10.0.0.5:5000/", id),
            "http://10.0.0.5:5000/info/11111111-2222-4333-8444-555555555555"
        );
        assert_eq!(
            info_url("https://labels.example", id),
            "https://labels.example/info/11111111-2222-4333-8444-555555555555"
        );
    }

    #[test]
    fn repo_not_found_maps_to_not_found_kind() {
        let id = Uuid::new_v4();
        let err = TabletError::from(RepoError::NotFound(id));
        assert!(matches!(err, TabletError::NotFound(found) if found == id));
        assert_eq!(err.kind(), "not_found");

        let storage = TabletError::from(RepoError::InvalidData("bad".to_string()));
        assert_eq!(storage.kind(), "storage");
        assert!(!storage.is_client_error());
    }
}

/// Encodes a resolved target. Touches no storage.
pub fn render_code(target: CodeTarget, options: &CodeEncoderOptions) -> TabletResult<GeneratedCode> {
    let CodeTarget { target_url, tablet } = target;

    let code = qr::encode_with(&target_url, options).map_err(|err| {
        error!(
            "event=code_generate module=service status=error tablet_id={} error={err}",
            tablet.id
        );
        TabletError::from(err)
    })?;

    info!(
        "event=code_generate module=service status=ok tablet_id={} size_px={}",
        tablet.id, code.size_px
    );
    Ok(GeneratedCode {
        target_url,
        code,
        tablet,
    })
}
