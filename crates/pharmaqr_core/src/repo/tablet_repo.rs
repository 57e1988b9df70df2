//! Tablet record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist validated records keyed by id.
//! - Load records back with calendar dates restored.
//!
//! # Invariants
//! - `get(put(r))` returns a value equal to `r`.
//! - Read paths reject corrupt persisted rows instead of masking them.
//! - A successful `put` is committed before it returns.

use crate::db::DbError;
use crate::model::tablet::{TabletId, TabletRecord, DATE_FORMAT};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TABLET_SELECT_SQL: &str = "SELECT
    id,
    name,
    manufacturer,
    batch_number,
    mfg_date,
    expiry_date,
    composition,
    dosage,
    use_cases,
    side_effects,
    precautions,
    storage_instructions,
    created_at
FROM tablets";

pub type RepoResult<T> = Result<T, RepoError>;

/// Record store error.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying storage failure, including primary key collisions.
    Db(DbError),
    NotFound(TabletId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "tablet not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tablet data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed, append-only store of tablet records.
pub trait TabletRepository {
    fn put(&self, record: &TabletRecord) -> RepoResult<TabletId>;
    fn get(&self, id: TabletId) -> RepoResult<TabletRecord>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed tablet store borrowing an open connection.
pub struct SqliteTabletRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTabletRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TabletRepository for SqliteTabletRepository<'_> {
    fn put(&self, record: &TabletRecord) -> RepoResult<TabletId> {
        self.conn.execute(
            "INSERT INTO tablets (
                id,
                name,
                manufacturer,
                batch_number,
                mfg_date,
                expiry_date,
                composition,
                dosage,
                use_cases,
                side_effects,
                precautions,
                storage_instructions,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                record.id.to_string(),
                record.name.as_str(),
                record.manufacturer.as_str(),
                record.batch_number.as_str(),
                date_to_db(record.mfg_date),
                date_to_db(record.expiry_date),
                record.composition.as_str(),
                record.dosage.as_str(),
                record.use_cases.as_str(),
                record.side_effects.as_str(),
                record.precautions.as_str(),
                record.storage_instructions.as_str(),
                record.created_at,
            ],
        )?;

        Ok(record.id)
    }

    fn get(&self, id: TabletId) -> RepoResult<TabletRecord> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TABLET_SELECT_SQL} WHERE id = ?1;"))?;

        match stmt.query_row([id.to_string()], read_raw_row).optional()? {
            Some(raw) => parse_tablet_row(raw),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tablets;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

struct RawTabletRow {
    id: String,
    name: String,
    manufacturer: String,
    batch_number: String,
    mfg_date: String,
    expiry_date: String,
    composition: String,
    dosage: String,
    use_cases: String,
    side_effects: String,
    precautions: String,
    storage_instructions: String,
    created_at: i64,
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawTabletRow> {
    Ok(RawTabletRow {
        id: row.get("id")?,
        name: row.get("name")?,
        manufacturer: row.get("manufacturer")?,
        batch_number: row.get("batch_number")?,
        mfg_date: row.get("mfg_date")?,
        expiry_date: row.get("expiry_date")?,
        composition: row.get("composition")?,
        dosage: row.get("dosage")?,
        use_cases: row.get("use_cases")?,
        side_effects: row.get("side_effects")?,
        precautions: row.get("precautions")?,
        storage_instructions: row.get("storage_instructions")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_tablet_row(raw: RawTabletRow) -> RepoResult<TabletRecord> {
    let id = Uuid::parse_str(&raw.id).map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{}` in tablets.id", raw.id))
    })?;

    Ok(TabletRecord {
        id,
        mfg_date: parse_db_date(&raw.mfg_date, "mfg_date")?,
        expiry_date: parse_db_date(&raw.expiry_date, "expiry_date")?,
        name: raw.name,
        manufacturer: raw.manufacturer,
        batch_number: raw.batch_number,
        composition: raw.composition,
        dosage: raw.dosage,
        use_cases: raw.use_cases,
        side_effects: raw.side_effects,
        precautions: raw.precautions,
        storage_instructions: raw.storage_instructions,
        created_at: raw.created_at,
    })
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_db_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{value}` in tablets.{column}"))
    })
}
