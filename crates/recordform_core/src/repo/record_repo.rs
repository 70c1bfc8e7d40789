//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/replace/get/list/delete over the `records` collection.
//! - Own the connection for the store's whole lifetime.
//!
//! # Invariants
//! - `insert` never accepts a caller id; the engine assigns one that is never
//!   reused (`AUTOINCREMENT`).
//! - `replace` is a full overwrite that upserts at the given id.
//! - `delete` of an absent id succeeds.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::schema::{schema_version, SCHEMA_VERSION};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::record::{Record, RecordDraft, RecordId, RecordValidationError};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

const RECORDS_TABLE: &str = "records";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "email", "age"];

const RECORD_SELECT_SQL: &str = "SELECT id, name, email, age FROM records";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure classes surfaced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The collection could not be opened.
    StorageUnavailable,
    /// insert/replace/delete failed.
    Write,
    /// list/get failed.
    Read,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] DbError),
    #[error("write failed: {0}")]
    Write(#[source] rusqlite::Error),
    #[error("read failed: {0}")]
    Read(#[source] rusqlite::Error),
    #[error("invalid record: {0}")]
    Validation(#[from] RecordValidationError),
    #[error("invalid persisted record data: {0}")]
    InvalidData(String),
    #[error("connection schema version is {actual_version}, expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::StorageUnavailable(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => StoreErrorKind::StorageUnavailable,
            Self::Write(_) | Self::Validation(_) => StoreErrorKind::Write,
            Self::Read(_) | Self::InvalidData(_) => StoreErrorKind::Read,
        }
    }
}

/// Storage gateway over one key-value collection of records.
pub trait RecordStore {
    fn insert(&self, draft: &RecordDraft) -> StoreResult<RecordId>;
    fn replace(&self, record: &Record) -> StoreResult<()>;
    fn get(&self, id: RecordId) -> StoreResult<Option<Record>>;
    fn list_all(&self) -> StoreResult<Vec<Record>>;
    fn delete(&self, id: RecordId) -> StoreResult<()>;
}

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens (or creates) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path).map_err(StoreError::StorageUnavailable)?;
        Self::try_new(conn)
    }

    /// Opens a fresh, empty in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory().map_err(StoreError::StorageUnavailable)?;
        Self::try_new(conn)
    }

    /// Wraps an existing connection after checking its schema.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the
    ///   `records` layout is absent or incomplete.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordStore for SqliteRecordStore {
    fn insert(&self, draft: &RecordDraft) -> StoreResult<RecordId> {
        draft.validate()?;

        let result = self.conn.execute(
            "INSERT INTO records (name, email, age) VALUES (?1, ?2, ?3);",
            params![draft.name.as_str(), draft.email.as_str(), draft.age],
        );
        match result {
            Ok(_) => {
                let id = RecordId(self.conn.last_insert_rowid());
                debug!("event=record_insert module=repo status=ok id={id}");
                Ok(id)
            }
            Err(err) => {
                error!("event=record_insert module=repo status=error error={err}");
                Err(StoreError::Write(err))
            }
        }
    }

    fn replace(&self, record: &Record) -> StoreResult<()> {
        record.validate()?;

        let result = self.conn.execute(
            "INSERT INTO records (id, name, email, age) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                age = excluded.age;",
            params![
                record.id.get(),
                record.name.as_str(),
                record.email.as_str(),
                record.age
            ],
        );
        match result {
            Ok(_) => {
                debug!(
                    "event=record_replace module=repo status=ok id={}",
                    record.id
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=record_replace module=repo status=error id={} error={err}",
                    record.id
                );
                Err(StoreError::Write(err))
            }
        }
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        let row = self
            .conn
            .query_row(
                &format!("{RECORD_SELECT_SQL} WHERE id = ?1;"),
                [id.get()],
                read_raw_row,
            )
            .optional()
            .map_err(StoreError::Read)?;

        row.map(RawRecordRow::into_record).transpose()
    }

    fn list_all(&self) -> StoreResult<Vec<Record>> {
        let raw_rows = self.query_all().map_err(|err| {
            error!("event=record_list module=repo status=error error={err}");
            StoreError::Read(err)
        })?;

        let records = raw_rows
            .into_iter()
            .map(RawRecordRow::into_record)
            .collect::<StoreResult<Vec<_>>>()?;
        debug!(
            "event=record_list module=repo status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        match self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id.get()])
        {
            Ok(changed) => {
                debug!("event=record_delete module=repo status=ok id={id} changed={changed}");
                Ok(())
            }
            Err(err) => {
                error!("event=record_delete module=repo status=error id={id} error={err}");
                Err(StoreError::Write(err))
            }
        }
    }
}

impl SqliteRecordStore {
    fn query_all(&self) -> rusqlite::Result<Vec<RawRecordRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id ASC;"))?;
        let rows = stmt.query_map([], read_raw_row)?;
        rows.collect()
    }
}

/// Row as stored, before domain checks.
struct RawRecordRow {
    id: i64,
    name: String,
    email: String,
    age: i64,
}

impl RawRecordRow {
    fn into_record(self) -> StoreResult<Record> {
        let age = u32::try_from(self.age)
            .ok()
            .filter(|age| *age >= 1)
            .ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "invalid age `{}` in records.age for id {}",
                    self.age, self.id
                ))
            })?;

        let record = Record {
            id: RecordId(self.id),
            name: self.name,
            email: self.email,
            age,
        };
        record
            .validate()
            .map_err(|err| StoreError::InvalidData(format!("record {}: {err}", record.id)))?;
        Ok(record)
    }
}

fn read_raw_row(row: &Row<'_>) -> rusqlite::Result<RawRecordRow> {
    Ok(RawRecordRow {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        age: row.get("age")?,
    })
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let actual_version = schema_version(conn).map_err(StoreError::StorageUnavailable)?;
    let expected_version = SCHEMA_VERSION;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let columns = table_columns(conn, RECORDS_TABLE)
        .map_err(|err| StoreError::StorageUnavailable(err.into()))?;
    if columns.is_empty() {
        return Err(StoreError::MissingRequiredTable(RECORDS_TABLE));
    }
    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|existing| existing.as_str() == *column) {
            return Err(StoreError::MissingRequiredColumn {
                table: RECORDS_TABLE,
                column: *column,
            });
        }
    }
    Ok(())
}

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    names.collect()
}
