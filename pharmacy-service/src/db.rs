//! Database module for SQLite operations.
//!
//! This module provides the `Database` struct and all record store operations
//! organized into submodules by entity.

mod members;
mod migrations;
pub mod models;
mod providers;
mod search;

pub use models::{Member, NewMember, NewProvider, Provider, Record};

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, Params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::{DatabaseError, ServiceError, ServiceResult};

/// Database manager for SQLite operations
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: &Path) -> ServiceResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ServiceError::Database(DatabaseError::Connection(
                    rusqlite::Error::ToSqlConversionFailure(Box::new(e)),
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(DatabaseError::Connection)?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(DatabaseError::Query)?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub fn open_in_memory() -> ServiceResult<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::Connection)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(DatabaseError::Query)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> ServiceResult<Self> {
        register_functions(&conn)?;
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::Poisoned)
    }
}

/// `fold_case(text)`: full Unicode lowercasing. SQLite's built-in `lower()`
/// and `NOCASE` only fold ASCII letters. Indexes and every case-insensitive
/// comparison depend on it, so it must be registered before migrations run.
fn register_functions(conn: &Connection) -> Result<(), DatabaseError> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
    .map_err(DatabaseError::Connection)
}

/// Run a query and collect every row as a record
fn query_records<R: Record, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> ServiceResult<Vec<R>> {
    let mut stmt = conn.prepare(sql).map_err(DatabaseError::Query)?;
    let rows = stmt
        .query_map(params, R::from_row)
        .map_err(DatabaseError::Query)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(DatabaseError::Query)?);
    }

    Ok(records)
}

/// Map a failed write to `Conflict` when a UNIQUE constraint rejected it.
pub(crate) fn map_write_error(
    error: rusqlite::Error,
    conflict: impl FnOnce() -> String,
) -> ServiceError {
    match &error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ServiceError::conflict(conflict())
        }
        _ => DatabaseError::Query(error).into(),
    }
}
