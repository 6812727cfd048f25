//! Database schema migrations.
//!
//! This module contains all database migrations and schema setup.

use rusqlite::Connection;

use crate::error::{DatabaseError, ServiceResult};

/// Run all database migrations.
///
/// This function is called during database initialization to ensure
/// the schema is up to date.
pub(super) fn run_migrations(conn: &Connection) -> ServiceResult<()> {
    // Initial schema setup
    conn.execute_batch(
        r#"
        -- Members table
        CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_number TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            dob TEXT NOT NULL,
            gender TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_members_last_name ON members(fold_case(last_name));
        CREATE INDEX IF NOT EXISTS idx_members_dob ON members(dob);
        CREATE INDEX IF NOT EXISTS idx_members_gender ON members(fold_case(gender));

        -- Providers table
        CREATE TABLE IF NOT EXISTS providers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            provider_number TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            npi TEXT NOT NULL UNIQUE,
            address TEXT NOT NULL DEFAULT '',
            phone TEXT NOT NULL DEFAULT '',
            email TEXT NOT NULL DEFAULT '',
            specialty TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_providers_name ON providers(fold_case(name));
        CREATE INDEX IF NOT EXISTS idx_providers_specialty ON providers(fold_case(specialty));
    "#,
    )
    .map_err(|e| DatabaseError::Migration {
        message: e.to_string(),
    })?;

    Ok(())
}
