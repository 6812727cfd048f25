//! Provider CRUD operations.

use rusqlite::{OptionalExtension, params};

use super::models::{NewProvider, Provider, Record};
use super::{Database, map_write_error, query_records};
use crate::error::{DatabaseError, ServiceResult};

impl Database {
    /// Insert a new provider and return its assigned id
    pub fn insert_provider(&self, provider: &NewProvider) -> ServiceResult<i64> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO providers (provider_number, name, npi, address, phone, email, specialty)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                provider.provider_number,
                provider.name,
                provider.npi,
                provider.address,
                provider.phone,
                provider.email,
                provider.specialty,
            ],
        )
        .map_err(|e| {
            map_write_error(e, || {
                format!(
                    "Provider number '{}' or NPI '{}' already exists.",
                    provider.provider_number, provider.npi
                )
            })
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a provider by ID
    pub fn get_provider(&self, id: i64) -> ServiceResult<Option<Provider>> {
        self.find_provider("id", &id)
    }

    /// Get a provider by provider number (exact match)
    pub fn get_provider_by_number(&self, provider_number: &str) -> ServiceResult<Option<Provider>> {
        self.find_provider("provider_number", &provider_number)
    }

    /// Get a provider by National Provider Identifier (exact match)
    pub fn get_provider_by_npi(&self, npi: &str) -> ServiceResult<Option<Provider>> {
        self.find_provider("npi", &npi)
    }

    fn find_provider(
        &self,
        column: &'static str,
        value: &dyn rusqlite::ToSql,
    ) -> ServiceResult<Option<Provider>> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT {} FROM providers WHERE {} = ?1",
                Provider::COLUMNS,
                column
            ),
            [value],
            Provider::from_row,
        )
        .optional()
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// List all providers ordered by id
    pub fn list_providers(&self) -> ServiceResult<Vec<Provider>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!("SELECT {} FROM providers ORDER BY id", Provider::COLUMNS),
            [],
        )
    }

    /// Providers whose specialty equals `specialty`, ignoring case
    pub fn list_providers_by_specialty(&self, specialty: &str) -> ServiceResult<Vec<Provider>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!(
                "SELECT {} FROM providers WHERE fold_case(specialty) = ?1 ORDER BY id",
                Provider::COLUMNS
            ),
            params![specialty.to_lowercase()],
        )
    }

    /// Case-insensitive substring search over name, provider number, NPI,
    /// email and specialty
    pub fn search_providers(&self, term: &str) -> ServiceResult<Vec<Provider>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!(
                "SELECT {} FROM providers \
                 WHERE instr(fold_case(name), ?1) > 0 \
                    OR instr(fold_case(provider_number), ?1) > 0 \
                    OR instr(fold_case(npi), ?1) > 0 \
                    OR instr(fold_case(email), ?1) > 0 \
                    OR instr(fold_case(specialty), ?1) > 0 \
                 ORDER BY id",
                Provider::COLUMNS
            ),
            params![term.to_lowercase()],
        )
    }

    /// Check whether a provider number is already taken
    pub fn provider_number_exists(&self, provider_number: &str) -> ServiceResult<bool> {
        self.provider_exists("provider_number", provider_number)
    }

    /// Check whether an NPI is already registered
    pub fn npi_exists(&self, npi: &str) -> ServiceResult<bool> {
        self.provider_exists("npi", npi)
    }

    fn provider_exists(&self, column: &'static str, value: &str) -> ServiceResult<bool> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM providers WHERE {} = ?1)",
                column
            ),
            params![value],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// Write every mutable column of an existing provider. The provider
    /// number is immutable and left untouched.
    pub fn update_provider(&self, provider: &Provider) -> ServiceResult<bool> {
        let conn = self.lock()?;

        let rows = conn
            .execute(
                "UPDATE providers SET name = ?1, npi = ?2, address = ?3, phone = ?4, email = ?5, specialty = ?6 WHERE id = ?7",
                params![
                    provider.name,
                    provider.npi,
                    provider.address,
                    provider.phone,
                    provider.email,
                    provider.specialty,
                    provider.id,
                ],
            )
            .map_err(|e| {
                map_write_error(e, || format!("NPI '{}' already exists.", provider.npi))
            })?;

        Ok(rows > 0)
    }

    /// Delete a provider
    pub fn delete_provider(&self, id: i64) -> ServiceResult<bool> {
        let conn = self.lock()?;

        let rows = conn
            .execute("DELETE FROM providers WHERE id = ?1", params![id])
            .map_err(DatabaseError::Query)?;

        Ok(rows > 0)
    }
}
