//! Database model structs.
//!
//! This module contains the data structures for database records.

use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Type;
use serde::{Deserialize, Serialize};

/// Storage format of date-only columns. ISO dates compare correctly as text.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A table-backed record the generic query executor can load.
pub trait Record: Sized {
    /// Table holding the records
    const TABLE: &'static str;

    /// Column list in the order `from_row` reads it
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error>;
}

/// Member record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub member_number: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// Member fields supplied on insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub member_number: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Record for Member {
    const TABLE: &'static str = "members";
    const COLUMNS: &'static str =
        "id, member_number, first_name, last_name, dob, gender, address, phone, email";

    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        let dob_str: String = row.get(4)?;

        Ok(Self {
            id: row.get(0)?,
            member_number: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            dob: parse_date(4, &dob_str)?,
            gender: row.get(5)?,
            address: row.get(6)?,
            phone: row.get(7)?,
            email: row.get(8)?,
        })
    }
}

/// Provider record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub provider_number: String,
    pub name: String,
    pub npi: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
}

/// Provider fields supplied on insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProvider {
    pub provider_number: String,
    pub name: String,
    pub npi: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
}

impl Record for Provider {
    const TABLE: &'static str = "providers";
    const COLUMNS: &'static str = "id, provider_number, name, npi, address, phone, email, specialty";

    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            provider_number: row.get(1)?,
            name: row.get(2)?,
            npi: row.get(3)?,
            address: row.get(4)?,
            phone: row.get(5)?,
            email: row.get(6)?,
            specialty: row.get(7)?,
        })
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(index: usize, value: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}
