//! Member CRUD operations.
//!
//! Insert, lookup, update and delete for member records, plus the
//! simple lookups (by number, by gender, free-text search).

use rusqlite::{OptionalExtension, params};

use super::models::{Member, NewMember, Record, format_date};
use super::{Database, map_write_error, query_records};
use crate::error::{DatabaseError, ServiceResult};

impl Database {
    /// Insert a new member and return its assigned id
    pub fn insert_member(&self, member: &NewMember) -> ServiceResult<i64> {
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO members (member_number, first_name, last_name, dob, gender, address, phone, email)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                member.member_number,
                member.first_name,
                member.last_name,
                format_date(member.dob),
                member.gender,
                member.address,
                member.phone,
                member.email,
            ],
        )
        .map_err(|e| {
            map_write_error(e, || {
                format!("Member number '{}' already exists.", member.member_number)
            })
        })?;

        Ok(conn.last_insert_rowid())
    }

    /// Get a member by ID
    pub fn get_member(&self, id: i64) -> ServiceResult<Option<Member>> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {} FROM members WHERE id = ?1", Member::COLUMNS),
            params![id],
            Member::from_row,
        )
        .optional()
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// Get a member by member number (exact match)
    pub fn get_member_by_number(&self, member_number: &str) -> ServiceResult<Option<Member>> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT {} FROM members WHERE member_number = ?1",
                Member::COLUMNS
            ),
            params![member_number],
            Member::from_row,
        )
        .optional()
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// List all members ordered by id
    pub fn list_members(&self) -> ServiceResult<Vec<Member>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!("SELECT {} FROM members ORDER BY id", Member::COLUMNS),
            [],
        )
    }

    /// Members whose gender equals `gender`, ignoring case
    pub fn list_members_by_gender(&self, gender: &str) -> ServiceResult<Vec<Member>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!(
                "SELECT {} FROM members WHERE fold_case(gender) = ?1 ORDER BY id",
                Member::COLUMNS
            ),
            params![gender.to_lowercase()],
        )
    }

    /// Case-insensitive substring search over first name, last name,
    /// member number and email
    pub fn search_members(&self, term: &str) -> ServiceResult<Vec<Member>> {
        let conn = self.lock()?;

        query_records(
            &conn,
            &format!(
                "SELECT {} FROM members \
                 WHERE instr(fold_case(first_name), ?1) > 0 \
                    OR instr(fold_case(last_name), ?1) > 0 \
                    OR instr(fold_case(member_number), ?1) > 0 \
                    OR instr(fold_case(email), ?1) > 0 \
                 ORDER BY id",
                Member::COLUMNS
            ),
            params![term.to_lowercase()],
        )
    }

    /// Check whether a member number is already taken
    pub fn member_number_exists(&self, member_number: &str) -> ServiceResult<bool> {
        let conn = self.lock()?;

        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM members WHERE member_number = ?1)",
            params![member_number],
            |row| row.get(0),
        )
        .map_err(DatabaseError::Query)
        .map_err(Into::into)
    }

    /// Total number of stored members
    pub fn count_members(&self) -> ServiceResult<u64> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))
            .map_err(DatabaseError::Query)?;

        Ok(count as u64)
    }

    /// Write every mutable column of an existing member. The member number
    /// is immutable and left untouched.
    pub fn update_member(&self, member: &Member) -> ServiceResult<bool> {
        let conn = self.lock()?;

        let rows = conn
            .execute(
                "UPDATE members SET first_name = ?1, last_name = ?2, dob = ?3, gender = ?4, address = ?5, phone = ?6, email = ?7 WHERE id = ?8",
                params![
                    member.first_name,
                    member.last_name,
                    format_date(member.dob),
                    member.gender,
                    member.address,
                    member.phone,
                    member.email,
                    member.id,
                ],
            )
            .map_err(DatabaseError::Query)?;

        Ok(rows > 0)
    }

    /// Delete a member
    pub fn delete_member(&self, id: i64) -> ServiceResult<bool> {
        let conn = self.lock()?;

        let rows = conn
            .execute("DELETE FROM members WHERE id = ?1", params![id])
            .map_err(DatabaseError::Query)?;

        Ok(rows > 0)
    }
}
