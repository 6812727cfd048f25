//! Filtered, counted, paginated record queries.

use rusqlite::ToSql;

use super::models::{Record, format_date};
use super::{Database, query_records};
use crate::error::{DatabaseError, ServiceError, ServiceResult};
use crate::search::{Filter, Ordering, PageWindow, Predicate};

impl Database {
    /// Count every `R` matching `filter`, then fetch the requested page in
    /// `ordering`.
    ///
    /// Both statements run in one transaction on the locked connection, so
    /// the count and the page always describe the same snapshot.
    pub fn search_page<R: Record>(
        &self,
        filter: &Filter,
        ordering: &Ordering,
        window: PageWindow,
    ) -> ServiceResult<(Vec<R>, u64)> {
        let (where_sql, mut params_vec) = where_clause(filter);

        let limit = i64::from(window.size());
        let offset = i64::try_from(window.offset())
            .map_err(|_| ServiceError::invalid_request("Page number is too large."))?;

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(DatabaseError::Query)?;

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", R::TABLE, where_sql);
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let total: i64 = tx
            .query_row(&count_sql, params_refs.as_slice(), |row| row.get(0))
            .map_err(DatabaseError::Query)?;

        let page_sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
            R::COLUMNS,
            R::TABLE,
            where_sql,
            ordering.to_sql()
        );
        params_vec.push(Box::new(limit));
        params_vec.push(Box::new(offset));
        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let records = query_records(&tx, &page_sql, params_refs.as_slice())?;

        tx.commit().map_err(DatabaseError::Query)?;

        Ok((records, total as u64))
    }
}

/// Render a filter as a ` WHERE ...` clause (empty when the filter is empty)
/// and its positional parameters
fn where_clause(filter: &Filter) -> (String, Vec<Box<dyn ToSql>>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut conditions = Vec::with_capacity(filter.predicates().len());
    let mut params_vec: Vec<Box<dyn ToSql>> = Vec::with_capacity(filter.predicates().len());

    for predicate in filter.predicates() {
        match predicate {
            Predicate::Contains { column, needle } => {
                conditions.push(format!("instr(fold_case({}), ?) > 0", column));
                params_vec.push(Box::new(needle.clone()));
            }
            Predicate::Equals { column, value } => {
                conditions.push(format!("fold_case({}) = ?", column));
                params_vec.push(Box::new(value.clone()));
            }
            Predicate::OnOrAfter { column, date } => {
                conditions.push(format!("{} >= ?", column));
                params_vec.push(Box::new(format_date(*date)));
            }
            Predicate::OnOrBefore { column, date } => {
                conditions.push(format!("{} <= ?", column));
                params_vec.push(Box::new(format_date(*date)));
            }
            Predicate::After { column, date } => {
                conditions.push(format!("{} > ?", column));
                params_vec.push(Box::new(format_date(*date)));
            }
            Predicate::Unsatisfiable => conditions.push("0".to_string()),
        }
    }

    (format!(" WHERE {}", conditions.join(" AND ")), params_vec)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::{NewProvider, Provider};
    use crate::search::filter::TextMatch;

    fn seed(db: &Database, count: usize) {
        for i in 1..=count {
            db.insert_provider(&NewProvider {
                provider_number: format!("PROV{:03}", i),
                name: format!("Dr. {}", (b'a' + (i % 26) as u8) as char),
                npi: format!("{:010}", i),
                address: String::new(),
                phone: String::new(),
                email: String::new(),
                specialty: if i % 2 == 0 { "Cardiology" } else { "Neurology" }.to_string(),
            })
            .unwrap();
        }
    }

    fn by_id(descending: bool) -> Ordering {
        Ordering {
            column: "id",
            text: false,
            descending,
        }
    }

    #[test]
    fn test_where_clause_rendering() {
        let mut filter = Filter::new();
        filter
            .text("name", TextMatch::Contains, Some("Chen"))
            .text("gender", TextMatch::Exact, Some("Male"))
            .date_range(
                "dob",
                NaiveDate::from_ymd_opt(1980, 1, 1),
                NaiveDate::from_ymd_opt(1990, 12, 31),
            );

        let (sql, params_vec) = where_clause(&filter);
        assert_eq!(
            sql,
            " WHERE instr(fold_case(name), ?) > 0 AND fold_case(gender) = ? AND dob >= ? AND dob <= ?"
        );
        assert_eq!(params_vec.len(), 4);

        let mut filter = Filter::new();
        filter.age_range("dob", Some(1_000_000), None, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        let (sql, params_vec) = where_clause(&filter);
        assert_eq!(sql, " WHERE 0");
        assert!(params_vec.is_empty());

        let (sql, params_vec) = where_clause(&Filter::new());
        assert!(sql.is_empty());
        assert!(params_vec.is_empty());
    }

    #[test]
    fn test_count_ignores_window() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 9);

        let mut filter = Filter::new();
        filter.text("specialty", TextMatch::Contains, Some("cardio"));

        let (page, total) = db
            .search_page::<Provider>(&filter, &by_id(false), PageWindow::new(2, 3).unwrap())
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].provider_number, "PROV008");
    }

    #[test]
    fn test_descending_page() {
        let db = Database::open_in_memory().unwrap();
        seed(&db, 5);

        let (page, total) = db
            .search_page::<Provider>(&Filter::new(), &by_id(true), PageWindow::new(1, 2).unwrap())
            .unwrap();
        assert_eq!(total, 5);
        let numbers: Vec<_> = page.iter().map(|p| p.provider_number.as_str()).collect();
        assert_eq!(numbers, ["PROV005", "PROV004"]);
    }
}
