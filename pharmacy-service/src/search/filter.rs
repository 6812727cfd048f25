//! Filter predicate builder.
//!
//! A [`Filter`] is a conjunction of field-level [`Predicate`]s. Each
//! non-blank criteria value contributes one predicate; absent or
//! whitespace-only values contribute nothing.

use chrono::{Months, NaiveDate};

/// How a text criterion is compared against its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-insensitive substring containment
    Contains,
    /// Case-insensitive equality
    Exact,
}

/// One text-valued field of a criteria type: the column it filters, how it
/// matches, and where to read the requested value from.
pub struct TextField<C> {
    pub column: &'static str,
    pub matcher: TextMatch,
    pub value: fn(&C) -> Option<&str>,
}

/// A single field-level constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column` contains `needle`, ignoring case. `needle` is stored lowercased.
    Contains { column: &'static str, needle: String },
    /// `column` equals `value`, ignoring case. `value` is stored lowercased.
    Equals { column: &'static str, value: String },
    /// `column >= date`
    OnOrAfter { column: &'static str, date: NaiveDate },
    /// `column <= date`
    OnOrBefore { column: &'static str, date: NaiveDate },
    /// `column > date`
    After { column: &'static str, date: NaiveDate },
    /// Matches no record
    Unsatisfiable,
}

/// Conjunction of predicates. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Add one predicate per non-blank text field of `criteria`
    pub fn text_fields<C>(&mut self, criteria: &C, fields: &[TextField<C>]) -> &mut Self {
        for field in fields {
            self.text(field.column, field.matcher, (field.value)(criteria));
        }
        self
    }

    /// Add a text predicate unless `value` is absent or blank
    pub fn text(&mut self, column: &'static str, matcher: TextMatch, value: Option<&str>) -> &mut Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return self;
        };

        let value = value.to_lowercase();
        self.predicates.push(match matcher {
            TextMatch::Contains => Predicate::Contains {
                column,
                needle: value,
            },
            TextMatch::Exact => Predicate::Equals { column, value },
        });
        self
    }

    /// Inclusive date range; either bound may be absent
    pub fn date_range(
        &mut self,
        column: &'static str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> &mut Self {
        if let Some(date) = from {
            self.predicates.push(Predicate::OnOrAfter { column, date });
        }
        if let Some(date) = to {
            self.predicates.push(Predicate::OnOrBefore { column, date });
        }
        self
    }

    /// Age range in whole years, both ends inclusive, relative to `today`.
    ///
    /// `age_from = N` keeps birth dates on or before `today - N years`;
    /// `age_to = N` keeps birth dates strictly after `today - (N + 1) years`.
    pub fn age_range(
        &mut self,
        column: &'static str,
        age_from: Option<u32>,
        age_to: Option<u32>,
        today: NaiveDate,
    ) -> &mut Self {
        // Nobody is older than the calendar
        if let Some(years) = age_from {
            self.predicates.push(match years_before(today, years) {
                Some(date) => Predicate::OnOrBefore { column, date },
                None => Predicate::Unsatisfiable,
            });
        }
        // An upper bound before the calendar's start excludes nothing
        if let Some(date) = age_to.and_then(|years| years_before(today, years.saturating_add(1))) {
            self.predicates.push(Predicate::After { column, date });
        }
        self
    }
}

/// `date` moved back by whole years. Feb 29 lands on Feb 28 in non-leap years.
fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}
