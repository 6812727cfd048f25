//! Member search criteria and sort keys.

use chrono::NaiveDate;
use serde::Deserialize;
use strum::EnumString;
use validator::Validate;

use super::filter::{Filter, TextField, TextMatch};
use super::page::PageRequest;
use super::sort::SortKey;
use super::Searchable;
use crate::db::Member;
use crate::validation;

/// Advanced member search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MemberCriteria {
    #[validate(length(max = 50), custom(function = "validation::identifier"))]
    pub member_number: Option<String>,

    #[validate(length(max = 100), custom(function = "validation::person_name"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100), custom(function = "validation::person_name"))]
    pub last_name: Option<String>,

    #[validate(length(max = 100), custom(function = "validation::email"))]
    pub email: Option<String>,

    #[validate(length(max = 20), custom(function = "validation::phone"))]
    pub phone: Option<String>,

    #[validate(custom(function = "validation::gender"))]
    pub gender: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[serde(rename = "dateOfBirthFrom")]
    pub dob_from: Option<NaiveDate>,

    #[serde(rename = "dateOfBirthTo")]
    pub dob_to: Option<NaiveDate>,

    #[validate(range(min = 0, max = 150))]
    pub age_from: Option<i32>,

    #[validate(range(min = 0, max = 150))]
    pub age_to: Option<i32>,

    #[serde(flatten)]
    pub page: PageRequest,
}

/// Sortable member fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MemberSort {
    #[default]
    Id,
    MemberNumber,
    FirstName,
    LastName,
    #[strum(serialize = "Dob", serialize = "DateOfBirth")]
    Dob,
    Gender,
    Email,
    Phone,
    Address,
}

impl SortKey for MemberSort {
    fn column(self) -> &'static str {
        match self {
            MemberSort::Id => "id",
            MemberSort::MemberNumber => "member_number",
            MemberSort::FirstName => "first_name",
            MemberSort::LastName => "last_name",
            MemberSort::Dob => "dob",
            MemberSort::Gender => "gender",
            MemberSort::Email => "email",
            MemberSort::Phone => "phone",
            MemberSort::Address => "address",
        }
    }

    fn is_text(self) -> bool {
        !matches!(self, MemberSort::Id | MemberSort::Dob)
    }
}

const TEXT_FIELDS: &[TextField<MemberCriteria>] = &[
    TextField {
        column: "member_number",
        matcher: TextMatch::Contains,
        value: |c| c.member_number.as_deref(),
    },
    TextField {
        column: "first_name",
        matcher: TextMatch::Contains,
        value: |c| c.first_name.as_deref(),
    },
    TextField {
        column: "last_name",
        matcher: TextMatch::Contains,
        value: |c| c.last_name.as_deref(),
    },
    TextField {
        column: "email",
        matcher: TextMatch::Contains,
        value: |c| c.email.as_deref(),
    },
    TextField {
        column: "phone",
        matcher: TextMatch::Contains,
        value: |c| c.phone.as_deref(),
    },
    TextField {
        column: "gender",
        matcher: TextMatch::Exact,
        value: |c| c.gender.as_deref(),
    },
    TextField {
        column: "address",
        matcher: TextMatch::Contains,
        value: |c| c.address.as_deref(),
    },
];

impl Searchable for Member {
    type Criteria = MemberCriteria;
    type Sort = MemberSort;

    fn filter(criteria: &MemberCriteria, today: NaiveDate) -> Filter {
        let mut filter = Filter::new();
        filter
            .text_fields(criteria, TEXT_FIELDS)
            .date_range("dob", criteria.dob_from, criteria.dob_to)
            .age_range(
                "dob",
                criteria.age_from.and_then(|age| u32::try_from(age).ok()),
                criteria.age_to.and_then(|age| u32::try_from(age).ok()),
                today,
            );
        filter
    }

    fn page_request(criteria: &MemberCriteria) -> &PageRequest {
        &criteria.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::sort;

    #[test]
    fn test_criteria_from_json() {
        let criteria: MemberCriteria = serde_json::from_value(serde_json::json!({
            "lastName": "kumar",
            "dateOfBirthFrom": "1980-01-01",
            "ageTo": 60,
            "pageNumber": 2,
            "pageSize": 5,
            "sortBy": "lastName",
            "sortDescending": true
        }))
        .unwrap();

        assert_eq!(criteria.last_name.as_deref(), Some("kumar"));
        assert_eq!(criteria.dob_from, NaiveDate::from_ymd_opt(1980, 1, 1));
        assert_eq!(criteria.age_to, Some(60));
        assert_eq!(criteria.page.page_number, Some(2));
        assert_eq!(criteria.page.page_size, Some(5));
        assert!(criteria.page.sort_descending);
    }

    #[test]
    fn test_sort_names() {
        assert_eq!(sort::resolve::<MemberSort>(Some("DOB"), false).column, "dob");
        assert_eq!(
            sort::resolve::<MemberSort>(Some("dateofbirth"), false).column,
            "dob"
        );
        assert_eq!(
            sort::resolve::<MemberSort>(Some("membernumber"), false).column,
            "member_number"
        );
        assert_eq!(sort::resolve::<MemberSort>(Some("npi"), false).column, "id");
    }

    #[test]
    fn test_gender_is_exact_and_names_are_substring() {
        let criteria = MemberCriteria {
            first_name: Some("Jo".to_string()),
            gender: Some("Female".to_string()),
            ..Default::default()
        };
        let filter = Member::filter(&criteria, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        assert_eq!(filter.predicates().len(), 2);
        assert!(matches!(
            filter.predicates()[0],
            crate::search::Predicate::Contains { column: "first_name", .. }
        ));
        assert!(matches!(
            filter.predicates()[1],
            crate::search::Predicate::Equals { column: "gender", .. }
        ));
    }
}
