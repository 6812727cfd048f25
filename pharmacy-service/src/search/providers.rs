//! Provider search criteria and sort keys.

use chrono::NaiveDate;
use serde::Deserialize;
use strum::EnumString;
use validator::Validate;

use super::filter::{Filter, TextField, TextMatch};
use super::page::PageRequest;
use super::sort::SortKey;
use super::Searchable;
use crate::db::Provider;
use crate::validation;

/// Advanced provider search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCriteria {
    #[validate(length(max = 50), custom(function = "validation::identifier"))]
    pub provider_number: Option<String>,

    #[validate(length(max = 200))]
    pub name: Option<String>,

    #[serde(alias = "NPI")]
    #[validate(length(max = 10), custom(function = "validation::digits"))]
    pub npi: Option<String>,

    #[validate(length(max = 100), custom(function = "validation::email"))]
    pub email: Option<String>,

    #[validate(length(max = 20), custom(function = "validation::phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub specialty: Option<String>,

    #[validate(length(max = 500))]
    pub address: Option<String>,

    #[serde(flatten)]
    pub page: PageRequest,
}

/// Sortable provider fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ProviderSort {
    #[default]
    Id,
    ProviderNumber,
    Name,
    Npi,
    Email,
    Phone,
    Specialty,
    Address,
}

impl SortKey for ProviderSort {
    fn column(self) -> &'static str {
        match self {
            ProviderSort::Id => "id",
            ProviderSort::ProviderNumber => "provider_number",
            ProviderSort::Name => "name",
            ProviderSort::Npi => "npi",
            ProviderSort::Email => "email",
            ProviderSort::Phone => "phone",
            ProviderSort::Specialty => "specialty",
            ProviderSort::Address => "address",
        }
    }

    fn is_text(self) -> bool {
        self != ProviderSort::Id
    }
}

// Specialty is matched as a substring here; the by-specialty lookup is exact.
const TEXT_FIELDS: &[TextField<ProviderCriteria>] = &[
    TextField {
        column: "provider_number",
        matcher: TextMatch::Contains,
        value: |c| c.provider_number.as_deref(),
    },
    TextField {
        column: "name",
        matcher: TextMatch::Contains,
        value: |c| c.name.as_deref(),
    },
    TextField {
        column: "npi",
        matcher: TextMatch::Contains,
        value: |c| c.npi.as_deref(),
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
        column: "specialty",
        matcher: TextMatch::Contains,
        value: |c| c.specialty.as_deref(),
    },
    TextField {
        column: "address",
        matcher: TextMatch::Contains,
        value: |c| c.address.as_deref(),
    },
];

impl Searchable for Provider {
    type Criteria = ProviderCriteria;
    type Sort = ProviderSort;

    fn filter(criteria: &ProviderCriteria, _today: NaiveDate) -> Filter {
        let mut filter = Filter::new();
        filter.text_fields(criteria, TEXT_FIELDS);
        filter
    }

    fn page_request(criteria: &ProviderCriteria) -> &PageRequest {
        &criteria.page
    }
}
