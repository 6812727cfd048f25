//! Advanced search: multi-criteria filtering, sorting and pagination.
//!
//! The algorithm is shared by every record kind. Each kind supplies a
//! criteria type, a field table that turns criteria into a [`Filter`], and a
//! [`SortKey`] enum; [`advanced_search`] does the rest.

pub mod filter;
mod members;
mod page;
mod providers;
mod sort;

pub use filter::{Filter, Predicate};
pub use members::MemberCriteria;
pub use page::{PageRequest, PageWindow, ResultPage};
pub use providers::ProviderCriteria;
pub use sort::{Ordering, SortKey, resolve};

use chrono::NaiveDate;
use tracing::debug;

use crate::db::{Database, Record};
use crate::error::ServiceResult;

/// A record kind that supports advanced search
pub trait Searchable: Record {
    type Criteria;
    type Sort: SortKey;

    /// Translate criteria into a predicate conjunction. `today` anchors the
    /// age-range bounds.
    fn filter(criteria: &Self::Criteria, today: NaiveDate) -> Filter;

    fn page_request(criteria: &Self::Criteria) -> &PageRequest;
}

/// Filter, count, sort and page `R` records.
///
/// `default_page_size` applies when the criteria carry no page size. An
/// unknown sort name orders by id; a page past the end is empty but still
/// reports the full match count.
pub fn advanced_search<R: Searchable>(
    db: &Database,
    criteria: &R::Criteria,
    default_page_size: u32,
    today: NaiveDate,
) -> ServiceResult<ResultPage<R>> {
    let request = R::page_request(criteria);
    let window = request.window(default_page_size)?;
    let filter = R::filter(criteria, today);
    let ordering = resolve::<R::Sort>(request.sort_by.as_deref(), request.sort_descending);

    let (items, total) = db.search_page::<R>(&filter, &ordering, window)?;

    debug!(
        table = R::TABLE,
        predicates = filter.predicates().len(),
        order_by = %ordering.to_sql(),
        total,
        page = window.number(),
        "Advanced search"
    );

    Ok(ResultPage::new(items, total, window))
}
