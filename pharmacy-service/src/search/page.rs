//! Page requests and the result envelope.

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Pagination and sort directives shared by every criteria type.
///
/// Numbers are signed so that out-of-range input reaches validation and is
/// reported as a bad request instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default)]
    pub page_number: Option<i64>,

    #[serde(default)]
    pub page_size: Option<i64>,

    #[serde(default)]
    pub sort_by: Option<String>,

    #[serde(default)]
    pub sort_descending: bool,
}

impl PageRequest {
    /// Resolve to a concrete window, filling in `default_size` when no size
    /// was requested
    pub fn window(&self, default_size: u32) -> ServiceResult<PageWindow> {
        PageWindow::new(
            self.page_number.unwrap_or(1),
            self.page_size.unwrap_or(i64::from(default_size)),
        )
    }
}

/// A validated 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: u32,
    size: u32,
}

impl PageWindow {
    pub fn new(number: i64, size: i64) -> ServiceResult<Self> {
        let number = u32::try_from(number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ServiceError::invalid_request("Page number must be greater than 0."))?;
        let size = u32::try_from(size)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ServiceError::invalid_request("Page size must be greater than 0."))?;

        Ok(Self { number, size })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Records skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total_count: u64, window: PageWindow) -> Self {
        let total_pages = total_count.div_ceil(u64::from(window.size));

        Self {
            items,
            total_count,
            page_number: window.number,
            page_size: window.size,
            total_pages,
            has_previous_page: window.number > 1,
            has_next_page: u64::from(window.number) < total_pages,
        }
    }

    /// Convert every item, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ResultPage<U> {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults() {
        let window = PageRequest::default().window(10).unwrap();
        assert_eq!(window.number(), 1);
        assert_eq!(window.size(), 10);
        assert_eq!(window.offset(), 0);

        let window = PageWindow::new(3, 25).unwrap();
        assert_eq!(window.offset(), 50);
    }

    #[test]
    fn test_window_rejects_non_positive() {
        assert!(matches!(
            PageWindow::new(0, 10),
            Err(ServiceError::InvalidRequest { .. })
        ));
        assert!(PageWindow::new(-4, 10).is_err());
        assert!(PageWindow::new(1, 0).is_err());
        assert!(PageWindow::new(1, i64::MAX).is_err());
    }

    #[test]
    fn test_envelope_metadata_is_consistent() {
        for total in 0..=23u64 {
            for size in 1..=7i64 {
                for number in 1..=6i64 {
                    let window = PageWindow::new(number, size).unwrap();
                    let page = ResultPage::<()>::new(Vec::new(), total, window);

                    let expected_pages = (total as f64 / size as f64).ceil() as u64;
                    assert_eq!(page.total_pages, expected_pages);
                    assert_eq!(page.has_previous_page, number > 1);
                    assert_eq!(page.has_next_page, (number as u64) < expected_pages);
                }
            }
        }
    }

    #[test]
    fn test_empty_result_has_no_pages() {
        let page = ResultPage::<()>::new(Vec::new(), 0, PageWindow::new(1, 10).unwrap());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_previous_page);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_serialized_field_names() {
        let page = ResultPage::new(vec![1, 2], 3, PageWindow::new(1, 2).unwrap());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"], serde_json::json!([1, 2]));
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["hasPreviousPage"], false);
        assert_eq!(json["hasNextPage"], true);
    }
}
