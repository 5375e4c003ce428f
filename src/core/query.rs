//! Query parameters and pagination utilities

use crate::core::error::ViewError;
use crate::core::filter::Filter;
use crate::core::sort::SortSpec;
use crate::core::view::ViewState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Range;

/// Query parameters for pagination, search, filtering and sorting
///
/// This structure mirrors the list controls of an admin table as they
/// appear in a URL query string. All parameters have sensible defaults.
///
/// # Example
/// ```rust,ignore
/// // Usage:
/// // ?page=2&limit=10
/// // ?search=rao&filter={"status": "approved"}
/// // ?page=1&limit=25&filter={"days>": 1}&sort=start_date:desc
/// let state = params.to_view_state()?;
/// model.set_state(state);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: usize,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Free-text search term
    pub search: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - Any of: `{"field": ["a", "b"]}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    pub filter: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    pub sort: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            filter: None,
            sort: None,
        }
    }
}

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: usize = 100;

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it doesn't exceed the maximum
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Parse filter JSON string into Value
    pub fn filter_value(&self) -> Result<Option<Value>, ViewError> {
        self.filter
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                serde_json::from_str(s).map_err(|e| ViewError::invalid_filter(e.to_string()))
            })
            .transpose()
    }

    /// Build the view state these parameters describe
    pub fn to_view_state(&self) -> Result<ViewState, ViewError> {
        let mut state = ViewState::new(self.limit());
        state.window.page = self.page();
        state.search = self.search.clone().unwrap_or_default();

        if let Some(filter) = self.filter_value()? {
            state.filters.extend(Filter::from_json(&filter)?);
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            state.sort = Some(SortSpec::parse(sort)?);
        }
        Ok(state)
    }
}

/// Current page (1-based) and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_limit(),
        }
    }
}

impl PageWindow {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Page size, at least 1
    pub fn size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Number of pages for `total` items; never less than 1
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size()).max(1)
    }

    /// This window with its page clamped into `[1, page_count]`
    pub fn clamped(&self, total: usize) -> Self {
        Self {
            page: self.page.clamp(1, self.page_count(total)),
            page_size: self.size(),
        }
    }

    /// Half-open slice bounds of the clamped page into `total` items
    pub fn bounds(&self, total: usize) -> Range<usize> {
        let window = self.clamped(total);
        let start = ((window.page - 1) * window.page_size).min(total);
        let end = (start + window.page_size).min(total);
        start..end
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1, clamped)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages (at least 1)
    pub total_pages: usize,

    /// 1-based index of the first visible item, 0 when empty
    pub start: usize,

    /// 1-based index of the last visible item, 0 when empty
    pub end: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let window = PageWindow::new(page, limit).clamped(total);
        let total_pages = window.page_count(total);
        let bounds = window.bounds(total);
        let (start, end) = if bounds.is_empty() {
            (0, 0)
        } else {
            (bounds.start + 1, bounds.end)
        };

        Self {
            page: window.page,
            limit: window.page_size,
            total,
            total_pages,
            start,
            end,
            has_next: window.page < total_pages,
            has_prev: window.page > 1,
        }
    }
}

/// One page of a sorted and filtered sequence
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The visible rows
    pub rows: Vec<T>,

    /// Pagination metadata
    pub meta: PaginationMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Cut the page described by `window` out of `records`
///
/// The page number is clamped, so an out-of-range request yields the last
/// page rather than an empty one.
pub fn paginate<T: Clone>(records: &[T], window: PageWindow) -> Page<T> {
    let total = records.len();
    let meta = PaginationMeta::new(window.page, window.page_size, total);
    let rows = records[window.bounds(total)].to_vec();
    Page { rows, meta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sort::SortDirection;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<usize> = (1..=23).collect();
        let page = paginate(&items, PageWindow::new(3, 10));
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!((page.meta.start, page.meta.end), (21, 23));
        assert_eq!(page.rows, vec![21, 22, 23]);
        assert!(!page.meta.has_next);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let items: Vec<usize> = (1..=23).collect();
        let page = paginate(&items, PageWindow::new(9, 10));
        assert_eq!(page.meta.page, 3);
        assert_eq!(page.rows.len(), 3);

        let page = paginate(&items, PageWindow::new(0, 10));
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.start, 1);
    }

    #[test]
    fn test_empty_set_has_one_page_and_zero_bounds() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, PageWindow::new(4, 10));
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.meta.page, 1);
        assert_eq!((page.meta.start, page.meta.end), (0, 0));
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let items = vec!['a', 'b'];
        let page = paginate(&items, PageWindow::new(2, 0));
        assert_eq!(page.meta.limit, 1);
        assert_eq!(page.rows, vec!['b']);
    }

    #[test]
    fn test_every_item_on_exactly_one_page() {
        for n in 0..40usize {
            for k in 1..12usize {
                let items: Vec<usize> = (0..n).collect();
                let pages = PageWindow::new(1, k).page_count(n);
                assert_eq!(pages, n.div_ceil(k).max(1));

                let seen: Vec<usize> = (1..=pages)
                    .flat_map(|p| paginate(&items, PageWindow::new(p, k)).rows)
                    .collect();
                assert_eq!(seen, items, "n={} k={}", n, k);
            }
        }
    }

    #[test]
    fn test_query_params_to_view_state() {
        let params = QueryParams {
            page: 2,
            limit: 500,
            search: Some("rao".into()),
            filter: Some(r#"{"status": "approved", "days>=": 2}"#.into()),
            sort: Some("start_date:desc".into()),
        };
        let state = params.to_view_state().expect("valid params");
        assert_eq!(state.window, PageWindow::new(2, MAX_PAGE_SIZE));
        assert_eq!(state.search, "rao");
        assert_eq!(state.filters.len(), 2);
        assert!(state.filters.contains_key("days>="));
        let sort = state.sort.expect("sort");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_query_params_rejects_bad_filter_json() {
        let params = QueryParams {
            filter: Some("{not json".into()),
            ..Default::default()
        };
        let err = params.to_view_state().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FILTER");
    }
}
