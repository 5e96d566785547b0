//! Pagination types for list endpoints.
//!
//! Every list endpoint accepts a [`PageQuery`] from the query string and
//! answers with a [`Page`] whose `meta` carries the totals.

use serde::{Deserialize, Serialize};

use super::sorting::SortDirection;

/// Default page size.
pub const DEFAULT_LIMIT: u64 = 10;
/// Maximum page size.
pub const MAX_LIMIT: u64 = 100;
/// Column used when no (or an unknown) sort column is requested.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Query-string parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search term.
    #[serde(default)]
    pub search: Option<String>,
    /// Column to sort by; checked against a per-entity whitelist.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortDirection,
}

impl PageQuery {
    /// Create a page query, clamping out-of-range values.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit,
            search: None,
            sort_by: None,
            sort_order: SortDirection::Desc,
        }
        .normalized()
    }

    /// Set the search term.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Clamp `page` to at least 1 and `limit` to `1..=MAX_LIMIT`.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }

    /// The trimmed search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

/// Page metadata returned alongside the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub limit: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl PageMeta {
    /// Compute the metadata for `total` items at the given page/limit.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Totals and position.
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Create a new paginated response.
    pub fn new(items: Vec<T>, total: u64, query: &PageQuery) -> Self {
        Self {
            items,
            meta: PageMeta::new(total, query.page, query.limit),
        }
    }

    /// Transform the items while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageMeta::new(21, 1, 10).total_pages, 3);
        assert_eq!(PageMeta::new(20, 1, 10).total_pages, 2);
        assert_eq!(PageMeta::new(1, 1, 10).total_pages, 1);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page: Page<u32> = Page::new(Vec::new(), 0, &PageQuery::default());
        assert_eq!(page.meta.total_pages, 0);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.limit, 10);
    }

    #[test]
    fn query_is_clamped() {
        let q = PageQuery::new(0, 0);
        assert_eq!((q.page, q.limit), (1, 1));
        let q = PageQuery::new(3, 5000);
        assert_eq!(q.limit, MAX_LIMIT);
        assert_eq!(q.offset(), 200);
    }

    #[test]
    fn query_string_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.sort_order, SortDirection::Desc);
        assert!(q.search_term().is_none());
    }

    #[test]
    fn blank_search_is_ignored() {
        let q = PageQuery::default().with_search("   ");
        assert!(q.search_term().is_none());
        let q = PageQuery::default().with_search("  velo ");
        assert_eq!(q.search_term(), Some("velo"));
    }
}
