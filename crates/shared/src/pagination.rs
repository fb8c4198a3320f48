//! Offset pagination helpers for list endpoints.

use serde::{Deserialize, Serialize};

/// Default items per page for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Hard ceiling on items per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Query parameters for paginated listings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PageQuery {
    /// Page number (1-indexed, default: 1).
    pub page: Option<i64>,

    /// Items per page (default: 20, max: 100).
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// Get the page number (1-indexed, clamped to >= 1).
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page (clamped to 1..=100).
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Get the SQL offset for this page.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Pagination block returned alongside listed items.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(query: &PageQuery, total: i64) -> Self {
        let per_page = query.per_page();
        Self {
            page: query.page(),
            per_page,
            total,
            total_pages: (total + per_page - 1) / per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_offset() {
        let query = PageQuery {
            page: Some(3),
            per_page: Some(25),
        };
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn test_page_query_clamping() {
        let query = PageQuery {
            page: Some(-2),
            per_page: Some(5000),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_page_info_total_pages() {
        let query = PageQuery {
            page: Some(2),
            per_page: Some(25),
        };
        let info = PageInfo::new(&query, 76);
        assert_eq!(info.total_pages, 4);
        assert_eq!(info.page, 2);
        assert_eq!(info.total, 76);
    }

    #[test]
    fn test_page_info_empty() {
        let info = PageInfo::new(&PageQuery::default(), 0);
        assert_eq!(info.total_pages, 0);
    }
}
