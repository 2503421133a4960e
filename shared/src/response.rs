//! Response envelopes shared by the list endpoints

use serde::{Deserialize, Serialize};

use crate::request::Page;

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Total number of matching records
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total number of pages
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(limit as u64) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn from_page(data: Vec<T>, total: i64, page: Page) -> Self {
        Self::new(data, total.max(0) as u64, page.page, page.per_page)
    }

    /// Map every item, keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_response() {
        let resp = PaginatedResponse::new(vec!["a", "b", "c"], 101, 2, 10);
        assert_eq!(resp.total, 101);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.total_pages, 11);
    }

    #[test]
    fn test_from_page_and_map() {
        let resp = PaginatedResponse::from_page(vec![1, 2], 2, Page::new(None, Some(5)));
        assert_eq!(resp.total_pages, 1);
        assert_eq!(resp.limit, 5);

        let mapped = resp.map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20]);
        assert_eq!(mapped.total, 2);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let resp = PaginatedResponse::<i32>::new(vec![], 0, 1, 20);
        assert_eq!(resp.total_pages, 0);
    }
}
