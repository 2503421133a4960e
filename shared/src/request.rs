//! Request types shared by the list endpoints

use serde::Deserialize;

/// Default page size
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound for page size
pub const MAX_PER_PAGE: u32 = 100;

/// Resolved page window (1-based page, clamped page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        }
    }

    /// Row limit for SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (self.page - 1) as i64 * self.per_page as i64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination + free-text search query parameters
///
/// Kept flat (no `#[serde(flatten)]`) so numbers parse from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    pub page: Option<u32>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u32>,
    /// Search keyword
    pub search: Option<String>,
}

impl PaginationQuery {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }

    /// `ILIKE` pattern for the search keyword, `None` when blank
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().and_then(like_pattern)
    }
}

/// Build a `%term%` pattern with `%`, `_` and `\` escaped.
pub fn like_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
