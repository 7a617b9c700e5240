//! Pagination related types for list endpoints

use serde::{Deserialize, Serialize};

/// Default page size for feed endpoints
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Hard cap on items per page
pub const MAX_PAGE_SIZE: u32 = 50;

/// Cursor-based pagination parameters
///
/// `after` carries the id of the last item the client already has; the next
/// page starts strictly after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPagination {
    /// Cursor pointing to the last seen item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Number of items to fetch
    #[serde(default = "default_page_size")]
    pub limit: u32,
}

impl Default for CursorPagination {
    fn default() -> Self {
        Self {
            after: None,
            limit: default_page_size(),
        }
    }
}

impl CursorPagination {
    /// Clamp the limit into the accepted range
    pub fn clamped_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Response page for cursor-based pagination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T> {
    /// The data items
    pub data: Vec<T>,

    /// Cursor for the next page, present when `has_more`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,

    /// Whether there are more items after this page
    pub has_more: bool,
}

impl<T> CursorPage<T> {
    /// Create a page with an explicit continuation cursor
    pub fn new(data: Vec<T>, next_cursor: Option<String>, has_more: bool) -> Self {
        Self {
            data,
            next_cursor,
            has_more,
        }
    }

    /// Create a final page with no continuation
    pub fn last(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
            has_more: false,
        }
    }

    /// Transform the data items using a function
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            data: self.data.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
