//! Paging and ordered queries
//!
//! Query parameters accepted by the repositories and the paged envelope
//! returned by the services. Filtering happens before counting, sorting
//! before paging.

use serde::{Deserialize, Serialize};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Basic paging parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceQuery {
    /// Items per page; 0 yields an empty page but still reports totals
    pub page_size: usize,
    /// Zero-based page index
    pub page_index: usize,
}

impl ResourceQuery {
    /// First page with the default size
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        }
    }

    /// Index of the first item on this page
    pub fn offset(&self) -> usize {
        self.page_size * self.page_index
    }
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sortable customer columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSortKey {
    CreatedAt,
    UpdatedAt,
    Name,
}

/// Sortable address columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSortKey {
    CreatedAt,
    UpdatedAt,
    Kind,
}

/// Customer listing query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerQuery {
    #[serde(flatten)]
    pub page: ResourceQuery,
    pub sort_by: Option<CustomerSortKey>,
    pub sort_order: Option<SortOrder>,
}

/// Address listing query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressQuery {
    #[serde(flatten)]
    pub page: ResourceQuery,
    /// Restrict to one customer's addresses
    pub customer_id: Option<String>,
    pub sort_by: Option<AddressSortKey>,
    pub sort_order: Option<SortOrder>,
}

/// One page of results plus paging totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_size: usize,
    pub page_index: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Build a page envelope from one page of items and the overall count
    pub fn new(items: Vec<T>, total_items: usize, query: &ResourceQuery) -> Self {
        // a zero page size still produces a meaningful page count
        let divisor = if query.page_size == 0 { 1 } else { query.page_size };
        Self {
            items,
            page_size: query.page_size,
            page_index: query.page_index,
            total_items,
            total_pages: total_items.div_ceil(divisor),
        }
    }
}
