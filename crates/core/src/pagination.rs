//! Offset pagination over catalog listings.

use serde::{Deserialize, Serialize};

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Clamp page to at least 1 and limit to `1..=max_limit`.
    pub fn clamped(self, max_limit: u32) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, max_limit.max(1)),
        }
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: usize,
    pub total_pages: usize,
}

/// One page of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice `items` according to `request`. Callers clamp the request first;
/// a zero limit is treated as 1.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let page = request.page.max(1);
    let limit = request.limit.max(1) as usize;
    let total_count = items.len();
    let start = (page as usize - 1).saturating_mul(limit);

    let items: Vec<T> = items.into_iter().skip(start).take(limit).collect();

    Page {
        items,
        pagination: Pagination {
            current_page: page,
            page_size: limit as u32,
            total_count,
            total_pages: total_count.div_ceil(limit),
        },
    }
}
