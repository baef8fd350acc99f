//! Page-based pagination helpers for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Hard ceiling on page size, regardless of what the client asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageParams {
    /// Normalizes the parameters: page is at least 1, limit is clamped
    /// to [1, MAX_PAGE_SIZE].
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        let p = self.normalized();
        p.limit as i64
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        let p = self.normalized();
        ((p.page - 1) as i64) * (p.limit as i64)
    }
}

/// Pagination metadata returned with list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageInfo {
    /// Builds page metadata from normalized params and a total row count.
    pub fn new(params: PageParams, total_items: i64) -> Self {
        let params = params.normalized();
        let per_page = params.limit as i64;
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };

        Self {
            current_page: params.page,
            per_page: params.limit,
            total_items,
            total_pages,
        }
    }
}
