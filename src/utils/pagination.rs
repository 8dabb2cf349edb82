use crate::utils::toml_config::PaginationConfig;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// `?page=&limit=` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Items per page
    pub limit: Option<i64>,
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Applies defaults and clamps: page >= 1, 1 <= limit <= max_limit.
    pub fn resolve(query: PageQuery, config: &PaginationConfig) -> Self {
        let max_limit = i64::from(config.max_limit.max(1));
        let page = query.page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let limit = query
            .limit
            .unwrap_or(i64::from(config.default_limit))
            .clamp(1, max_limit) as u32;

        Self { page, limit }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total_count: i64, page: Page) -> Self {
        Self {
            data,
            total_count,
            page: page.page,
            limit: page.limit,
        }
    }
}
