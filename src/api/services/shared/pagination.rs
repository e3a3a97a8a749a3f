//! # 分页参数与分页元数据

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::Pagination;

/// 默认每页条数
pub const DEFAULT_LIMIT: u64 = 20;
/// 每页条数上限
pub const MAX_LIMIT: u64 = 100;

/// 分页参数
#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    /// 当前页码（>= 1）
    pub page: u64,
    /// 每页条数（1..=100）
    pub limit: u64,
}

impl PaginationParams {
    /// 根据可选参数创建分页配置
    ///
    /// 越界值直接拒绝而不是静默修正，调用方会得到 400。
    pub fn parse(page: Option<u64>, limit: Option<u64>) -> ApiResult<Self> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(ApiError::validation(
                "Invalid page number",
                Some("page".to_string()),
            ));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::validation(
                format!("Invalid limit. Must be between 1 and {MAX_LIMIT}"),
                Some("limit".to_string()),
            ));
        }

        Ok(Self { page, limit })
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// 根据总数和分页参数计算分页元数据。
#[must_use]
pub const fn build_page(total: u64, params: PaginationParams) -> Pagination {
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(params.limit)
    };
    Pagination {
        current_page: params.page,
        total_pages,
        total_count: total,
        limit: params.limit,
        has_next_page: params.page < total_pages,
        has_previous_page: params.page > 1,
    }
}
