//! # 服务层共享工具
//!
//! 提供分页、统计时间窗等辅助方法，避免在各域服务中重复实现。

pub mod pagination;
pub mod period;

pub use pagination::{PaginationParams, build_page};
pub use period::AnalyticsPeriod;

use chrono::NaiveDateTime;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::AuthContext;

/// 时间戳统一输出为 RFC 3339（UTC）
#[must_use]
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.and_utc().to_rfc3339()
}

/// 管理端操作统一的角色闸门
pub fn ensure_admin(auth: &AuthContext) -> ApiResult<()> {
    if auth.is_admin {
        Ok(())
    } else {
        Err(ApiError::permission("Access denied. Admin role required."))
    }
}
