//! # API 响应结构
//!
//! 定义标准的 JSON API 响应格式，包括分页元数据与错误响应体。
//! 响应 DTO 同时派生 `Serialize` 与 `Deserialize`，与类型化 HTTP
//! 客户端共享同一套结构。

use serde::{Deserialize, Serialize};

/// # 分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// # 标准错误信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// # 标准错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

/// # 简单操作确认响应
///
/// 删除 / 移除这类没有实体载荷的操作统一返回此结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
