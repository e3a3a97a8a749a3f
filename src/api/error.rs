//! # API 错误处理
//!
//! API 层专用错误类型与 HTTP 状态码映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::response::{ApiErrorResponse, ErrorDetails};

/// API 层错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 认证错误
    #[error("{message}")]
    Auth {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 权限错误
    #[error("{message}")]
    Permission {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 验证错误
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 业务逻辑错误
    #[error("{message}")]
    Business {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 资源未找到错误
    #[error("{resource_type} not found: {identifier}")]
    NotFound {
        resource_type: String,
        identifier: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 资源冲突错误
    #[error("{message}")]
    Conflict {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 内部错误，对外只暴露通用描述
    #[error("Internal server error")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    /// 创建认证错误
    pub fn auth<T: Into<String>>(message: T) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// 创建权限错误
    pub fn permission<T: Into<String>>(message: T) -> Self {
        Self::Permission {
            message: message.into(),
            source: None,
        }
    }

    /// 创建验证错误
    pub fn validation<T: Into<String>>(message: T, field: Option<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field,
            source: None,
        }
    }

    /// 创建业务错误
    pub fn business<T: Into<String>>(message: T) -> Self {
        Self::Business {
            message: message.into(),
            source: None,
        }
    }

    /// 创建资源未找到错误
    pub fn not_found<T: Into<String>, I: Into<String>>(resource_type: T, identifier: I) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            source: None,
        }
    }

    /// 创建资源冲突错误
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 错误码（响应体 `error.code` 字段）
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "AUTH_ERROR",
            Self::Permission { .. } => "PERMISSION_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Business { .. } => "BUSINESS_ERROR",
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::Conflict { .. } => "RESOURCE_CONFLICT",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// 对应的 HTTP 状态码
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth { .. } => StatusCode::UNAUTHORIZED,
            Self::Permission { .. } => StatusCode::FORBIDDEN,
            Self::Validation { .. } | Self::Business { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 数据库错误一律归为内部错误，细节只进日志
impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

// 实现 IntoResponse trait，将 API 错误转换为标准HTTP响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let Self::Internal { message, source } = &self {
            tracing::error!(
                message = %message,
                source = ?source,
                "internal error while handling request"
            );
        }

        let error_response = ApiErrorResponse {
            success: false,
            error: ErrorDetails {
                code: self.code().to_string(),
                message: self.to_string(),
                field: match &self {
                    Self::Validation { field, .. } => field.clone(),
                    _ => None,
                },
            },
        };

        (status, axum::Json(error_response)).into_response()
    }
}

/// API 层结果类型
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(ApiError::auth("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::permission("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::validation("x", None).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::business("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::not_found("Product", "42").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
    }

    #[test]
    fn internal_error_hides_details() {
        let err = ApiError::internal_with_source("db exploded", anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
