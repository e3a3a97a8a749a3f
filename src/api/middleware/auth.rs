//! # 认证中间件
//!
//! 从请求的会话 Cookie 解析服务端会话，将认证上下文注入请求扩展。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use entity::{user_sessions, user_sessions::Entity as UserSessions, users::Entity as Users};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::auth::{extract_cookie, hash_session_token};

/// 包含认证用户信息的上下文
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i32,
    pub is_admin: bool,
}

/// Axum认证中间件
///
/// 受保护路由统一挂载；缺失或无效会话直接以 401 拒绝，
/// 角色判断留给各 service。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie_header = request
        .headers()
        .get(COOKIE)
        .and_then(|header| header.to_str().ok());

    let Some(cookie_header) = cookie_header else {
        return Err(ApiError::auth("Authentication required"));
    };

    let Some(token) = extract_cookie(cookie_header, &state.config.auth.cookie_name) else {
        return Err(ApiError::auth("Authentication required"));
    };

    let token_hash = hash_session_token(token);

    let session = UserSessions::find()
        .filter(user_sessions::Column::TokenHash.eq(&token_hash))
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::auth("Invalid or expired session"))?;

    if session.expires_at <= Utc::now().naive_utc() {
        return Err(ApiError::auth("Invalid or expired session"));
    }

    let user = Users::find_by_id(session.user_id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::auth("Invalid or expired session"))?;

    let auth_context = Arc::new(AuthContext {
        user_id: user.id,
        is_admin: user.role == "admin",
    });
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}
