//! # 会话处理器
//!
//! 登录/注销负责 Set-Cookie 的写入与清除，会话校验在认证中间件。

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::HeaderMap;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::response::{IntoResponse, Json, Response};

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::server::AppState;
use crate::api::services::users::UserProfile;
use crate::api::services::{AuthService, UsersService};
use crate::api::services::auth::LoginRequest;
use crate::auth::{build_clear_cookie, build_session_cookie, extract_cookie};

/// 登录并设置会话 Cookie
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let service = AuthService::new(state.db.clone(), state.config.auth.session_ttl_hours);
    let (body, session) = service.login(&request).await?;

    let cookie = build_session_cookie(
        &state.config.auth.cookie_name,
        &session.token,
        state.config.auth.session_ttl_hours * 3600,
    );

    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// 注销并清除会话 Cookie（幂等）
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let token = headers
        .get(COOKIE)
        .and_then(|header| header.to_str().ok())
        .and_then(|cookies| extract_cookie(cookies, &state.config.auth.cookie_name));

    let service = AuthService::new(state.db.clone(), state.config.auth.session_ttl_hours);
    let body = service.logout(token).await?;

    let cookie = build_clear_cookie(&state.config.auth.cookie_name);
    Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
}

/// 当前会话对应的用户
pub async fn session(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
) -> ApiResult<Json<UserProfile>> {
    let service = UsersService::new(state.db.clone());
    Ok(Json(service.profile(&auth).await?))
}
