//! # 用户处理器

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::Json;

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::server::AppState;
use crate::api::services::UsersService;
use crate::api::services::users::{
    ListUsersResult, ProfileResponse, UpdateProfileRequest, UpdateRoleRequest,
    UpdateRoleResponse, UserListQuery,
};

/// 用户列表（管理员）
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ListUsersResult>> {
    let service = UsersService::new(state.db.clone());
    Ok(Json(service.list(&auth, &query).await?))
}

/// 更新用户角色（管理员）
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UpdateRoleResponse>> {
    let service = UsersService::new(state.db.clone());
    Ok(Json(service.update_role(&auth, &request).await?))
}

/// 更新当前用户档案
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = UsersService::new(state.db.clone());
    Ok(Json(service.update_profile(&auth, &request).await?))
}
