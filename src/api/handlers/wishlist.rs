//! # 心愿单处理器

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::Json;

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::response::AckResponse;
use crate::api::server::AppState;
use crate::api::services::WishlistService;
use crate::api::services::wishlist::{
    AddWishlistResponse, ListWishlistResult, WishlistItemRequest, WishlistQuery,
};

/// 当前用户的心愿单
pub async fn list_wishlist(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Query(query): Query<WishlistQuery>,
) -> ApiResult<Json<ListWishlistResult>> {
    let service = WishlistService::new(state.db.clone());
    Ok(Json(service.list(&auth, &query).await?))
}

/// 加入心愿单
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<WishlistItemRequest>,
) -> ApiResult<Json<AddWishlistResponse>> {
    let service = WishlistService::new(state.db.clone());
    Ok(Json(service.add(&auth, &request).await?))
}

/// 移除心愿单条目（幂等）
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<WishlistItemRequest>,
) -> ApiResult<Json<AckResponse>> {
    let service = WishlistService::new(state.db.clone());
    Ok(Json(service.remove(&auth, &request).await?))
}
