//! # 订单处理器

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::Json;

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::server::AppState;
use crate::api::services::OrdersService;
use crate::api::services::orders::{
    ListOrdersResult, ListUserOrdersResult, OrderListQuery, UpdateOrderStatusRequest,
    UpdateOrderStatusResponse, UserOrdersQuery,
};

/// 管理端订单列表
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<ListOrdersResult>> {
    let service = OrdersService::new(state.db.clone());
    Ok(Json(service.list(&auth, &query).await?))
}

/// 更新订单状态（管理员）
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Json<UpdateOrderStatusResponse>> {
    let service = OrdersService::new(state.db.clone());
    Ok(Json(service.update_status(&auth, &request).await?))
}

/// 当前用户的订单历史
pub async fn list_my_orders(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Query(query): Query<UserOrdersQuery>,
) -> ApiResult<Json<ListUserOrdersResult>> {
    let service = OrdersService::new(state.db.clone());
    Ok(Json(service.list_for_user(&auth, &query).await?))
}
