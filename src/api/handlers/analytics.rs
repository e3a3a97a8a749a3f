//! # 统计处理器

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::Json;

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::server::AppState;
use crate::api::services::StatisticsService;
use crate::api::services::statistics::{
    AnalyticsQuery, DashboardResponse, UserAnalyticsResponse,
};

/// 当前用户的消费统计
pub async fn user_analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<Json<UserAnalyticsResponse>> {
    let service = StatisticsService::new(state.db.clone());
    Ok(Json(service.user_analytics(&auth, &query).await?))
}

/// 管理端销售看板
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
) -> ApiResult<Json<DashboardResponse>> {
    let service = StatisticsService::new(state.db.clone());
    Ok(Json(service.dashboard(&auth).await?))
}
