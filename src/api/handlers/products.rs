//! # 商品处理器

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;
use crate::api::server::AppState;
use crate::api::services::ProductsService;
use crate::api::services::products::{
    CreateProductRequest, DeleteProductRequest, DeleteProductResponse, ListProductsResult,
    ProductQuery, ProductResponse, UpdateProductRequest,
};

/// 按 ID 查询参数
#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductQuery {
    pub id: i32,
}

/// 商品列表（公开）
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Json<ListProductsResult>> {
    let service = ProductsService::new(state.db.clone());
    Ok(Json(service.list(&query).await?))
}

/// 商品详情（公开）
pub async fn get_product(
    State(state): State<AppState>,
    Query(query): Query<GetProductQuery>,
) -> ApiResult<Json<ProductResponse>> {
    let service = ProductsService::new(state.db.clone());
    Ok(Json(service.get(query.id).await?))
}

/// 创建商品（管理员）
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<CreateProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let service = ProductsService::new(state.db.clone());
    Ok(Json(service.create(&auth, &request).await?))
}

/// 更新商品（管理员）
pub async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<UpdateProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let service = ProductsService::new(state.db.clone());
    Ok(Json(service.update(&auth, &request).await?))
}

/// 软删除商品（管理员）
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Json(request): Json<DeleteProductRequest>,
) -> ApiResult<Json<DeleteProductResponse>> {
    let service = ProductsService::new(state.db.clone());
    Ok(Json(service.delete(&auth, &request).await?))
}
