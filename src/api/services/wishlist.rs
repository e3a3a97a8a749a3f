//! # 心愿单服务
//!
//! 当前用户心愿单的查询、加入与移除。

use std::sync::Arc;

use chrono::Utc;
use entity::{
    products, products::Entity as Products, user_wishlists,
    user_wishlists::Entity as UserWishlists,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::AuthContext;
use crate::api::response::{AckResponse, Pagination};

use super::products::ProductResponse;
use super::shared::{PaginationParams, build_page, format_timestamp};

/// 心愿单查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WishlistQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// 加入/移除心愿单请求
#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistItemRequest {
    pub product_id: i32,
}

/// 加入心愿单响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AddWishlistResponse {
    pub success: bool,
    pub message: String,
    pub wishlist_item_id: i32,
}

/// 心愿单中的商品（附加入时间）
#[derive(Debug, Serialize, Deserialize)]
pub struct WishlistProductResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub added_to_wishlist_at: String,
}

/// 心愿单列表结果
#[derive(Debug, Serialize, Deserialize)]
pub struct ListWishlistResult {
    pub products: Vec<WishlistProductResponse>,
    pub pagination: Pagination,
}

/// 心愿单服务
pub struct WishlistService {
    db: Arc<DatabaseConnection>,
}

impl WishlistService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 当前用户的心愿单（仅在售商品，按加入时间倒序）
    pub async fn list(
        &self,
        auth: &AuthContext,
        query: &WishlistQuery,
    ) -> ApiResult<ListWishlistResult> {
        let params = PaginationParams::parse(query.page, query.limit)?;

        let total = UserWishlists::find()
            .filter(user_wishlists::Column::UserId.eq(auth.user_id))
            .count(self.db())
            .await?;

        let rows = UserWishlists::find()
            .filter(user_wishlists::Column::UserId.eq(auth.user_id))
            .find_also_related(Products)
            .filter(products::Column::IsActive.eq(true))
            .order_by_desc(user_wishlists::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(self.db())
            .await?;

        let products = rows
            .into_iter()
            .filter_map(|(entry, product)| {
                product.map(|product| WishlistProductResponse {
                    product: product.into(),
                    added_to_wishlist_at: format_timestamp(&entry.created_at),
                })
            })
            .collect();

        Ok(ListWishlistResult {
            products,
            pagination: build_page(total, params),
        })
    }

    /// 加入心愿单
    ///
    /// 商品不存在或已下架返回 404，重复加入返回 409。
    pub async fn add(
        &self,
        auth: &AuthContext,
        request: &WishlistItemRequest,
    ) -> ApiResult<AddWishlistResponse> {
        let product = Products::find_by_id(request.product_id)
            .filter(products::Column::IsActive.eq(true))
            .one(self.db())
            .await?;

        if product.is_none() {
            return Err(ApiError::not_found(
                "Product",
                request.product_id.to_string(),
            ));
        }

        let existing = UserWishlists::find()
            .filter(user_wishlists::Column::UserId.eq(auth.user_id))
            .filter(user_wishlists::Column::ProductId.eq(request.product_id))
            .one(self.db())
            .await?;

        if existing.is_some() {
            return Err(ApiError::conflict("Product is already in your wishlist"));
        }

        let entry = user_wishlists::ActiveModel {
            user_id: Set(auth.user_id),
            product_id: Set(request.product_id),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        let created = entry.insert(self.db()).await?;

        tracing::info!(
            user_id = auth.user_id,
            product_id = request.product_id,
            "product added to wishlist"
        );

        Ok(AddWishlistResponse {
            success: true,
            message: "Product added to wishlist successfully".to_string(),
            wishlist_item_id: created.id,
        })
    }

    /// 移除心愿单条目（幂等：条目不存在也算成功）
    pub async fn remove(
        &self,
        auth: &AuthContext,
        request: &WishlistItemRequest,
    ) -> ApiResult<AckResponse> {
        UserWishlists::delete_many()
            .filter(user_wishlists::Column::UserId.eq(auth.user_id))
            .filter(user_wishlists::Column::ProductId.eq(request.product_id))
            .exec(self.db())
            .await?;

        Ok(AckResponse::ok("Product removed from wishlist"))
    }
}
