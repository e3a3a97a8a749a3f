//! # 订单管理服务
//!
//! 管理端订单列表/状态流转与用户订单历史查询。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use entity::{
    order_items, order_items::Entity as OrderItems, orders, orders::Entity as Orders,
    users::Entity as Users,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::AuthContext;
use crate::api::response::Pagination;

use super::shared::{PaginationParams, build_page, ensure_admin, format_timestamp};

/// 合法的订单状态集合
pub const ORDER_STATUSES: [&str; 5] =
    ["pending", "processing", "shipped", "delivered", "cancelled"];

/// 管理端订单列表查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    /// 起始时间（RFC 3339 或 `YYYY-MM-DD`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// 截止时间（日期格式按当天零点截断）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// 用户订单历史查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOrdersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// 更新订单状态请求
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: i32,
    pub status: String,
}

/// 订单行响应（使用下单时的快照字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub product_id: Option<i32>,
    pub product_title: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub product_brand: Option<String>,
    pub product_category: Option<String>,
    pub product_image_url: Option<String>,
}

impl From<order_items::Model> for OrderItemResponse {
    fn from(item: order_items::Model) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_title: item.product_title,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            product_brand: item.product_brand,
            product_category: item.product_category,
            product_image_url: item.product_image_url,
        }
    }
}

/// 订单客户摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: i32,
    pub email: String,
    pub display_name: String,
}

/// 管理端订单响应
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminOrderResponse {
    pub id: i32,
    pub status: String,
    pub total_amount: f64,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub shipping_address: Option<serde_json::Value>,
    pub billing_address: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub customer: Option<CustomerSummary>,
    pub items: Vec<OrderItemResponse>,
}

/// 管理端订单列表结果
#[derive(Debug, Serialize, Deserialize)]
pub struct ListOrdersResult {
    pub orders: Vec<AdminOrderResponse>,
    pub pagination: Pagination,
}

/// 订单主体响应（状态更新接口返回）
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i32,
    pub status: String,
    pub total_amount: f64,
    pub user_id: Option<i32>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<serde_json::Value>,
    pub billing_address: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<orders::Model> for OrderResponse {
    fn from(order: orders::Model) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total_amount: order.total_amount,
            user_id: order.user_id,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            shipping_address: order.shipping_address,
            billing_address: order.billing_address,
            notes: order.notes,
            created_at: format_timestamp(&order.created_at),
            updated_at: format_timestamp(&order.updated_at),
        }
    }
}

/// 状态更新响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOrderStatusResponse {
    pub success: bool,
    pub order: OrderResponse,
}

/// 用户订单响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UserOrderResponse {
    pub id: i32,
    pub status: String,
    pub total_amount: f64,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub shipping_address: Option<serde_json::Value>,
    pub billing_address: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemResponse>,
}

/// 用户订单列表结果
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUserOrdersResult {
    pub orders: Vec<UserOrderResponse>,
    pub pagination: Pagination,
}

/// 订单服务
pub struct OrdersService {
    db: Arc<DatabaseConnection>,
}

impl OrdersService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 管理端订单列表
    pub async fn list(
        &self,
        auth: &AuthContext,
        query: &OrderListQuery,
    ) -> ApiResult<ListOrdersResult> {
        ensure_admin(auth)?;
        let params = PaginationParams::parse(query.page, query.limit)?;
        let filters = OrderFilters::parse(query)?;

        let total = filters.apply(Orders::find()).count(self.db()).await?;

        let rows = filters
            .apply(Orders::find())
            .find_also_related(Users)
            .order_by_desc(orders::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(self.db())
            .await?;

        let order_ids: Vec<i32> = rows.iter().map(|(order, _)| order.id).collect();
        let mut items_by_order = self.fetch_items_grouped(&order_ids).await?;

        let orders = rows
            .into_iter()
            .map(|(order, user)| AdminOrderResponse {
                customer: user.map(|u| CustomerSummary {
                    id: u.id,
                    email: u.email,
                    display_name: u.display_name,
                }),
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                id: order.id,
                status: order.status,
                total_amount: order.total_amount,
                payment_status: order.payment_status,
                payment_method: order.payment_method,
                created_at: format_timestamp(&order.created_at),
                updated_at: format_timestamp(&order.updated_at),
                shipping_address: order.shipping_address,
                billing_address: order.billing_address,
                notes: order.notes,
            })
            .collect();

        Ok(ListOrdersResult {
            orders,
            pagination: build_page(total, params),
        })
    }

    /// 更新订单状态（管理员）
    ///
    /// 任意状态到任意状态的直接覆盖，不做迁移合法性检查。
    pub async fn update_status(
        &self,
        auth: &AuthContext,
        request: &UpdateOrderStatusRequest,
    ) -> ApiResult<UpdateOrderStatusResponse> {
        ensure_admin(auth)?;
        validate_status(&request.status)?;

        let order = Orders::find_by_id(request.order_id)
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("Order", request.order_id.to_string()))?;

        let previous_status = order.status.clone();
        let mut active_model: orders::ActiveModel = order.into();
        active_model.status = Set(request.status.clone());
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(self.db()).await?;

        tracing::info!(
            order_id = updated.id,
            from = %previous_status,
            to = %updated.status,
            admin_id = auth.user_id,
            "order status updated"
        );

        Ok(UpdateOrderStatusResponse {
            success: true,
            order: updated.into(),
        })
    }

    /// 当前用户的订单历史
    pub async fn list_for_user(
        &self,
        auth: &AuthContext,
        query: &UserOrdersQuery,
    ) -> ApiResult<ListUserOrdersResult> {
        let params = PaginationParams::parse(query.page, query.limit)?;
        if let Some(status) = &query.status {
            validate_status(status)?;
        }

        let filtered = || {
            let mut select = Orders::find().filter(orders::Column::UserId.eq(auth.user_id));
            if let Some(status) = &query.status {
                select = select.filter(orders::Column::Status.eq(status));
            }
            select
        };

        let total = filtered().count(self.db()).await?;

        let rows = filtered()
            .order_by_desc(orders::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(self.db())
            .await?;

        let order_ids: Vec<i32> = rows.iter().map(|order| order.id).collect();
        let mut items_by_order = self.fetch_items_grouped(&order_ids).await?;

        let orders = rows
            .into_iter()
            .map(|order| UserOrderResponse {
                items: items_by_order.remove(&order.id).unwrap_or_default(),
                id: order.id,
                status: order.status,
                total_amount: order.total_amount,
                payment_method: order.payment_method,
                payment_status: order.payment_status,
                shipping_address: order.shipping_address,
                billing_address: order.billing_address,
                notes: order.notes,
                created_at: format_timestamp(&order.created_at),
                updated_at: format_timestamp(&order.updated_at),
            })
            .collect();

        Ok(ListUserOrdersResult {
            orders,
            pagination: build_page(total, params),
        })
    }

    /// 拉取一批订单的订单行并按订单分组
    async fn fetch_items_grouped(
        &self,
        order_ids: &[i32],
    ) -> ApiResult<HashMap<i32, Vec<OrderItemResponse>>> {
        let mut grouped: HashMap<i32, Vec<OrderItemResponse>> = HashMap::new();
        if order_ids.is_empty() {
            return Ok(grouped);
        }

        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(order_ids.to_vec()))
            .all(self.db())
            .await?;

        for item in items {
            grouped
                .entry(item.order_id)
                .or_default()
                .push(item.into());
        }
        Ok(grouped)
    }
}

/// 解析后的订单过滤条件
struct OrderFilters {
    status: Option<String>,
    user_id: Option<i32>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl OrderFilters {
    fn parse(query: &OrderListQuery) -> ApiResult<Self> {
        if let Some(status) = &query.status {
            validate_status(status)?;
        }
        if let Some(user_id) = query.user_id {
            if user_id < 1 {
                return Err(ApiError::validation(
                    "Invalid user_id",
                    Some("user_id".to_string()),
                ));
            }
        }
        Ok(Self {
            status: query.status.clone(),
            user_id: query.user_id,
            start: query
                .start_date
                .as_deref()
                .map(|raw| parse_datetime(raw, "start_date"))
                .transpose()?,
            end: query
                .end_date
                .as_deref()
                .map(|raw| parse_datetime(raw, "end_date"))
                .transpose()?,
        })
    }

    fn apply(&self, mut select: Select<Orders>) -> Select<Orders> {
        if let Some(status) = &self.status {
            select = select.filter(orders::Column::Status.eq(status));
        }
        if let Some(user_id) = self.user_id {
            select = select.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(start) = self.start {
            select = select.filter(orders::Column::CreatedAt.gte(start));
        }
        if let Some(end) = self.end {
            select = select.filter(orders::Column::CreatedAt.lte(end));
        }
        select
    }
}

fn parse_datetime(raw: &str, field: &str) -> ApiResult<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }
    Err(ApiError::validation(
        format!("Invalid {field} format"),
        Some(field.to_string()),
    ))
}

fn validate_status(status: &str) -> ApiResult<()> {
    if ORDER_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(ApiError::validation(
            format!("Unknown order status: {status}"),
            Some("status".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_parsing_accepts_both_formats() {
        assert!(parse_datetime("2024-03-01", "start_date").is_ok());
        assert!(parse_datetime("2024-03-01T10:30:00Z", "start_date").is_ok());
        assert!(parse_datetime("March 1st", "start_date").is_err());
    }

    #[test]
    fn status_whitelist_is_closed() {
        for status in ORDER_STATUSES {
            assert!(validate_status(status).is_ok());
        }
        assert!(validate_status("refunded").is_err());
    }
}
