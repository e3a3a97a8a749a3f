//! # 统一统计服务
//!
//! 聚合用户个人统计与管理端看板的查询逻辑，供 handler 调用复用。
//! 计数走 SQL 聚合，分布/趋势类指标拉取后在进程内汇总。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use entity::{
    order_items, order_items::Entity as OrderItems, orders, orders::Entity as Orders, products,
    products::Entity as Products, user_analytics::Entity as UserAnalytics, users,
    users::Entity as Users,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::auth::AuthContext;

use super::shared::{AnalyticsPeriod, ensure_admin, format_timestamp};

/// 用户统计查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<AnalyticsPeriod>,
}

/// 按状态的订单数分布
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub pending: i64,
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
    pub cancelled: i64,
}

/// 近期购买行为
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentActivityItem {
    pub product_title: String,
    pub quantity: i32,
    pub total_price: f64,
    pub order_date: String,
    pub status: String,
}

/// 偏好品类
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteCategory {
    pub category: String,
    pub order_count: i64,
    pub total_spent: f64,
}

/// 用户统计响应
///
/// 全量口径来自预计算的 `user_analytics` 汇总；时间窗口径由订单
/// 重扫得出。生命周期分布是混合口径：pending /
/// delivered / cancelled 读汇总，processing / shipped 读窗口。
#[derive(Debug, Serialize, Deserialize)]
pub struct UserAnalyticsResponse {
    pub total_orders: i64,
    pub total_amount_spent: f64,
    pub orders_in_period: i64,
    pub amount_in_period: f64,
    pub average_order_value: f64,
    pub order_status_breakdown: StatusBreakdown,
    pub order_status_breakdown_period: StatusBreakdown,
    pub recent_activity: Vec<RecentActivityItem>,
    pub favorite_categories: Vec<FavoriteCategory>,
    pub last_order_date: Option<String>,
    pub period: String,
}

/// 看板汇总卡片
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub total_orders: i64,
    pub total_products: i64,
    pub total_customers: i64,
}

/// 状态计数
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// 热销商品
#[derive(Debug, Serialize, Deserialize)]
pub struct TopProduct {
    pub id: i32,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub quantity_sold: i64,
    pub revenue: f64,
}

/// 最近订单
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentOrder {
    pub id: i32,
    pub total_amount: f64,
    pub status: String,
    pub payment_status: Option<String>,
    pub created_at: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// 单日营收
#[derive(Debug, Serialize, Deserialize)]
pub struct RevenueTrendPoint {
    pub date: String,
    pub revenue: f64,
    pub order_count: i64,
}

/// 管理端看板响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    pub orders_by_status: Vec<StatusCount>,
    pub top_selling_products: Vec<TopProduct>,
    pub recent_orders: Vec<RecentOrder>,
    pub revenue_trends: Vec<RevenueTrendPoint>,
}

/// 统计服务
pub struct StatisticsService {
    db: Arc<DatabaseConnection>,
}

impl StatisticsService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 当前用户在指定时间窗内的消费统计
    pub async fn user_analytics(
        &self,
        auth: &AuthContext,
        query: &AnalyticsQuery,
    ) -> ApiResult<UserAnalyticsResponse> {
        let period = query.period.unwrap_or_default();
        let end = Utc::now().naive_utc();
        let start = end - period.duration();

        let rollup = UserAnalytics::find_by_id(auth.user_id)
            .one(self.db())
            .await?;

        let orders_in_period = Orders::find()
            .filter(orders::Column::UserId.eq(auth.user_id))
            .filter(orders::Column::CreatedAt.gte(start))
            .filter(orders::Column::CreatedAt.lte(end))
            .order_by_desc(orders::Column::CreatedAt)
            .all(self.db())
            .await?;

        let mut period_breakdown = StatusBreakdown::default();
        let mut amount_in_period = 0.0;
        for order in &orders_in_period {
            bump_status(&mut period_breakdown, &order.status);
            amount_in_period += order.total_amount;
        }

        let order_count = orders_in_period.len() as i64;
        let average_order_value = if order_count > 0 {
            amount_in_period / order_count as f64
        } else {
            0.0
        };

        // 订单已按时间倒序，行条目跟随订单顺序取前 10 条
        let order_ids: Vec<i32> = orders_in_period.iter().map(|o| o.id).collect();
        let order_meta: HashMap<i32, (String, String)> = orders_in_period
            .iter()
            .map(|o| {
                (
                    o.id,
                    (format_timestamp(&o.created_at), o.status.clone()),
                )
            })
            .collect();

        let mut recent_activity = Vec::new();
        let mut category_stats: HashMap<String, (i64, f64)> = HashMap::new();
        if !order_ids.is_empty() {
            let items = OrderItems::find()
                .filter(order_items::Column::OrderId.is_in(order_ids.clone()))
                .all(self.db())
                .await?;

            let mut items_by_order: HashMap<i32, Vec<&order_items::Model>> = HashMap::new();
            for item in &items {
                items_by_order.entry(item.order_id).or_default().push(item);
            }

            for order_id in &order_ids {
                let Some(order_items) = items_by_order.get(order_id) else {
                    continue;
                };
                let (order_date, status) = &order_meta[order_id];
                for item in order_items {
                    if recent_activity.len() < 10 {
                        recent_activity.push(RecentActivityItem {
                            product_title: item.product_title.clone(),
                            quantity: item.quantity,
                            total_price: item.total_price,
                            order_date: order_date.clone(),
                            status: status.clone(),
                        });
                    }
                }
            }

            for item in &items {
                if let Some(category) = &item.product_category {
                    let entry = category_stats.entry(category.clone()).or_default();
                    entry.0 += 1;
                    entry.1 += item.total_price;
                }
            }
        }

        let mut favorite_categories: Vec<FavoriteCategory> = category_stats
            .into_iter()
            .map(|(category, (order_count, total_spent))| FavoriteCategory {
                category,
                order_count,
                total_spent,
            })
            .collect();
        favorite_categories.sort_by(|a, b| b.order_count.cmp(&a.order_count));
        favorite_categories.truncate(5);

        let order_status_breakdown = StatusBreakdown {
            pending: rollup.as_ref().map_or(0, |r| r.orders_pending),
            processing: period_breakdown.processing,
            shipped: period_breakdown.shipped,
            delivered: rollup.as_ref().map_or(0, |r| r.orders_completed),
            cancelled: rollup.as_ref().map_or(0, |r| r.orders_cancelled),
        };

        Ok(UserAnalyticsResponse {
            total_orders: rollup.as_ref().map_or(0, |r| r.total_orders),
            total_amount_spent: rollup.as_ref().map_or(0.0, |r| r.total_spent),
            orders_in_period: order_count,
            amount_in_period,
            average_order_value,
            order_status_breakdown,
            order_status_breakdown_period: period_breakdown,
            recent_activity,
            favorite_categories,
            last_order_date: rollup
                .as_ref()
                .and_then(|r| r.last_order_date.as_ref().map(format_timestamp)),
            period: period.as_str().to_string(),
        })
    }

    /// 管理端销售看板
    pub async fn dashboard(&self, auth: &AuthContext) -> ApiResult<DashboardResponse> {
        ensure_admin(auth)?;

        // 取消的订单不计入销售额
        let total_sales: Option<f64> = Orders::find()
            .select_only()
            .column_as(orders::Column::TotalAmount.sum(), "total")
            .filter(orders::Column::Status.ne("cancelled"))
            .into_tuple()
            .one(self.db())
            .await?
            .flatten();

        let total_orders = Orders::find().count(self.db()).await?;
        let total_products = Products::find()
            .filter(products::Column::IsActive.eq(true))
            .count(self.db())
            .await?;
        let total_customers = Users::find()
            .filter(users::Column::Role.eq("user"))
            .count(self.db())
            .await?;

        let order_rows: Vec<(i32, String, f64, chrono::NaiveDateTime)> = Orders::find()
            .select_only()
            .column(orders::Column::Id)
            .column(orders::Column::Status)
            .column(orders::Column::TotalAmount)
            .column(orders::Column::CreatedAt)
            .into_tuple()
            .all(self.db())
            .await?;

        let mut status_counts: HashMap<String, i64> = HashMap::new();
        for (_, status, _, _) in &order_rows {
            *status_counts.entry(status.clone()).or_default() += 1;
        }
        let mut orders_by_status: Vec<StatusCount> = status_counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        orders_by_status.sort_by(|a, b| a.status.cmp(&b.status));

        // 最近 30 天按天聚合营收（不含取消单）
        let thirty_days_ago = Utc::now().naive_utc() - chrono::Duration::days(30);
        let mut trend_map: HashMap<String, (f64, i64)> = HashMap::new();
        for (_, status, amount, created_at) in &order_rows {
            if status != "cancelled" && *created_at >= thirty_days_ago {
                let day = created_at.date().to_string();
                let entry = trend_map.entry(day).or_default();
                entry.0 += amount;
                entry.1 += 1;
            }
        }
        let mut revenue_trends: Vec<RevenueTrendPoint> = trend_map
            .into_iter()
            .map(|(date, (revenue, order_count))| RevenueTrendPoint {
                date,
                revenue,
                order_count,
            })
            .collect();
        revenue_trends.sort_by(|a, b| a.date.cmp(&b.date));

        let top_selling_products = self.top_selling_products(&order_rows).await?;
        let recent_orders = self.recent_orders().await?;

        Ok(DashboardResponse {
            summary: DashboardSummary {
                total_sales: total_sales.unwrap_or(0.0),
                total_orders: total_orders as i64,
                total_products: total_products as i64,
                total_customers: total_customers as i64,
            },
            orders_by_status,
            top_selling_products,
            recent_orders,
            revenue_trends,
        })
    }

    /// 按销量聚合的前 10 个商品（不含取消单，且商品仍存在）
    async fn top_selling_products(
        &self,
        order_rows: &[(i32, String, f64, chrono::NaiveDateTime)],
    ) -> ApiResult<Vec<TopProduct>> {
        let countable: HashSet<i32> = order_rows
            .iter()
            .filter(|(_, status, _, _)| status != "cancelled")
            .map(|(id, _, _, _)| *id)
            .collect();
        if countable.is_empty() {
            return Ok(Vec::new());
        }

        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(countable.iter().copied()))
            .all(self.db())
            .await?;

        let mut by_product: HashMap<i32, (i64, f64)> = HashMap::new();
        for item in &items {
            if let Some(product_id) = item.product_id {
                let entry = by_product.entry(product_id).or_default();
                entry.0 += i64::from(item.quantity);
                entry.1 += item.total_price;
            }
        }

        let mut ranked: Vec<(i32, i64, f64)> = by_product
            .into_iter()
            .map(|(id, (quantity, revenue))| (id, quantity, revenue))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(10);

        let product_ids: Vec<i32> = ranked.iter().map(|(id, _, _)| *id).collect();
        let product_map: HashMap<i32, products::Model> = Products::find()
            .filter(products::Column::Id.is_in(product_ids))
            .all(self.db())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(ranked
            .into_iter()
            .filter_map(|(id, quantity_sold, revenue)| {
                product_map.get(&id).map(|product| TopProduct {
                    id,
                    title: product.title.clone(),
                    brand: product.brand.clone(),
                    category: product.category.clone(),
                    price: product.dp_price,
                    quantity_sold,
                    revenue,
                })
            })
            .collect())
    }

    /// 最近 10 笔订单（含客户信息）
    async fn recent_orders(&self) -> ApiResult<Vec<RecentOrder>> {
        let rows = Orders::find()
            .find_also_related(Users)
            .order_by_desc(orders::Column::CreatedAt)
            .limit(10)
            .all(self.db())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(order, user)| RecentOrder {
                id: order.id,
                total_amount: order.total_amount,
                status: order.status,
                payment_status: order.payment_status,
                created_at: format_timestamp(&order.created_at),
                customer_name: user.as_ref().map(|u| u.display_name.clone()),
                customer_email: user.map(|u| u.email),
            })
            .collect())
    }
}

fn bump_status(breakdown: &mut StatusBreakdown, status: &str) {
    match status {
        "processing" => breakdown.processing += 1,
        "shipped" => breakdown.shipped += 1,
        "delivered" => breakdown.delivered += 1,
        "cancelled" => breakdown.cancelled += 1,
        // 未知状态按 pending 归类
        _ => breakdown.pending += 1,
    }
}
