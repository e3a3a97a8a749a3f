//! 统计服务集成测试

mod common;

use common::{
    ProductSeed, admin, customer, seed_analytics, seed_order, seed_order_item, seed_product,
    seed_user, setup_test_db,
};
use store_api::api::error::ApiError;
use store_api::api::services::StatisticsService;
use store_api::api::services::shared::AnalyticsPeriod;
use store_api::api::services::statistics::AnalyticsQuery;

#[tokio::test]
async fn user_analytics_mixes_rollup_and_period_scan() {
    let db = setup_test_db().await;
    let buyer = seed_user(db.as_ref(), "buyer@example.com", "Buyer", "user").await;
    seed_analytics(db.as_ref(), buyer.id, 42, 99_000.0, 3, 30, 2).await;

    let product = seed_product(db.as_ref(), ProductSeed::default()).await;

    // 窗口内两单，窗口外一单
    let recent = seed_order(db.as_ref(), Some(buyer.id), "shipped", 1_000.0, 2).await;
    seed_order_item(db.as_ref(), recent.id, &product, 1).await;
    seed_order(db.as_ref(), Some(buyer.id), "processing", 500.0, 5).await;
    seed_order(db.as_ref(), Some(buyer.id), "delivered", 9_000.0, 45).await;

    let service = StatisticsService::new(db);
    let result = service
        .user_analytics(
            &customer(buyer.id),
            &AnalyticsQuery {
                period: Some(AnalyticsPeriod::Days7),
            },
        )
        .await
        .expect("user analytics");

    // 全量口径来自汇总表
    assert_eq!(result.total_orders, 42);
    assert!((result.total_amount_spent - 99_000.0).abs() < f64::EPSILON);
    assert_eq!(result.order_status_breakdown.pending, 3);
    assert_eq!(result.order_status_breakdown.delivered, 30);
    assert_eq!(result.order_status_breakdown.cancelled, 2);

    // 窗口口径来自订单重扫
    assert_eq!(result.orders_in_period, 2);
    assert!((result.amount_in_period - 1_500.0).abs() < f64::EPSILON);
    assert!((result.average_order_value - 750.0).abs() < f64::EPSILON);
    assert_eq!(result.order_status_breakdown_period.shipped, 1);
    assert_eq!(result.order_status_breakdown_period.processing, 1);
    assert_eq!(result.order_status_breakdown_period.delivered, 0);

    assert_eq!(result.recent_activity.len(), 1);
    assert_eq!(result.recent_activity[0].product_title, product.title);

    assert_eq!(result.favorite_categories.len(), 1);
    assert_eq!(result.favorite_categories[0].category, "Inverters");

    assert_eq!(result.period, "7d");
    assert!(result.last_order_date.is_some());
}

#[tokio::test]
async fn user_analytics_without_rollup_defaults_to_zero() {
    let db = setup_test_db().await;
    let buyer = seed_user(db.as_ref(), "fresh@example.com", "Fresh", "user").await;

    let service = StatisticsService::new(db);
    let result = service
        .user_analytics(&customer(buyer.id), &AnalyticsQuery::default())
        .await
        .expect("empty analytics");

    assert_eq!(result.total_orders, 0);
    assert_eq!(result.orders_in_period, 0);
    assert!(result.recent_activity.is_empty());
    assert!(result.last_order_date.is_none());
    assert_eq!(result.period, "30d");
}

#[tokio::test]
async fn dashboard_totals_exclude_cancelled_sales() {
    let db = setup_test_db().await;
    let buyer = seed_user(db.as_ref(), "buyer@example.com", "Buyer", "user").await;
    let product = seed_product(db.as_ref(), ProductSeed::default()).await;
    seed_product(
        db.as_ref(),
        ProductSeed {
            title: "Shelved".to_string(),
            is_active: false,
            ..Default::default()
        },
    )
    .await;

    let kept = seed_order(db.as_ref(), Some(buyer.id), "delivered", 2_000.0, 1).await;
    seed_order_item(db.as_ref(), kept.id, &product, 2).await;
    let cancelled = seed_order(db.as_ref(), Some(buyer.id), "cancelled", 5_000.0, 1).await;
    seed_order_item(db.as_ref(), cancelled.id, &product, 5).await;

    let service = StatisticsService::new(db);
    let dashboard = service.dashboard(&admin()).await.expect("dashboard");

    // 取消单不计销售额，但计订单总数
    assert!((dashboard.summary.total_sales - 2_000.0).abs() < f64::EPSILON);
    assert_eq!(dashboard.summary.total_orders, 2);
    // 下架商品不计商品总数
    assert_eq!(dashboard.summary.total_products, 1);
    // 种子管理员不算客户
    assert_eq!(dashboard.summary.total_customers, 1);

    let delivered = dashboard
        .orders_by_status
        .iter()
        .find(|s| s.status == "delivered")
        .expect("delivered bucket");
    assert_eq!(delivered.count, 1);

    // 热销榜只统计未取消订单的行
    assert_eq!(dashboard.top_selling_products.len(), 1);
    let top = &dashboard.top_selling_products[0];
    assert_eq!(top.id, product.id);
    assert_eq!(top.quantity_sold, 2);
    assert!((top.revenue - product.dp_price * 2.0).abs() < f64::EPSILON);

    assert_eq!(dashboard.recent_orders.len(), 2);
    assert!(
        dashboard
            .recent_orders
            .iter()
            .all(|o| o.customer_email.as_deref() == Some("buyer@example.com"))
    );

    // 趋势只包含未取消订单
    let trend_orders: i64 = dashboard.revenue_trends.iter().map(|t| t.order_count).sum();
    assert_eq!(trend_orders, 1);
}

#[tokio::test]
async fn dashboard_requires_admin() {
    let db = setup_test_db().await;
    let buyer = seed_user(db.as_ref(), "buyer@example.com", "Buyer", "user").await;

    let service = StatisticsService::new(db);
    let err = service.dashboard(&customer(buyer.id)).await.unwrap_err();
    assert!(matches!(err, ApiError::Permission { .. }));
}
