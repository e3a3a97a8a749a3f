//! 集成测试共享夹具：内存库 + 数据播种

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use entity::{order_items, orders, products, user_analytics, users};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use store_api::api::middleware::auth::AuthContext;

/// 连接内存库并执行全部迁移（含默认管理员 admin@store.local，id=1）
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect test db");
    Migrator::up(&db, None).await.expect("run migrations");
    Arc::new(db)
}

/// 迁移种子里的默认管理员
pub const fn admin() -> AuthContext {
    AuthContext {
        user_id: 1,
        is_admin: true,
    }
}

/// 普通用户上下文
pub const fn customer(user_id: i32) -> AuthContext {
    AuthContext {
        user_id,
        is_admin: false,
    }
}

/// 播种一个用户，返回完整模型
pub async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    display_name: &str,
    role: &str,
) -> users::Model {
    let now = Utc::now().naive_utc();
    users::ActiveModel {
        email: Set(email.to_string()),
        display_name: Set(display_name.to_string()),
        role: Set(role.to_string()),
        password_hash: Set(bcrypt::hash("test-password", 4).expect("hash password")),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed user")
}

/// 商品播种参数
pub struct ProductSeed {
    pub title: String,
    pub category: String,
    pub brand: String,
    pub dp_price: f64,
    pub mrp_price: f64,
    pub stock: i32,
    pub is_active: bool,
    pub tags: Vec<&'static str>,
    pub age_days: i64,
}

impl Default for ProductSeed {
    fn default() -> Self {
        Self {
            title: "Exide 150Ah Tubular Battery".to_string(),
            category: "Inverters".to_string(),
            brand: "Exide".to_string(),
            dp_price: 11_500.0,
            mrp_price: 14_200.0,
            stock: 10,
            is_active: true,
            tags: vec![],
            age_days: 0,
        }
    }
}

/// 播种一个商品
pub async fn seed_product(db: &DatabaseConnection, seed: ProductSeed) -> products::Model {
    let stamp = Utc::now().naive_utc() - Duration::days(seed.age_days);
    products::ActiveModel {
        title: Set(seed.title),
        description: Set(None),
        category: Set(seed.category),
        brand: Set(seed.brand),
        image_url: Set(None),
        dp_price: Set(seed.dp_price),
        mrp_price: Set(seed.mrp_price),
        stock: Set(seed.stock),
        tags: Set(serde_json::json!(seed.tags)),
        specifications: Set(None),
        is_active: Set(seed.is_active),
        created_at: Set(stamp),
        updated_at: Set(stamp),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed product")
}

/// 播种一个订单
pub async fn seed_order(
    db: &DatabaseConnection,
    user_id: Option<i32>,
    status: &str,
    total_amount: f64,
    age_days: i64,
) -> orders::Model {
    let stamp = Utc::now().naive_utc() - Duration::days(age_days);
    orders::ActiveModel {
        user_id: Set(user_id),
        status: Set(status.to_string()),
        total_amount: Set(total_amount),
        payment_status: Set(Some("paid".to_string())),
        payment_method: Set(Some("upi".to_string())),
        shipping_address: Set(Some(serde_json::json!({"city": "Pune"}))),
        billing_address: Set(None),
        notes: Set(None),
        created_at: Set(stamp),
        updated_at: Set(stamp),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed order")
}

/// 播种一条订单行（从商品模型取快照字段）
pub async fn seed_order_item(
    db: &DatabaseConnection,
    order_id: i32,
    product: &products::Model,
    quantity: i32,
) -> order_items::Model {
    order_items::ActiveModel {
        order_id: Set(order_id),
        product_id: Set(Some(product.id)),
        product_title: Set(product.title.clone()),
        product_brand: Set(Some(product.brand.clone())),
        product_category: Set(Some(product.category.clone())),
        product_image_url: Set(product.image_url.clone()),
        quantity: Set(quantity),
        unit_price: Set(product.dp_price),
        total_price: Set(product.dp_price * f64::from(quantity)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed order item")
}

/// 播种用户统计汇总
pub async fn seed_analytics(
    db: &DatabaseConnection,
    user_id: i32,
    total_orders: i64,
    total_spent: f64,
    pending: i64,
    completed: i64,
    cancelled: i64,
) -> user_analytics::Model {
    user_analytics::ActiveModel {
        user_id: Set(user_id),
        total_orders: Set(total_orders),
        total_spent: Set(total_spent),
        orders_pending: Set(pending),
        orders_completed: Set(completed),
        orders_cancelled: Set(cancelled),
        last_order_date: Set(Some(Utc::now().naive_utc() - Duration::days(2))),
        updated_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("seed analytics")
}
