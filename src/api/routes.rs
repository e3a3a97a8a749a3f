//! # 路由配置
//!
//! 定义所有API路由。公开路由直接可达，受保护路由统一挂认证中间件，
//! 管理员角色的判断在各 service 内完成。

use axum::Router;
use axum::routing::{get, post};

use super::middleware::auth_middleware;
use super::server::AppState;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(super::handlers::health::health_check))
        .nest("/products", public_product_routes())
        .nest("/auth", public_auth_routes());

    let protected_routes = Router::new()
        .nest("/products", admin_product_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
        .nest("/analytics", analytics_routes())
        .nest("/auth", session_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// 商品公开路由
fn public_product_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(super::handlers::products::list_products))
        .route("/get", get(super::handlers::products::get_product))
}

/// 商品管理路由
fn admin_product_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(super::handlers::products::create_product))
        .route("/update", post(super::handlers::products::update_product))
        .route("/delete", post(super::handlers::products::delete_product))
}

/// 订单管理路由
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(super::handlers::orders::list_orders))
        .route(
            "/update_status",
            post(super::handlers::orders::update_order_status),
        )
}

/// 用户路由（管理端 + 自助）
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(super::handlers::users::list_users))
        .route(
            "/update_role",
            post(super::handlers::users::update_user_role),
        )
        .route("/orders", get(super::handlers::orders::list_my_orders))
        .route("/wishlist", get(super::handlers::wishlist::list_wishlist))
        .route(
            "/wishlist/add",
            post(super::handlers::wishlist::add_to_wishlist),
        )
        .route(
            "/wishlist/remove",
            post(super::handlers::wishlist::remove_from_wishlist),
        )
        .route(
            "/profile/update",
            post(super::handlers::users::update_profile),
        )
        .route(
            "/analytics",
            get(super::handlers::analytics::user_analytics),
        )
}

/// 统计路由
fn analytics_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(super::handlers::analytics::dashboard))
}

/// 登录/注销路由（无需会话）
fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(super::handlers::auth::login))
        .route("/logout", post(super::handlers::auth::logout))
}

/// 会话查询路由（需要会话）
fn session_routes() -> Router<AppState> {
    Router::new().route("/session", get(super::handlers::auth::session))
}
