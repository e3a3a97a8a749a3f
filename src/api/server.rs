//! # API 服务器
//!
//! Axum HTTP服务器，承载商城与后台管理API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Result, StoreError};

/// API 服务器应用状态
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}

/// API 服务器
pub struct ApiServer {
    config: Arc<AppConfig>,
    router: Router,
}

impl ApiServer {
    /// 创建新的 API 服务器
    #[must_use]
    pub fn new(config: Arc<AppConfig>, db: Arc<DatabaseConnection>) -> Self {
        let state = AppState::new(db, Arc::clone(&config));
        let router = Self::create_router(&state);
        Self { config, router }
    }

    /// 创建路由器
    fn create_router(state: &AppState) -> Router {
        let api_routes = super::routes::create_routes(state.clone());

        let mut router = Router::new()
            .nest(&state.config.server.api_prefix, api_routes)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(axum::middleware::from_fn(
                        super::middleware::request_id_middleware,
                    )),
            );

        if state.config.server.enable_cors {
            tracing::info!("CORS enabled for API server");
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// 启动服务器（阻塞直到退出）
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        )
        .parse()
        .map_err(|e| StoreError::ServerStart {
            message: format!("无效的监听地址: {e}"),
            source: None,
        })?;

        tracing::info!("API server listening on {}", addr);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| StoreError::ServerStart {
                message: format!("端口绑定失败 {addr}: {e}"),
                source: Some(e.into()),
            })?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| StoreError::ServerStart {
                message: format!("服务器异常退出: {e}"),
                source: Some(e.into()),
            })?;

        Ok(())
    }
}
