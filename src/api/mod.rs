//! # API 模块
//!
//! HTTP 服务器、路由、中间件、处理器与服务层

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, AppState};
