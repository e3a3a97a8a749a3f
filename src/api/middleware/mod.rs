//! # API 中间件
//!
//! 提供认证、请求ID、请求日志等中间件

pub mod auth;
pub mod request_id;

pub use auth::{AuthContext, auth_middleware};
pub use request_id::{RequestId, request_id_middleware};
