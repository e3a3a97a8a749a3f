//! # API 处理器
//!
//! 薄封装：提取请求、调用 service、包装 JSON 响应

pub mod analytics;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist;
