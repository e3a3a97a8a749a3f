//! # API 服务层
//!
//! 聚合各业务域的逻辑，供 HTTP handler 或其它入口复用。
//! 共享的分页/时间窗工具统一从这里再导出。

pub mod auth;
pub mod orders;
pub mod products;
pub mod shared;
pub mod statistics;
pub mod users;
pub mod wishlist;

pub use auth::AuthService;
pub use orders::OrdersService;
pub use products::ProductsService;
pub use statistics::StatisticsService;
pub use users::UsersService;
pub use wishlist::WishlistService;

pub use shared::{AnalyticsPeriod, PaginationParams, build_page};
