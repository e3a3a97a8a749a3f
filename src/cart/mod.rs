//! # 购物车模块
//!
//! 纯客户端状态：一组去重的商品行与派生总计，跨会话持久化。
//! 状态变更收敛为纯 reducer，持久化通过可注入的存储后端完成，
//! 与服务端无任何交互。

pub mod reducer;
pub mod store;

pub use reducer::{CartAction, CartItem, CartItemInput, CartPrice, CartState};
pub use store::{CartStorage, CartStore, FileCartStorage, MemoryCartStorage, STORAGE_KEY};

use thiserror::Error;

/// 购物车错误类型
#[derive(Debug, Error)]
pub enum CartError {
    /// 存储后端读写失败
    #[error("购物车存储错误: {0}")]
    Storage(#[from] std::io::Error),

    /// 持久化内容无法解析
    #[error("购物车数据解析失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 购物车结果类型
pub type CartResult<T> = std::result::Result<T, CartError>;
