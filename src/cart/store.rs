//! # 购物车存储
//!
//! 显式的 load/save 边界：store 持有内存态，每次变更后整体写回。
//! 存储后端通过 trait 注入，文件后端用于真实持久化，内存后端用于测试。

use std::path::PathBuf;
use std::sync::Mutex;

use super::reducer::{self, CartAction, CartItemInput, CartState};
use super::{CartError, CartResult};

/// 持久化键名（与浏览器端 `localStorage["shoppingCart"]` 对应）
pub const STORAGE_KEY: &str = "shoppingCart";

/// 购物车存储后端
pub trait CartStorage {
    /// 读取序列化的购物车（不存在返回 None）
    fn load(&self) -> CartResult<Option<String>>;

    /// 整体写回序列化的购物车
    fn save(&self, raw: &str) -> CartResult<()>;
}

/// 文件存储后端
///
/// 在 `dir/shoppingCart.json` 下保存购物车 JSON。
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut path = dir.into();
        path.push(format!("{STORAGE_KEY}.json"));
        Self { path }
    }
}

impl CartStorage for FileCartStorage {
    fn load(&self) -> CartResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CartError::Storage(err)),
        }
    }

    fn save(&self, raw: &str) -> CartResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// 内存存储后端（测试用）
#[derive(Default)]
pub struct MemoryCartStorage {
    inner: Mutex<Option<String>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> CartResult<Option<String>> {
        Ok(self.inner.lock().expect("cart storage poisoned").clone())
    }

    fn save(&self, raw: &str) -> CartResult<()> {
        *self.inner.lock().expect("cart storage poisoned") = Some(raw.to_string());
        Ok(())
    }
}

/// 存储背书的购物车
///
/// 打开时从存储恢复，之后每次动作都先过纯 reducer 再整体写回。
/// 无法解析的持久化内容按空购物车处理，不让坏数据卡死用户。
pub struct CartStore<S: CartStorage> {
    storage: S,
    state: CartState,
}

impl<S: CartStorage> CartStore<S> {
    /// 打开购物车，恢复已持久化的状态
    pub fn open(storage: S) -> CartResult<Self> {
        let state = match storage.load()? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => CartState::default(),
        };
        Ok(Self { storage, state })
    }

    /// 当前状态
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// 应用动作并持久化
    pub fn dispatch(&mut self, action: &CartAction) -> CartResult<&CartState> {
        self.state = reducer::apply(&self.state, action);
        let raw = serde_json::to_string(&self.state)?;
        self.storage.save(&raw)?;
        Ok(&self.state)
    }

    /// 加入商品
    pub fn add_item(&mut self, item: CartItemInput, quantity: u32) -> CartResult<&CartState> {
        self.dispatch(&CartAction::AddItem { item, quantity })
    }

    /// 移除商品行
    pub fn remove_item(&mut self, product_id: &str) -> CartResult<&CartState> {
        self.dispatch(&CartAction::RemoveItem {
            product_id: product_id.to_string(),
        })
    }

    /// 修改数量（<= 0 移除）
    pub fn update_quantity(&mut self, product_id: &str, quantity: i32) -> CartResult<&CartState> {
        self.dispatch(&CartAction::UpdateQuantity {
            product_id: product_id.to_string(),
            quantity,
        })
    }

    /// 清空购物车
    pub fn clear(&mut self) -> CartResult<&CartState> {
        self.dispatch(&CartAction::Clear)
    }

    /// 商品是否在购物车中
    #[must_use]
    pub fn is_in_cart(&self, product_id: &str) -> bool {
        self.state.is_in_cart(product_id)
    }

    /// 商品数量
    #[must_use]
    pub fn item_quantity(&self, product_id: &str) -> u32 {
        self.state.item_quantity(product_id)
    }
}
