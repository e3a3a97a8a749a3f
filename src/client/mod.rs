//! # 类型化 HTTP 客户端
//!
//! 与服务端 handler 一一配对的调用方：请求/响应 DTO 与服务层共享
//! 同一套类型，所以两端的校验规则天然一致。GET 请求经过一层
//! 按端点区分新鲜度的缓存（列表类 30 秒、商品详情 5 分钟），
//! 写操作直达并使全部缓存失效。

use std::sync::Mutex;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::api::response::{AckResponse, ApiErrorResponse};
use crate::api::services::auth::{LoginRequest, LoginResponse};
use crate::api::services::orders::{
    ListOrdersResult, ListUserOrdersResult, OrderListQuery, UpdateOrderStatusRequest,
    UpdateOrderStatusResponse, UserOrdersQuery,
};
use crate::api::services::products::{
    CreateProductRequest, DeleteProductRequest, DeleteProductResponse, ListProductsResult,
    ProductQuery, ProductResponse, UpdateProductRequest,
};
use crate::api::services::statistics::{
    AnalyticsQuery, DashboardResponse, UserAnalyticsResponse,
};
use crate::api::services::users::{
    ListUsersResult, ProfileResponse, UpdateProfileRequest, UpdateRoleRequest,
    UpdateRoleResponse, UserListQuery, UserProfile,
};
use crate::api::services::wishlist::{
    AddWishlistResponse, ListWishlistResult, WishlistItemRequest, WishlistQuery,
};

/// 列表/统计类端点的缓存窗口
const LIST_TTL: Duration = Duration::from_secs(30);
/// 商品详情的缓存窗口
const DETAIL_TTL: Duration = Duration::from_secs(5 * 60);
/// 缓存容量上限
const CACHE_CAPACITY: u64 = 1024;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    /// 网络/协议层错误
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务端返回的业务错误
    #[error("服务端错误 {status}: [{code}] {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// 基地址拼接失败
    #[error("URL 构造失败: {0}")]
    Url(#[from] url::ParseError),

    /// 响应体解析失败
    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

/// 客户端结果类型
pub type ClientResult<T> = std::result::Result<T, ClientError>;

enum CacheTier {
    List,
    Detail,
}

/// 商城 API 客户端
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
    cookie_name: String,
    session_cookie: Mutex<Option<String>>,
    list_cache: Cache<String, serde_json::Value>,
    detail_cache: Cache<String, serde_json::Value>,
}

impl StoreClient {
    /// 创建客户端
    ///
    /// `base_url` 指向服务根地址（包含 `/_api` 前缀），例如
    /// `http://localhost:8080/_api/`。
    pub fn new(base_url: &str, cookie_name: &str) -> ClientResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(base_url)?,
            cookie_name: cookie_name.to_string(),
            session_cookie: Mutex::new(None),
            list_cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(LIST_TTL)
                .build(),
            detail_cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(DETAIL_TTL)
                .build(),
        })
    }

    // ---- 商品 ----

    /// `GET /products/list`
    pub async fn list_products(&self, query: &ProductQuery) -> ClientResult<ListProductsResult> {
        self.get_json("products/list", Some(query), CacheTier::List)
            .await
    }

    /// `GET /products/get`
    pub async fn get_product(&self, id: i32) -> ClientResult<ProductResponse> {
        self.get_json("products/get", Some(&[("id", id)]), CacheTier::Detail)
            .await
    }

    /// `POST /products/create`
    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> ClientResult<ProductResponse> {
        self.post_json("products/create", request).await
    }

    /// `POST /products/update`
    pub async fn update_product(
        &self,
        request: &UpdateProductRequest,
    ) -> ClientResult<ProductResponse> {
        self.post_json("products/update", request).await
    }

    /// `POST /products/delete`
    pub async fn delete_product(
        &self,
        request: &DeleteProductRequest,
    ) -> ClientResult<DeleteProductResponse> {
        self.post_json("products/delete", request).await
    }

    // ---- 订单 ----

    /// `GET /orders/list`（管理员）
    pub async fn list_orders(&self, query: &OrderListQuery) -> ClientResult<ListOrdersResult> {
        self.get_json("orders/list", Some(query), CacheTier::List)
            .await
    }

    /// `POST /orders/update_status`（管理员）
    pub async fn update_order_status(
        &self,
        request: &UpdateOrderStatusRequest,
    ) -> ClientResult<UpdateOrderStatusResponse> {
        self.post_json("orders/update_status", request).await
    }

    /// `GET /users/orders`
    pub async fn my_orders(&self, query: &UserOrdersQuery) -> ClientResult<ListUserOrdersResult> {
        self.get_json("users/orders", Some(query), CacheTier::List)
            .await
    }

    // ---- 用户 ----

    /// `GET /users/list`（管理员）
    pub async fn list_users(&self, query: &UserListQuery) -> ClientResult<ListUsersResult> {
        self.get_json("users/list", Some(query), CacheTier::List)
            .await
    }

    /// `POST /users/update_role`（管理员）
    pub async fn update_user_role(
        &self,
        request: &UpdateRoleRequest,
    ) -> ClientResult<UpdateRoleResponse> {
        self.post_json("users/update_role", request).await
    }

    /// `POST /users/profile/update`
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> ClientResult<ProfileResponse> {
        self.post_json("users/profile/update", request).await
    }

    // ---- 心愿单 ----

    /// `GET /users/wishlist`
    pub async fn wishlist(&self, query: &WishlistQuery) -> ClientResult<ListWishlistResult> {
        self.get_json("users/wishlist", Some(query), CacheTier::List)
            .await
    }

    /// `POST /users/wishlist/add`
    pub async fn add_to_wishlist(
        &self,
        request: &WishlistItemRequest,
    ) -> ClientResult<AddWishlistResponse> {
        self.post_json("users/wishlist/add", request).await
    }

    /// `POST /users/wishlist/remove`
    pub async fn remove_from_wishlist(
        &self,
        request: &WishlistItemRequest,
    ) -> ClientResult<AckResponse> {
        self.post_json("users/wishlist/remove", request).await
    }

    // ---- 统计 ----

    /// `GET /users/analytics`
    pub async fn user_analytics(
        &self,
        query: &AnalyticsQuery,
    ) -> ClientResult<UserAnalyticsResponse> {
        self.get_json("users/analytics", Some(query), CacheTier::List)
            .await
    }

    /// `GET /analytics/dashboard`（管理员）
    pub async fn dashboard(&self) -> ClientResult<DashboardResponse> {
        self.get_json::<DashboardResponse, ()>("analytics/dashboard", None, CacheTier::List)
            .await
    }

    // ---- 会话 ----

    /// `POST /auth/login`，记住返回的会话 Cookie
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let url = self.endpoint("auth/login")?;
        let response = self.http.post(url).json(request).send().await?;

        if let Some(set_cookie) = response
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) =
                crate::auth::extract_cookie(set_cookie, &self.cookie_name)
            {
                *self.session_cookie.lock().expect("cookie lock poisoned") =
                    Some(token.to_string());
            }
        }

        Self::decode(response).await
    }

    /// `POST /auth/logout`，丢弃本地会话
    pub async fn logout(&self) -> ClientResult<AckResponse> {
        let url = self.endpoint("auth/logout")?;
        let response = self
            .with_session(self.http.post(url))
            .send()
            .await?;
        *self.session_cookie.lock().expect("cookie lock poisoned") = None;
        self.invalidate_caches();
        Self::decode(response).await
    }

    /// `GET /auth/session`
    pub async fn session(&self) -> ClientResult<UserProfile> {
        let url = self.endpoint("auth/session")?;
        let response = self.with_session(self.http.get(url)).send().await?;
        Self::decode(response).await
    }

    // ---- 内部工具 ----

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn with_session(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let cookie = self.session_cookie.lock().expect("cookie lock poisoned");
        match cookie.as_ref() {
            Some(token) => builder.header(
                reqwest::header::COOKIE,
                format!("{}={token}", self.cookie_name),
            ),
            None => builder,
        }
    }

    fn invalidate_caches(&self) {
        self.list_cache.invalidate_all();
        self.detail_cache.invalidate_all();
    }

    async fn get_json<T, Q>(
        &self,
        path: &str,
        query: Option<&Q>,
        tier: CacheTier,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut url = self.endpoint(path)?;
        if let Some(query) = query {
            let encoded = serde_urlencoded_to_string(query)?;
            if !encoded.is_empty() {
                url.set_query(Some(&encoded));
            }
        }
        let key = url.to_string();

        let cache = match tier {
            CacheTier::List => &self.list_cache,
            CacheTier::Detail => &self.detail_cache,
        };

        if let Some(cached) = cache.get(&key).await {
            return Ok(serde_json::from_value(cached)?);
        }

        let response = self.with_session(self.http.get(url)).send().await?;
        let value: serde_json::Value = Self::decode(response).await?;
        cache.insert(key, value.clone()).await;

        Ok(serde_json::from_value(value)?)
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.endpoint(path)?;
        let response = self
            .with_session(self.http.post(url).json(body))
            .send()
            .await?;
        let result = Self::decode(response).await;
        if result.is_ok() {
            // 写操作成功后，读缓存一律作废
            self.invalidate_caches();
        }
        result
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let status_code = status.as_u16();
        match response.json::<ApiErrorResponse>().await {
            Ok(body) => Err(ClientError::Api {
                status: status_code,
                code: body.error.code,
                message: body.error.message,
            }),
            Err(_) => Err(ClientError::Api {
                status: status_code,
                code: "UNKNOWN".to_string(),
                message: format!("HTTP {status_code}"),
            }),
        }
    }
}

fn serde_urlencoded_to_string<Q: Serialize + ?Sized>(query: &Q) -> ClientResult<String> {
    // reqwest 内部同样使用 serde_urlencoded；这里手工编码以便
    // 把完整 URL 作为缓存键。
    let value = serde_json::to_value(query)?;
    let mut pairs: Vec<(String, String)> = Vec::new();
    flatten_query(&value, &mut pairs);
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, val) in pairs {
        serializer.append_pair(&key, &val);
    }
    Ok(serializer.finish())
}

fn flatten_query(value: &serde_json::Value, pairs: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                match val {
                    serde_json::Value::Null => {}
                    serde_json::Value::String(s) => pairs.push((key.clone(), s.clone())),
                    other => pairs.push((key.clone(), other.to_string())),
                }
            }
        }
        serde_json::Value::Array(entries) => {
            // [("id", 1)] 形式的元组列表
            for entry in entries {
                if let serde_json::Value::Array(pair) = entry {
                    if let [serde_json::Value::String(key), val] = pair.as_slice() {
                        let rendered = match val {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        pairs.push((key.clone(), rendered));
                    }
                }
            }
        }
        _ => {}
    }
}
