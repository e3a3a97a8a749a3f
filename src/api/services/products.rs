//! # 商品管理服务
//!
//! 集中商品的查询、创建、更新与软删除业务逻辑，供 HTTP handler 复用。

use std::sync::Arc;

use chrono::Utc;
use entity::{products, products::Entity as Products};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::AuthContext;
use crate::api::response::Pagination;

use super::shared::{PaginationParams, build_page, ensure_admin, format_timestamp};

/// 固定的商品分类集合
pub const CATEGORIES: [&str; 8] = [
    "Battery Tray",
    "Four-Wheeler Batteries",
    "Inverter Trolley",
    "Inverters",
    "Others",
    "Solar PCU",
    "Two-Wheeler Batteries",
    "UPS Battery",
];

/// 商品列表查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// 逗号分隔的标签列表，命中任意一个即保留
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// 创建商品请求
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub dp_price: f64,
    pub mrp_price: f64,
    #[serde(default)]
    pub stock: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 更新商品请求（提供哪些字段就更新哪些字段）
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrp_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<serde_json::Value>,
}

/// 删除商品请求
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductRequest {
    pub product_id: i32,
}

/// 删除商品响应
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProductResponse {
    pub success: bool,
    pub message: String,
    pub product_id: i32,
}

/// 商品响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub brand: String,
    pub category: String,
    pub dp_price: f64,
    pub mrp_price: f64,
    pub image_url: Option<String>,
    pub stock: i32,
    pub stock_status: String,
    pub is_active: bool,
    pub tags: Vec<String>,
    pub specifications: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<products::Model> for ProductResponse {
    fn from(product: products::Model) -> Self {
        let stock_status = if product.stock > 0 {
            "in_stock"
        } else {
            "out_of_stock"
        };
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            brand: product.brand,
            category: product.category,
            dp_price: product.dp_price,
            mrp_price: product.mrp_price,
            image_url: product.image_url,
            stock: product.stock,
            stock_status: stock_status.to_string(),
            is_active: product.is_active,
            tags: decode_tags(&product.tags),
            specifications: product.specifications,
            created_at: format_timestamp(&product.created_at),
            updated_at: format_timestamp(&product.updated_at),
        }
    }
}

/// 商品列表结果
#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsResult {
    pub products: Vec<ProductResponse>,
    pub pagination: Pagination,
}

/// 商品服务
pub struct ProductsService {
    db: Arc<DatabaseConnection>,
}

impl ProductsService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 商品列表（仅在售商品，公开接口）
    pub async fn list(&self, query: &ProductQuery) -> ApiResult<ListProductsResult> {
        let params = PaginationParams::parse(query.page, query.limit)?;
        validate_sort(query)?;

        let tag_filter = parse_tag_filter(query.tags.as_deref());

        let select = apply_product_sort(filtered_products(query), query);

        // 标签过滤需要读 JSON 列，放在内存中做；
        // 其余过滤与分页仍然全部下推到 SQL。
        if let Some(tags) = tag_filter {
            let rows = select.all(self.db()).await?;
            let matched: Vec<products::Model> = rows
                .into_iter()
                .filter(|p| tags_overlap(&p.tags, &tags))
                .collect();
            let total = matched.len() as u64;
            let start = usize::try_from(params.offset()).unwrap_or(usize::MAX);
            let products: Vec<ProductResponse> = matched
                .into_iter()
                .skip(start)
                .take(params.limit as usize)
                .map(ProductResponse::from)
                .collect();
            return Ok(ListProductsResult {
                products,
                pagination: build_page(total, params),
            });
        }

        let total = filtered_products(query).count(self.db()).await?;

        let rows = select
            .offset(params.offset())
            .limit(params.limit)
            .all(self.db())
            .await?;

        Ok(ListProductsResult {
            products: rows.into_iter().map(ProductResponse::from).collect(),
            pagination: build_page(total, params),
        })
    }

    /// 获取单个在售商品
    pub async fn get(&self, product_id: i32) -> ApiResult<ProductResponse> {
        let product = Products::find_by_id(product_id)
            .filter(products::Column::IsActive.eq(true))
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("Product", product_id.to_string()))?;

        Ok(product.into())
    }

    /// 创建商品（管理员）
    pub async fn create(
        &self,
        auth: &AuthContext,
        request: &CreateProductRequest,
    ) -> ApiResult<ProductResponse> {
        ensure_admin(auth)?;
        validate_new_product(request)?;

        let now = Utc::now().naive_utc();
        let model = products::ActiveModel {
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            category: Set(request.category.clone()),
            brand: Set(request.brand.clone()),
            image_url: Set(request.image_url.clone()),
            dp_price: Set(request.dp_price),
            mrp_price: Set(request.mrp_price),
            stock: Set(request.stock),
            tags: Set(serde_json::json!(request.tags)),
            specifications: Set(request.specifications.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(self.db()).await?;
        tracing::info!(product_id = created.id, admin_id = auth.user_id, "product created");
        Ok(created.into())
    }

    /// 更新商品（管理员，仅更新提供的字段）
    pub async fn update(
        &self,
        auth: &AuthContext,
        request: &UpdateProductRequest,
    ) -> ApiResult<ProductResponse> {
        ensure_admin(auth)?;
        validate_update_fields(request)?;

        let product = Products::find_by_id(request.id)
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("Product", request.id.to_string()))?;

        // 价格不变式按合并后的生效值校验
        let effective_dp = request.dp_price.unwrap_or(product.dp_price);
        let effective_mrp = request.mrp_price.unwrap_or(product.mrp_price);
        if effective_dp > effective_mrp {
            return Err(ApiError::validation(
                "DP price cannot be higher than MRP price",
                Some("dp_price".to_string()),
            ));
        }

        let mut active_model: products::ActiveModel = product.into();

        if let Some(title) = &request.title {
            active_model.title = Set(title.clone());
        }
        if let Some(description) = &request.description {
            active_model.description = Set(Some(description.clone()));
        }
        if let Some(brand) = &request.brand {
            active_model.brand = Set(brand.clone());
        }
        if let Some(category) = &request.category {
            active_model.category = Set(category.clone());
        }
        if let Some(dp_price) = request.dp_price {
            active_model.dp_price = Set(dp_price);
        }
        if let Some(mrp_price) = request.mrp_price {
            active_model.mrp_price = Set(mrp_price);
        }
        if let Some(stock) = request.stock {
            active_model.stock = Set(stock);
        }
        if let Some(is_active) = request.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(image_url) = &request.image_url {
            active_model.image_url = Set(Some(image_url.clone()));
        }
        if let Some(tags) = &request.tags {
            active_model.tags = Set(serde_json::json!(tags));
        }
        if let Some(specifications) = &request.specifications {
            active_model.specifications = Set(Some(specifications.clone()));
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(self.db()).await?;
        tracing::info!(product_id = updated.id, admin_id = auth.user_id, "product updated");
        Ok(updated.into())
    }

    /// 软删除商品（管理员）
    ///
    /// 已下架的商品再次删除返回 400。
    pub async fn delete(
        &self,
        auth: &AuthContext,
        request: &DeleteProductRequest,
    ) -> ApiResult<DeleteProductResponse> {
        ensure_admin(auth)?;

        let product = Products::find_by_id(request.product_id)
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("Product", request.product_id.to_string()))?;

        if !product.is_active {
            return Err(ApiError::business("Product is already deleted"));
        }

        let product_id = product.id;
        let mut active_model: products::ActiveModel = product.into();
        active_model.is_active = Set(false);
        active_model.updated_at = Set(Utc::now().naive_utc());
        active_model.update(self.db()).await?;

        tracing::info!(product_id, admin_id = auth.user_id, "product soft deleted");

        Ok(DeleteProductResponse {
            success: true,
            message: "Product deleted successfully".to_string(),
            product_id,
        })
    }
}

fn filtered_products(query: &ProductQuery) -> Select<Products> {
    let mut select = Products::find().filter(products::Column::IsActive.eq(true));

    if let Some(category) = query
        .category
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        select = select.filter(products::Column::Category.eq(category));
    }

    if let Some(brand) = query
        .brand
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        select = select.filter(products::Column::Brand.contains(brand));
    }

    if let Some(min_price) = query.min_price {
        select = select.filter(products::Column::DpPrice.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        select = select.filter(products::Column::DpPrice.lte(max_price));
    }

    if let Some(search) = query
        .search
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        let condition = products::Column::Title
            .contains(search)
            .or(products::Column::Description.contains(search))
            .or(products::Column::Brand.contains(search));
        select = select.filter(condition);
    }

    select
}

fn apply_product_sort(select: Select<Products>, query: &ProductQuery) -> Select<Products> {
    let sort_field = query.sort_by.as_deref().unwrap_or("created_at");
    let asc = matches!(query.sort_order.as_deref(), Some("asc"));

    match sort_field {
        "price" => {
            if asc {
                select.order_by_asc(products::Column::DpPrice)
            } else {
                select.order_by_desc(products::Column::DpPrice)
            }
        }
        "name" => {
            if asc {
                select.order_by_asc(products::Column::Title)
            } else {
                select.order_by_desc(products::Column::Title)
            }
        }
        _ => {
            if asc {
                select.order_by_asc(products::Column::CreatedAt)
            } else {
                select.order_by_desc(products::Column::CreatedAt)
            }
        }
    }
}

fn parse_tag_filter(raw: Option<&str>) -> Option<Vec<String>> {
    let tags: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}

fn decode_tags(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

fn tags_overlap(stored: &serde_json::Value, wanted: &[String]) -> bool {
    let stored = decode_tags(stored);
    stored.iter().any(|t| wanted.iter().any(|w| w == t))
}

fn validate_sort(query: &ProductQuery) -> ApiResult<()> {
    if let Some(sort_by) = &query.sort_by {
        if !matches!(sort_by.as_str(), "price" | "name" | "created_at") {
            return Err(ApiError::validation(
                format!("Unsupported sortBy value: {sort_by}"),
                Some("sortBy".to_string()),
            ));
        }
    }
    if let Some(sort_order) = &query.sort_order {
        if !matches!(sort_order.as_str(), "asc" | "desc") {
            return Err(ApiError::validation(
                format!("Unsupported sortOrder value: {sort_order}"),
                Some("sortOrder".to_string()),
            ));
        }
    }
    Ok(())
}

fn validate_category(category: &str) -> ApiResult<()> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ApiError::validation(
            format!("Unknown category: {category}"),
            Some("category".to_string()),
        ))
    }
}

fn validate_image_url(image_url: &str) -> ApiResult<()> {
    url::Url::parse(image_url).map_err(|_| {
        ApiError::validation("Invalid image URL", Some("imageUrl".to_string()))
    })?;
    Ok(())
}

fn validate_new_product(request: &CreateProductRequest) -> ApiResult<()> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::validation(
            "Title is required",
            Some("title".to_string()),
        ));
    }
    if title.len() > 255 {
        return Err(ApiError::validation(
            "Title too long",
            Some("title".to_string()),
        ));
    }

    let brand = request.brand.trim();
    if brand.is_empty() {
        return Err(ApiError::validation(
            "Brand is required",
            Some("brand".to_string()),
        ));
    }
    if brand.len() > 100 {
        return Err(ApiError::validation(
            "Brand name too long",
            Some("brand".to_string()),
        ));
    }

    validate_category(&request.category)?;

    if request.dp_price <= 0.0 {
        return Err(ApiError::validation(
            "DP price must be positive",
            Some("dpPrice".to_string()),
        ));
    }
    if request.mrp_price <= 0.0 {
        return Err(ApiError::validation(
            "MRP price must be positive",
            Some("mrpPrice".to_string()),
        ));
    }
    if request.dp_price > request.mrp_price {
        return Err(ApiError::validation(
            "DP price cannot be higher than MRP price",
            Some("dpPrice".to_string()),
        ));
    }

    if request.stock < 0 {
        return Err(ApiError::validation(
            "Stock cannot be negative",
            Some("stock".to_string()),
        ));
    }

    if let Some(image_url) = &request.image_url {
        validate_image_url(image_url)?;
    }

    Ok(())
}

fn validate_update_fields(request: &UpdateProductRequest) -> ApiResult<()> {
    if let Some(title) = &request.title {
        let title = title.trim();
        if title.is_empty() || title.len() > 255 {
            return Err(ApiError::validation(
                "Title must be 1-255 characters",
                Some("title".to_string()),
            ));
        }
    }
    if let Some(brand) = &request.brand {
        let brand = brand.trim();
        if brand.is_empty() || brand.len() > 100 {
            return Err(ApiError::validation(
                "Brand must be 1-100 characters",
                Some("brand".to_string()),
            ));
        }
    }
    if let Some(category) = &request.category {
        validate_category(category)?;
    }
    if let Some(dp_price) = request.dp_price {
        if dp_price <= 0.0 {
            return Err(ApiError::validation(
                "DP price must be positive",
                Some("dp_price".to_string()),
            ));
        }
    }
    if let Some(mrp_price) = request.mrp_price {
        if mrp_price <= 0.0 {
            return Err(ApiError::validation(
                "MRP price must be positive",
                Some("mrp_price".to_string()),
            ));
        }
    }
    if let Some(stock) = request.stock {
        if stock < 0 {
            return Err(ApiError::validation(
                "Stock cannot be negative",
                Some("stock".to_string()),
            ));
        }
    }
    if let Some(image_url) = &request.image_url {
        validate_image_url(image_url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_filter_parsing_trims_and_drops_empty() {
        assert_eq!(
            parse_tag_filter(Some("solar, inverter ,")),
            Some(vec!["solar".to_string(), "inverter".to_string()])
        );
        assert_eq!(parse_tag_filter(Some("  ")), None);
        assert_eq!(parse_tag_filter(None), None);
    }

    #[test]
    fn tags_overlap_matches_any() {
        let stored = serde_json::json!(["solar", "battery"]);
        assert!(tags_overlap(&stored, &["battery".to_string()]));
        assert!(!tags_overlap(&stored, &["ups".to_string()]));
    }

    #[test]
    fn create_validation_rejects_inverted_prices() {
        let request = CreateProductRequest {
            title: "Test".to_string(),
            description: None,
            category: "Inverters".to_string(),
            brand: "Luminous".to_string(),
            image_url: None,
            dp_price: 200.0,
            mrp_price: 100.0,
            stock: 0,
            specifications: None,
            tags: vec![],
        };
        let err = validate_new_product(&request).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation { field: Some(ref f), .. } if f == "dpPrice"
        ));
    }

    #[test]
    fn create_validation_rejects_unknown_category() {
        let request = CreateProductRequest {
            title: "Test".to_string(),
            description: None,
            category: "Gadgets".to_string(),
            brand: "Luminous".to_string(),
            image_url: None,
            dp_price: 100.0,
            mrp_price: 150.0,
            stock: 0,
            specifications: None,
            tags: vec![],
        };
        assert!(validate_new_product(&request).is_err());
    }
}
