//! # 商品实体定义
//!
//! 商品表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 商品实体
///
/// `dp_price` 为经销价，`mrp_price` 为标价，约束 `dp_price <= mrp_price`
/// 由服务层校验。`tags` 为 JSON 字符串数组，`specifications` 为开放的
/// JSON 键值映射。软删除通过 `is_active` 标记，不做物理删除。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub dp_price: f64,
    pub mrp_price: f64,
    pub stock: i32,
    pub tags: Json,
    pub specifications: Option<Json>,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::user_wishlists::Entity")]
    UserWishlists,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::user_wishlists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserWishlists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
