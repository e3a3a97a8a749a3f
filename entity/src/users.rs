//! # 用户实体定义
//!
//! 用户基础信息表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户实体
///
/// `role` 取值为 `admin` 或 `user`，账号从不物理删除。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_sessions::Entity")]
    UserSessions,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::user_wishlists::Entity")]
    UserWishlists,
    #[sea_orm(has_one = "super::user_analytics::Entity")]
    UserAnalytics,
}

impl Related<super::user_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserSessions.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::user_wishlists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserWishlists.def()
    }
}

impl Related<super::user_analytics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAnalytics.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
