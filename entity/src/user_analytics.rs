//! # 用户统计汇总实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 用户统计汇总实体
///
/// 预计算的按用户汇总视图，由外部物化任务维护，本服务只读。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_analytics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    pub total_orders: i64,
    pub total_spent: f64,
    pub orders_pending: i64,
    pub orders_completed: i64,
    pub orders_cancelled: i64,
    pub last_order_date: Option<DateTime>,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
