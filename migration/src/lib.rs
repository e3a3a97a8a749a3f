pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_user_sessions_table;
mod m20240101_000003_create_products_table;
mod m20240101_000004_create_orders_table;
mod m20240101_000005_create_order_items_table;
mod m20240101_000006_create_user_wishlists_table;
mod m20240101_000007_create_user_analytics_table;
mod m20240101_000008_insert_default_admin_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_user_sessions_table::Migration),
            Box::new(m20240101_000003_create_products_table::Migration),
            Box::new(m20240101_000004_create_orders_table::Migration),
            Box::new(m20240101_000005_create_order_items_table::Migration),
            Box::new(m20240101_000006_create_user_wishlists_table::Migration),
            Box::new(m20240101_000007_create_user_analytics_table::Migration),
            Box::new(m20240101_000008_insert_default_admin_data::Migration),
        ]
    }
}
