use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAnalytics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserAnalytics::UserId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserAnalytics::TotalOrders)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserAnalytics::TotalSpent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(UserAnalytics::OrdersPending)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserAnalytics::OrdersCompleted)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserAnalytics::OrdersCancelled)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserAnalytics::LastOrderDate).timestamp())
                    .col(
                        ColumnDef::new(UserAnalytics::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_analytics_user_id")
                            .from(UserAnalytics::Table, UserAnalytics::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserAnalytics::Table).to_owned())
            .await
    }
}

// 表定义枚举
#[derive(DeriveIden)]
enum UserAnalytics {
    Table,
    UserId,
    TotalOrders,
    TotalSpent,
    OrdersPending,
    OrdersCompleted,
    OrdersCancelled,
    LastOrderDate,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
