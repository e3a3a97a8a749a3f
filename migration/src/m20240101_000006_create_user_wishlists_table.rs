use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserWishlists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserWishlists::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserWishlists::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(UserWishlists::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserWishlists::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_wishlists_user_id")
                            .from(UserWishlists::Table, UserWishlists::UserId)
                            .to(Users::Table, Users::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_wishlists_product_id")
                            .from(UserWishlists::Table, UserWishlists::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (user_id, product_id) 全表唯一
        manager
            .create_index(
                Index::create()
                    .name("idx_user_wishlists_user_product")
                    .table(UserWishlists::Table)
                    .col(UserWishlists::UserId)
                    .col(UserWishlists::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_wishlists_user_id")
                    .table(UserWishlists::Table)
                    .col(UserWishlists::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserWishlists::Table).to_owned())
            .await
    }
}

// 表定义枚举
#[derive(DeriveIden)]
enum UserWishlists {
    Table,
    Id,
    UserId,
    ProductId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
