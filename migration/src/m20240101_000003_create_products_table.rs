use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Products::Title)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::Description).text())
                    .col(
                        ColumnDef::new(Products::Category)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::Brand).string_len(100).not_null())
                    .col(ColumnDef::new(Products::ImageUrl).string_len(255))
                    .col(ColumnDef::new(Products::DpPrice).double().not_null())
                    .col(ColumnDef::new(Products::MrpPrice).double().not_null())
                    .col(
                        ColumnDef::new(Products::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Products::Tags).json().not_null())
                    .col(ColumnDef::new(Products::Specifications).json())
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Products::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_brand")
                    .table(Products::Table)
                    .col(Products::Brand)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_active")
                    .table(Products::Table)
                    .col(Products::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_dp_price")
                    .table(Products::Table)
                    .col(Products::DpPrice)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

// 表定义枚举
#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Title,
    Description,
    Category,
    Brand,
    ImageUrl,
    DpPrice,
    MrpPrice,
    Stock,
    Tags,
    Specifications,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
