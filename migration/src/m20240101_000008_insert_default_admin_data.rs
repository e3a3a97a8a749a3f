use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 插入默认管理员用户
        // 引导口令的 bcrypt 哈希，部署后必须立即重置
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Users::Table)
                    .columns([
                        Users::Email,
                        Users::DisplayName,
                        Users::Role,
                        Users::PasswordHash,
                    ])
                    .values_panic([
                        "admin@store.local".into(),
                        "Store Admin".into(),
                        "admin".into(),
                        "$2b$12$LMURIch2lHkm1y1uhuh1HOJ/RDlGjddn6NCiAOCuvsjjmHMXiGTn2".into(),
                    ])
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除默认admin用户及相关数据（级联删除会自动处理）
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users::Table)
                    .and_where(Expr::col(Users::Email).eq("admin@store.local"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

// 表定义枚举
#[derive(DeriveIden)]
enum Users {
    Table,
    Email,
    DisplayName,
    Role,
    PasswordHash,
}
