//! # Store API 主程序
//!
//! 电商商城与后台管理平台服务入口

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use store_api::api::ApiServer;
use store_api::{AppConfig, Result, database, logging};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "store-api", about = "E-commerce storefront and admin back-office platform")]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖监听端口
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    logging::init_logging(None);

    // 加载配置
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // 初始化数据库并执行迁移
    let db = database::init_database(&config.database.url).await?;
    database::run_migrations(&db).await?;

    // 启动服务
    tracing::info!("服务启动");
    let server = ApiServer::new(Arc::new(config), Arc::new(db));
    server.serve().await?;

    tracing::info!("服务正常关闭");
    Ok(())
}
