//! # 应用配置模块
//!
//! TOML 配置文件加载与环境变量覆盖

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Result, StoreError};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 会话认证配置
    #[serde(default)]
    pub auth: AuthConfig,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// API 前缀
    pub api_prefix: String,
    /// 是否启用CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            api_prefix: "/_api".to_string(),
            enable_cors: true,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接URL
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/store.db".to_string(),
        }
    }
}

/// 会话认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 会话 Cookie 名称
    pub cookie_name: String,
    /// 会话有效期（小时）
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "store_session".to_string(),
            session_ttl_hours: 24 * 7,
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// 顺序：配置文件（可选）→ 环境变量覆盖（`DATABASE_URL`、`STORE_API_PORT`）。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| StoreError::Config {
                    message: format!("无法读取配置文件 {}: {e}", path.display()),
                    source: Some(e.into()),
                })?;
                toml::from_str(&raw).map_err(|e| StoreError::Config {
                    message: format!("配置文件解析失败 {}: {e}", path.display()),
                    source: Some(e.into()),
                })?
            }
            None => Self::default(),
        };

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Ok(port) = env::var("STORE_API_PORT") {
            config.server.port = port.parse().map_err(|_| {
                StoreError::config(format!("STORE_API_PORT 不是有效端口: {port}"))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.api_prefix, "/_api");
        assert_eq!(config.auth.cookie_name, "store_session");
        assert!(config.database.url.starts_with("sqlite:"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1"
            port = 9000
            api_prefix = "/_api"
            enable_cors = false
            "#,
        )
        .expect("parse config");

        assert_eq!(config.server.port, 9000);
        // 未给出的段落走默认值
        assert_eq!(config.auth.session_ttl_hours, 24 * 7);
    }
}
