//! # 会话令牌工具
//!
//! 会话令牌的生成、摘要与 Cookie 编解码。令牌明文只出现在
//! Set-Cookie 响应中，服务端仅保存 SHA-256 摘要。

use rand::{Rng, distributions::Alphanumeric};
use sha2::{Digest, Sha256};

/// 会话令牌长度
const TOKEN_LEN: usize = 48;

/// 生成随机会话令牌
#[must_use]
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// 计算令牌的 SHA-256 摘要（hex 编码）
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// 构造会话 Set-Cookie 值
#[must_use]
pub fn build_session_cookie(name: &str, token: &str, max_age_secs: i64) -> String {
    format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// 构造清除会话的 Set-Cookie 值
#[must_use]
pub fn build_clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// 从 Cookie 请求头中提取指定名称的值
#[must_use]
pub fn extract_cookie<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_alphanumeric_and_sized() {
        let token = generate_session_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(char::is_alphanumeric));
    }

    #[test]
    fn hash_is_stable_and_hex() {
        let digest = hash_session_token("abc");
        assert_eq!(digest, hash_session_token("abc"));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, hash_session_token("abd"));
    }

    #[test]
    fn extract_cookie_finds_named_value() {
        let header = "theme=dark; store_session=tok123; lang=en";
        assert_eq!(extract_cookie(header, "store_session"), Some("tok123"));
        assert_eq!(extract_cookie(header, "missing"), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = build_clear_cookie("store_session");
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.starts_with("store_session=;"));
    }
}
