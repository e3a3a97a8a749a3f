//! # 会话认证服务
//!
//! 登录校验、会话签发与注销。会话保存在 `user_sessions` 表，
//! Cookie 中只携带随机令牌，服务端存 SHA-256 摘要。

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use entity::{
    user_sessions, user_sessions::Entity as UserSessions, users, users::Entity as Users,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::AckResponse;
use crate::auth::{generate_session_token, hash_session_token};

use super::users::UserProfile;

/// 登录请求
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserProfile,
}

/// 新签发的会话（令牌明文只在这里出现一次，由 handler 写入 Cookie）
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: NaiveDateTime,
}

/// 认证服务
pub struct AuthService {
    db: Arc<DatabaseConnection>,
    session_ttl_hours: i64,
}

impl AuthService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl_hours,
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 邮箱 + 密码登录
    ///
    /// 账号不存在与密码错误返回同一种错误，不泄露哪一项出错。
    pub async fn login(
        &self,
        request: &LoginRequest,
    ) -> ApiResult<(LoginResponse, IssuedSession)> {
        let user = Users::find()
            .filter(users::Column::Email.eq(request.email.trim()))
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::auth("Invalid email or password"))?;

        match bcrypt::verify(&request.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(ApiError::auth("Invalid email or password")),
            Err(err) => {
                return Err(ApiError::internal_with_source(
                    "Failed to verify password",
                    err,
                ));
            }
        }

        let session = self.issue_session(user.id).await?;
        tracing::info!(user_id = user.id, "user logged in");

        Ok((LoginResponse { user: user.into() }, session))
    }

    /// 注销：删除令牌对应的会话行（幂等）
    pub async fn logout(&self, token: Option<&str>) -> ApiResult<AckResponse> {
        if let Some(token) = token {
            let token_hash = hash_session_token(token);
            UserSessions::delete_many()
                .filter(user_sessions::Column::TokenHash.eq(token_hash))
                .exec(self.db())
                .await?;
        }
        Ok(AckResponse::ok("Logged out"))
    }

    async fn issue_session(&self, user_id: i32) -> ApiResult<IssuedSession> {
        let token = generate_session_token();
        let now = Utc::now().naive_utc();
        let expires_at = now + Duration::hours(self.session_ttl_hours);

        let session = user_sessions::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(hash_session_token(&token)),
            expires_at: Set(expires_at),
            created_at: Set(now),
            ..Default::default()
        };
        session.insert(self.db()).await?;

        Ok(IssuedSession { token, expires_at })
    }
}
