//! # 用户管理服务
//!
//! 管理端用户列表/角色变更与用户自助的档案更新。

use std::sync::Arc;

use chrono::Utc;
use entity::{users, users::Entity as Users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::auth::AuthContext;
use crate::api::response::Pagination;

use super::shared::{PaginationParams, build_page, ensure_admin, format_timestamp};

/// 用户列表查询参数
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// 角色更新请求
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub user_id: i32,
    pub new_role: String,
}

/// 档案更新请求
///
/// `avatar_url` 区分「未提供」与「显式置空」，因此是双层 Option。
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

/// 管理端用户行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserResponse {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub registration_date: String,
}

impl From<users::Model> for AdminUserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            registration_date: format_timestamp(&user.created_at),
        }
    }
}

/// 用户列表结果
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResult {
    pub users: Vec<AdminUserResponse>,
    pub pagination: Pagination,
}

/// 用户档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: String,
}

impl From<users::Model> for UserProfile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            role: user.role,
        }
    }
}

/// 档案更新响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// 角色更新响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRoleResponse {
    pub success: bool,
    pub user: AdminUserResponse,
    pub message: String,
}

/// 用户服务
pub struct UsersService {
    db: Arc<DatabaseConnection>,
}

impl UsersService {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 用户列表（管理员）
    pub async fn list(
        &self,
        auth: &AuthContext,
        query: &UserListQuery,
    ) -> ApiResult<ListUsersResult> {
        ensure_admin(auth)?;
        let params = PaginationParams::parse(query.page, query.limit)?;

        let total = filtered_users(query).count(self.db()).await?;

        let rows = filtered_users(query)
            .order_by_desc(users::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit)
            .all(self.db())
            .await?;

        Ok(ListUsersResult {
            users: rows.into_iter().map(AdminUserResponse::from).collect(),
            pagination: build_page(total, params),
        })
    }

    /// 更新用户角色（管理员）
    ///
    /// 拒绝管理员给自己降级，也拒绝无变化的重复设置。
    pub async fn update_role(
        &self,
        auth: &AuthContext,
        request: &UpdateRoleRequest,
    ) -> ApiResult<UpdateRoleResponse> {
        ensure_admin(auth)?;
        validate_role(&request.new_role)?;

        let target = Users::find_by_id(request.user_id)
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("User", request.user_id.to_string()))?;

        if auth.user_id == request.user_id && request.new_role == "user" {
            return Err(ApiError::business(
                "Cannot demote yourself from admin role",
            ));
        }

        if target.role == request.new_role {
            return Err(ApiError::business(format!(
                "User already has the role: {}",
                request.new_role
            )));
        }

        let mut active_model: users::ActiveModel = target.into();
        active_model.role = Set(request.new_role.clone());
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(self.db()).await?;

        tracing::info!(
            user_id = updated.id,
            new_role = %updated.role,
            admin_id = auth.user_id,
            "user role updated"
        );

        let message = format!("User role successfully updated to {}", updated.role);
        Ok(UpdateRoleResponse {
            success: true,
            user: updated.into(),
            message,
        })
    }

    /// 更新当前用户档案
    pub async fn update_profile(
        &self,
        auth: &AuthContext,
        request: &UpdateProfileRequest,
    ) -> ApiResult<ProfileResponse> {
        validate_profile_input(request)?;

        let user = self.fetch_user(auth.user_id).await?;

        // 换邮箱时检查是否已被其他账号占用
        if let Some(email) = &request.email {
            if email != &user.email {
                let taken = Users::find()
                    .filter(users::Column::Email.eq(email))
                    .filter(users::Column::Id.ne(user.id))
                    .one(self.db())
                    .await?;
                if taken.is_some() {
                    return Err(ApiError::business(
                        "Email is already taken by another user",
                    ));
                }
            }
        }

        let mut active_model: users::ActiveModel = user.into();

        if let Some(display_name) = &request.display_name {
            active_model.display_name = Set(display_name.clone());
        }
        if let Some(email) = &request.email {
            active_model.email = Set(email.clone());
        }
        if let Some(avatar_url) = &request.avatar_url {
            active_model.avatar_url = Set(avatar_url.clone());
        }
        active_model.updated_at = Set(Utc::now().naive_utc());

        let updated = active_model.update(self.db()).await?;

        Ok(ProfileResponse {
            user: updated.into(),
        })
    }

    /// 读取当前用户档案
    pub async fn profile(&self, auth: &AuthContext) -> ApiResult<UserProfile> {
        Ok(self.fetch_user(auth.user_id).await?.into())
    }

    async fn fetch_user(&self, user_id: i32) -> ApiResult<users::Model> {
        Users::find_by_id(user_id)
            .one(self.db())
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id.to_string()))
    }
}

fn filtered_users(query: &UserListQuery) -> Select<Users> {
    let mut select = Users::find();

    if let Some(search) = query
        .search
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        let condition = users::Column::Email
            .contains(search)
            .or(users::Column::DisplayName.contains(search));
        select = select.filter(condition);
    }

    select
}

fn validate_role(role: &str) -> ApiResult<()> {
    if matches!(role, "admin" | "user") {
        Ok(())
    } else {
        Err(ApiError::validation(
            format!("Unknown role: {role}"),
            Some("newRole".to_string()),
        ))
    }
}

fn validate_profile_input(request: &UpdateProfileRequest) -> ApiResult<()> {
    if let Some(display_name) = &request.display_name {
        let trimmed = display_name.trim();
        if trimmed.is_empty() {
            return Err(ApiError::validation(
                "Display name cannot be empty",
                Some("displayName".to_string()),
            ));
        }
        if trimmed.len() > 100 {
            return Err(ApiError::validation(
                "Display name too long",
                Some("displayName".to_string()),
            ));
        }
    }
    if let Some(email) = &request.email {
        if email.len() > 100 || !email.contains('@') {
            return Err(ApiError::validation(
                "Invalid email format",
                Some("email".to_string()),
            ));
        }
    }
    if let Some(Some(avatar_url)) = &request.avatar_url {
        url::Url::parse(avatar_url).map_err(|_| {
            ApiError::validation("Invalid avatar URL", Some("avatarUrl".to_string()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_whitelist_is_closed() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("user").is_ok());
        assert!(validate_role("superuser").is_err());
    }

    #[test]
    fn profile_validation_rejects_blank_display_name() {
        let request = UpdateProfileRequest {
            display_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(validate_profile_input(&request).is_err());
    }

    #[test]
    fn profile_validation_allows_explicit_avatar_clear() {
        let request = UpdateProfileRequest {
            avatar_url: Some(None),
            ..Default::default()
        };
        assert!(validate_profile_input(&request).is_ok());
    }
}
