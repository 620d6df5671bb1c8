//! 账户管理服务
//! 所有操作在写库之前先经过策略评估器（管理页面权限）

use crate::{
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::{user::*, PageId, Principal, RecordId, Role},
    policy::PolicyEvaluator,
    repository::user_repo::UserRepository,
};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

pub struct UserService {
    db: SqlitePool,
    hasher: PasswordHasher,
    evaluator: PolicyEvaluator,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(
        db: SqlitePool,
        config: Arc<AppConfig>,
        evaluator: PolicyEvaluator,
    ) -> Result<Self, AppError> {
        let hasher = PasswordHasher::from_config(&config.security)?;
        Ok(Self {
            db,
            hasher,
            evaluator,
            config,
        })
    }

    fn repo(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    fn require_admin(&self, actor: &Principal) -> Result<(), AppError> {
        self.evaluator.require_page(actor, PageId::Administration)?;
        Ok(())
    }

    /// 角色与关联记录必须配对：仅家属账户携带学生记录 ID
    fn validate_scope(role: Role, scoped_record_id: Option<RecordId>) -> Result<(), AppError> {
        Principal::new(0, "", role, scoped_record_id)?;
        Ok(())
    }

    /// 创建用户
    pub async fn create_user(
        &self,
        actor: &Principal,
        req: CreateUserRequest,
    ) -> Result<UserResponse, AppError> {
        self.require_admin(actor)?;

        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.config)?;
        Self::validate_scope(req.role, req.scoped_record_id)?;

        let repo = self.repo();
        if repo.find_by_username(&req.username).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "Tên đăng nhập đã tồn tại: {}",
                req.username
            )));
        }

        let password_hash = self.hasher.hash(&req.password)?;
        let user = repo.create(&req, &password_hash).await?;

        tracing::info!(
            actor_id = actor.user_id(),
            user_id = user.id,
            role = %user.role,
            "User created"
        );

        Ok(UserResponse::from(user))
    }

    /// 列出用户
    pub async fn list_users(
        &self,
        actor: &Principal,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<UserResponse>, AppError> {
        self.require_admin(actor)?;

        let users = self.repo().list(limit, offset).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// 修改角色（仅管理员）
    pub async fn change_role(
        &self,
        actor: &Principal,
        user_id: i64,
        req: ChangeRoleRequest,
    ) -> Result<UserResponse, AppError> {
        self.require_admin(actor)?;
        Self::validate_scope(req.role, req.scoped_record_id)?;

        if req.role != Role::Admin {
            if actor.user_id() == user_id {
                return Err(AppError::BadRequest(
                    "Không thể tự thay đổi vai trò quản trị của chính mình".to_string(),
                ));
            }
            self.ensure_not_last_admin(user_id).await?;
        }

        let user = self
            .repo()
            .update_role(user_id, req.role.as_str(), req.scoped_record_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        tracing::info!(
            actor_id = actor.user_id(),
            user_id,
            role = %req.role,
            "User role changed"
        );

        Ok(UserResponse::from(user))
    }

    /// 至少保留一个管理员账户
    async fn ensure_not_last_admin(&self, user_id: i64) -> Result<(), AppError> {
        let repo = self.repo();
        let Some(target) = repo.find_by_id(user_id).await? else {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        };

        if target.role == Role::Admin.as_str() && repo.count_by_role(Role::Admin.as_str()).await? <= 1 {
            return Err(AppError::BadRequest(
                "Không thể thay đổi vai trò của quản trị viên cuối cùng".to_string(),
            ));
        }
        Ok(())
    }

    /// 修改密码：本人需验证旧密码，管理员可直接重置他人密码
    pub async fn change_password(
        &self,
        actor: &Principal,
        user_id: i64,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let is_self = actor.user_id() == user_id;
        if !is_self {
            self.require_admin(actor)?;
        }

        let repo = self.repo();
        let user = repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        if is_self {
            self.hasher.verify(&req.old_password, &user.password_hash)?;
        }

        PasswordHasher::validate_password_policy(&req.new_password, &self.config)?;
        let password_hash = self.hasher.hash(&req.new_password)?;
        repo.update_password(user_id, &password_hash).await?;

        tracing::info!(actor_id = actor.user_id(), user_id, "Password changed");
        Ok(())
    }

    /// 启用/禁用账户
    pub async fn set_status(
        &self,
        actor: &Principal,
        user_id: i64,
        status: UserStatus,
    ) -> Result<(), AppError> {
        self.require_admin(actor)?;
        if actor.user_id() == user_id && status == UserStatus::Disabled {
            return Err(AppError::BadRequest(
                "Không thể vô hiệu hóa tài khoản đang đăng nhập".to_string(),
            ));
        }

        if !self.repo().set_status(user_id, status).await? {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        tracing::info!(actor_id = actor.user_id(), user_id, status = status.as_str(), "User status changed");
        Ok(())
    }

    /// 删除用户
    pub async fn delete_user(&self, actor: &Principal, user_id: i64) -> Result<(), AppError> {
        self.require_admin(actor)?;
        if actor.user_id() == user_id {
            return Err(AppError::BadRequest(
                "Không thể xóa tài khoản đang đăng nhập".to_string(),
            ));
        }

        if !self.repo().delete(user_id).await? {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }

        tracing::info!(actor_id = actor.user_id(), user_id, "User deleted");
        Ok(())
    }

    /// 用户表为空时按配置创建初始管理员
    pub async fn ensure_bootstrap_admin(&self) -> Result<Option<UserResponse>, AppError> {
        let repo = self.repo();
        if repo.count().await? > 0 {
            return Ok(None);
        }

        let security = &self.config.security;
        let Some(password) = &security.bootstrap_admin_password else {
            tracing::warn!("User table is empty and no bootstrap admin password is configured");
            return Ok(None);
        };

        let req = CreateUserRequest {
            username: security.bootstrap_admin_username.clone(),
            password: password.expose_secret().clone(),
            full_name: Some(Role::Admin.label().to_string()),
            role: Role::Admin,
            scoped_record_id: None,
        };
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, &self.config)?;

        let password_hash = self.hasher.hash(&req.password)?;
        let user = repo.create(&req, &password_hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
        Ok(Some(UserResponse::from(user)))
    }
}
