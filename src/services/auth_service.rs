//! 认证服务：登录、登出
//! 登录成功后由持久化用户记录构建 Principal

use crate::{
    auth::password::PasswordHasher,
    config::AppConfig,
    error::AppError,
    models::{auth::LoginRequest, user::*, Principal, Role, Session},
    repository::user_repo::UserRepository,
};
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct AuthService {
    db: SqlitePool,
    hasher: PasswordHasher,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(db: SqlitePool, config: Arc<AppConfig>) -> Result<Self, AppError> {
        let hasher = PasswordHasher::from_config(&config.security)?;
        Ok(Self { db, hasher, config })
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<Session, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 获取用户
        let user: User = match user_repo.find_by_username(&req.username).await? {
            Some(user) => user,
            None => {
                tracing::info!(username = %req.username, "Login failed: unknown user");
                metrics::counter!("logins_total", "result" => "failure").increment(1);
                return Err(AppError::Unauthorized);
            }
        };

        // 检查账户状态
        self.check_account_status(&user)?;

        // 验证密码
        if let Err(e) = self.hasher.verify(&req.password, &user.password_hash) {
            self.record_failed_attempt(&user_repo, &user).await?;
            return Err(e);
        }

        // 重置失败次数
        if user.failed_login_attempts > 0 || user.locked_until.is_some() {
            user_repo.reset_failed_attempts(user.id).await?;
        }

        let principal = Self::principal_from_user(&user)?;

        tracing::info!(
            user_id = user.id,
            username = %user.username,
            role = %principal.role(),
            "Login succeeded"
        );
        metrics::counter!("logins_total", "result" => "success").increment(1);

        Ok(Session::start(principal))
    }

    /// 登出：消费会话，Principal 随之销毁
    pub fn logout(&self, session: Session) {
        tracing::info!(
            session_id = %session.id,
            user_id = session.principal.user_id(),
            "Logout"
        );
    }

    /// 由用户记录构建 Principal；存储中的无效角色视为上游数据错误
    pub fn principal_from_user(user: &User) -> Result<Principal, AppError> {
        let role: Role = user.role.parse().map_err(|_| {
            tracing::error!(
                user_id = user.id,
                role = %user.role,
                "User record carries an invalid role"
            );
            AppError::InvalidRole(user.role.clone())
        })?;

        Principal::new(user.id, user.username.clone(), role, user.scoped_record_id).map_err(|e| {
            tracing::error!(user_id = user.id, error = %e, "User record has inconsistent scope");
            AppError::Internal(e.to_string())
        })
    }

    /// 检查账户状态
    fn check_account_status(&self, user: &User) -> Result<(), AppError> {
        if UserStatus::from(user.status.as_str()) == UserStatus::Disabled {
            return Err(AppError::AccountDisabled);
        }

        if let Some(locked_until) = user.locked_until {
            if locked_until > Utc::now() {
                tracing::warn!(user_id = user.id, %locked_until, "Login attempt on locked account");
                return Err(AppError::AccountLocked);
            }
        }

        Ok(())
    }

    /// 记录失败登录，超过阈值后锁定账户
    async fn record_failed_attempt(
        &self,
        user_repo: &UserRepository,
        user: &User,
    ) -> Result<(), AppError> {
        metrics::counter!("logins_total", "result" => "failure").increment(1);

        let attempts = user_repo.increment_failed_attempts(user.id).await?;
        let max_attempts = i64::from(self.config.security.max_login_attempts);

        if attempts >= max_attempts {
            let locked_until = Utc::now()
                + chrono::Duration::seconds(self.config.security.login_lockout_duration_secs as i64);
            user_repo.lock_account(user.id, locked_until).await?;
            tracing::warn!(
                user_id = user.id,
                attempts,
                %locked_until,
                "Account locked after repeated login failures"
            );
        } else {
            tracing::info!(user_id = user.id, attempts, "Login failed: wrong password");
        }

        Ok(())
    }
}
