//! User repository (数据库访问层)

use crate::{error::AppError, models::user::*, models::RecordId};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct UserRepository {
    db: SqlitePool,
}

impl UserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 创建用户
    pub async fn create(&self, req: &CreateUserRequest, password_hash: &str) -> Result<User, AppError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, full_name, role, scoped_record_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING *
            "#,
        )
        .bind(&req.username)
        .bind(password_hash)
        .bind(&req.full_name)
        .bind(req.role.as_str())
        .bind(req.scoped_record_id)
        .bind(now)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新角色（及家属关联记录）
    pub async fn update_role(
        &self,
        id: i64,
        role: &str,
        scoped_record_id: Option<RecordId>,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = ?2, scoped_record_id = ?3, updated_at = ?4
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(scoped_record_id)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新密码
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                password_hash = ?2,
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 更新账户状态
    pub async fn set_status(&self, id: i64, status: UserStatus) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 删除用户
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 增加失败登录次数，返回新的次数
    pub async fn increment_failed_attempts(&self, id: i64) -> Result<i64, AppError> {
        let attempts: i64 = sqlx::query(
            r#"
            UPDATE users
            SET
                failed_login_attempts = failed_login_attempts + 1,
                updated_at = ?2
            WHERE id = ?1
            RETURNING failed_login_attempts
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?
        .get(0);

        Ok(attempts)
    }

    /// 重置失败登录次数
    pub async fn reset_failed_attempts(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                failed_login_attempts = 0,
                locked_until = NULL,
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 锁定用户账户（计数清零，解锁后重新计算）
    pub async fn lock_account(&self, id: i64, locked_until: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET
                locked_until = ?2,
                failed_login_attempts = 0,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(locked_until)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 列出所有用户
    pub async fn list(&self, limit: u32, offset: u32) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY username LIMIT ?1 OFFSET ?2",
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// 统计某角色的用户数量
    pub async fn count_by_role(&self, role: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users WHERE role = ?1")
            .bind(role)
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }

    /// 统计用户数量
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}
