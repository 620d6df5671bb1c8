//! User domain models

use super::{capability::RecordId, role::Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,

    // Stored as text; parsed into `Role` at login
    pub role: String,
    pub scoped_record_id: Option<RecordId>,

    // Account state
    pub status: String, // enabled, disabled
    pub failed_login_attempts: i64,
    pub locked_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Enabled,
    Disabled,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Enabled => "enabled",
            UserStatus::Disabled => "disabled",
        }
    }
}

impl From<&str> for UserStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "enabled" => UserStatus::Enabled,
            _ => UserStatus::Disabled,
        }
    }
}

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    pub password: String,
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    pub role: Role,
    pub scoped_record_id: Option<RecordId>,
}

/// Change role request (admin only)
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
    pub scoped_record_id: Option<RecordId>,
}

/// Change password request
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// User response (without sensitive data)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: String,
    pub role_label: Option<&'static str>,
    pub scoped_record_id: Option<RecordId>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role_label = user.role.parse::<Role>().ok().map(|r| r.label());
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            role_label,
            scoped_record_id: user.scoped_record_id,
            status: user.status,
            created_at: user.created_at,
        }
    }
}
