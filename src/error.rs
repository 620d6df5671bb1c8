//! 统一错误模型
//! 定义所有错误类型及面向用户的提示

use crate::policy::Denial;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Account disabled")]
    AccountDisabled,

    #[error("Account locked")]
    AccountLocked,

    #[error("Access denied: {0}")]
    Forbidden(#[from] Denial),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// 存储中的角色值无效（上游数据错误）
    #[error("Invalid role in user record: {0}")]
    InvalidRole(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 稳定的错误码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::AccountDisabled => "ACCOUNT_DISABLED",
            AppError::AccountLocked => "ACCOUNT_LOCKED",
            AppError::Forbidden(Denial::PageDenied { .. }) => "PAGE_DENIED",
            AppError::Forbidden(Denial::CapabilityDenied { .. }) => "CAPABILITY_DENIED",
            AppError::Forbidden(Denial::RecordDenied { .. }) => "RECORD_DENIED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidRole(_) => "INVALID_ROLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Tên đăng nhập hoặc mật khẩu không đúng.".to_string(),
            AppError::AccountDisabled => "Tài khoản đã bị vô hiệu hóa.".to_string(),
            AppError::AccountLocked => {
                "Tài khoản tạm thời bị khóa do đăng nhập sai nhiều lần.".to_string()
            }
            AppError::Forbidden(denial) => denial.user_message().to_string(),
            AppError::NotFound(_) => "Không tìm thấy dữ liệu.".to_string(),
            AppError::BadRequest(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "Lỗi cơ sở dữ liệu.".to_string(),
            AppError::Config(_) => "Lỗi cấu hình hệ thống.".to_string(),
            AppError::InvalidRole(_) | AppError::Internal(_) => "Lỗi hệ thống.".to_string(),
        }
    }

    pub fn is_denial(&self) -> bool {
        matches!(self, AppError::Forbidden(_))
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<crate::models::PrincipalError> for AppError {
    fn from(e: crate::models::PrincipalError) -> Self {
        AppError::Validation(e.to_string())
    }
}
