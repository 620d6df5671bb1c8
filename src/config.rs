//! 配置系统
//! 从环境变量加载所有配置，使用 Secret 包装敏感信息

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite 连接 URL，例如 "sqlite://lhn.db"
    pub url: Secret<String>,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url.expose_secret().contains(":memory:")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// 密码最小长度
    pub password_min_length: usize,
    /// 密码必须包含大写字母
    pub password_require_uppercase: bool,
    /// 密码必须包含数字
    pub password_require_digit: bool,
    /// 密码必须包含特殊字符
    pub password_require_special: bool,
    /// 最大登录失败次数
    pub max_login_attempts: u32,
    /// 登录锁定持续时间（秒）
    pub login_lockout_duration_secs: u64,
    /// Argon2 内存开销（KiB）
    pub argon2_memory_kib: u32,
    /// Argon2 迭代次数
    pub argon2_iterations: u32,
    /// 初始管理员用户名
    pub bootstrap_admin_username: String,
    /// 初始管理员密码（未设置则不创建）
    pub bootstrap_admin_password: Option<Secret<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("database.url", "sqlite://lhn.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("security.password_min_length", 8)?
            .set_default("security.password_require_uppercase", true)?
            .set_default("security.password_require_digit", true)?
            .set_default("security.password_require_special", false)?
            .set_default("security.max_login_attempts", 5)?
            .set_default("security.login_lockout_duration_secs", 900)?
            .set_default("security.argon2_memory_kib", 19456)?
            .set_default("security.argon2_iterations", 2)?
            .set_default("security.bootstrap_admin_username", "admin")?;

        // 从环境变量加载配置（前缀为 LHN_）
        settings = settings.add_source(
            Environment::with_prefix("LHN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志格式
        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        // 验证数据库连接池配置
        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        // 内存库仅用于测试，限制为单连接
        if self.database.is_in_memory() && self.database.max_connections != 1 {
            return Err(ConfigError::Message(
                "in-memory SQLite requires max_connections = 1".to_string(),
            ));
        }

        // 验证密码策略
        if self.security.password_min_length < 6 || self.security.password_min_length > 128 {
            return Err(ConfigError::Message(
                "password_min_length must be between 6 and 128".to_string(),
            ));
        }

        // 验证登录失败锁定配置
        if self.security.max_login_attempts < 1 || self.security.max_login_attempts > 20 {
            return Err(ConfigError::Message(
                "max_login_attempts must be between 1 and 20".to_string(),
            ));
        }

        if self.security.argon2_memory_kib < 8 || self.security.argon2_iterations < 1 {
            return Err(ConfigError::Message(
                "argon2_memory_kib must be >= 8 and argon2_iterations >= 1".to_string(),
            ));
        }

        if let Some(password) = &self.security.bootstrap_admin_password {
            if password.expose_secret().len() < self.security.password_min_length {
                return Err(ConfigError::Message(
                    "bootstrap_admin_password is shorter than password_min_length".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "LHN_DATABASE__URL",
            "LHN_DATABASE__MAX_CONNECTIONS",
            "LHN_LOGGING__LEVEL",
            "LHN_LOGGING__FORMAT",
            "LHN_SECURITY__BOOTSTRAP_ADMIN_PASSWORD",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database.url.expose_secret(), "sqlite://lhn.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.bootstrap_admin_username, "admin");
        assert!(config.security.bootstrap_admin_password.is_none());
    }

    #[test]
    #[serial]
    fn test_config_validation_invalid_log_level() {
        clear_env();
        std::env::set_var("LHN_LOGGING__LEVEL", "invalid");

        let result = AppConfig::from_env();
        assert!(result.is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_rejects_pooled_memory_db() {
        clear_env();
        std::env::set_var("LHN_DATABASE__URL", "sqlite::memory:");
        std::env::set_var("LHN_DATABASE__MAX_CONNECTIONS", "4");

        assert!(AppConfig::from_env().is_err());

        std::env::set_var("LHN_DATABASE__MAX_CONNECTIONS", "1");
        assert!(AppConfig::from_env().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_rejects_short_bootstrap_password() {
        clear_env();
        std::env::set_var("LHN_SECURITY__BOOTSTRAP_ADMIN_PASSWORD", "abc");

        assert!(AppConfig::from_env().is_err());

        clear_env();
    }
}
