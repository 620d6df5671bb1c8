//! 测试公共模块
//! 提供测试配置、内存数据库和测试账户

#![allow(dead_code)]

use lhn_access::{
    auth::password::PasswordHasher,
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig},
    db,
    models::{user::CreateUserRequest, Principal, RecordId, Role},
    repository::UserRepository,
};
use secrecy::Secret;
use sqlx::SqlitePool;

pub const TEST_PASSWORD: &str = "TestPass123";

/// 创建测试配置（内存库 + 低成本 Argon2 参数）
pub fn create_test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: Secret::new("sqlite::memory:".to_string()),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            password_min_length: 8,
            password_require_uppercase: true,
            password_require_digit: true,
            password_require_special: false,
            max_login_attempts: 3,
            login_lockout_duration_secs: 300,
            argon2_memory_kib: 1024,
            argon2_iterations: 1,
            bootstrap_admin_username: "admin".to_string(),
            bootstrap_admin_password: None,
        },
    }
}

/// 初始化测试数据库
pub async fn setup_test_db(config: &AppConfig) -> SqlitePool {
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_hasher(config: &AppConfig) -> PasswordHasher {
    PasswordHasher::from_config(&config.security).expect("Invalid test hasher params")
}

/// 创建测试用户，返回用户 ID
pub async fn create_test_user(
    pool: &SqlitePool,
    config: &AppConfig,
    username: &str,
    role: Role,
    scoped_record_id: Option<RecordId>,
) -> i64 {
    let req = CreateUserRequest {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        full_name: None,
        role,
        scoped_record_id,
    };
    let hash = test_hasher(config).hash(TEST_PASSWORD).expect("Failed to hash");

    UserRepository::new(pool.clone())
        .create(&req, &hash)
        .await
        .expect("Failed to create test user")
        .id
}

/// 构造测试主体（家属默认关联学生 42）
pub fn principal(role: Role) -> Principal {
    let scope = role.is_scoped().then_some(42);
    Principal::new(1, format!("{}-user", role), role, scope).expect("valid principal")
}
