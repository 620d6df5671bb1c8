//! 用户仓储测试（内存 SQLite）

use chrono::{Duration, Utc};
use lhn_access::{
    models::{user::UserStatus, Role},
    repository::UserRepository,
};

mod common;
use common::{create_test_config, create_test_user, setup_test_db};

#[tokio::test]
async fn test_create_and_find_user() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let id = create_test_user(&pool, &config, "phuhuynh", Role::Family, Some(42)).await;

    let repo = UserRepository::new(pool);
    let by_id = repo.find_by_id(id).await.unwrap().unwrap();
    let by_name = repo.find_by_username("phuhuynh").await.unwrap().unwrap();

    assert_eq!(by_id.id, by_name.id);
    assert_eq!(by_id.role, "family");
    assert_eq!(by_id.scoped_record_id, Some(42));
    assert_eq!(by_id.status, "enabled");
    assert_eq!(by_id.failed_login_attempts, 0);
    assert!(by_id.locked_until.is_none());

    assert!(repo.find_by_username("khongco").await.unwrap().is_none());
}

#[tokio::test]
async fn test_schema_rejects_family_without_record() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let id = create_test_user(&pool, &config, "giaovien", Role::Teacher, None).await;

    let repo = UserRepository::new(pool);
    assert!(repo.update_role(id, "family", None).await.is_err());
    assert!(repo.update_role(id, "teacher", Some(3)).await.is_err());
    assert!(repo.update_role(id, "family", Some(3)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_failed_attempts_and_lock() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let id = create_test_user(&pool, &config, "bacsi", Role::Doctor, None).await;

    let repo = UserRepository::new(pool);
    assert_eq!(repo.increment_failed_attempts(id).await.unwrap(), 1);
    assert_eq!(repo.increment_failed_attempts(id).await.unwrap(), 2);

    let until = Utc::now() + Duration::minutes(5);
    repo.lock_account(id, until).await.unwrap();
    let user = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(user.failed_login_attempts, 0);
    assert!(user.locked_until.is_some_and(|t| t > Utc::now()));

    repo.reset_failed_attempts(id).await.unwrap();
    let user = repo.find_by_id(id).await.unwrap().unwrap();
    assert!(user.locked_until.is_none());
}

#[tokio::test]
async fn test_status_update_and_delete() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let id = create_test_user(&pool, &config, "yta", Role::Nurse, None).await;

    let repo = UserRepository::new(pool);
    assert!(repo.set_status(id, UserStatus::Disabled).await.unwrap());
    let user = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(UserStatus::from(user.status.as_str()), UserStatus::Disabled);

    assert!(repo.delete(id).await.unwrap());
    assert!(!repo.delete(id).await.unwrap());
    assert!(!repo.set_status(id, UserStatus::Enabled).await.unwrap());
}

#[tokio::test]
async fn test_list_and_count() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    for (name, role) in [("c_user", Role::Teacher), ("a_user", Role::Doctor), ("b_user", Role::Nurse)] {
        create_test_user(&pool, &config, name, role, None).await;
    }

    let repo = UserRepository::new(pool);
    assert_eq!(repo.count().await.unwrap(), 3);

    let names: Vec<String> = repo
        .list(2, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["a_user", "b_user"]);

    let rest = repo.list(2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].username, "c_user");

    // LIMIT 0 返回空列表，而不是全部
    assert!(repo.list(0, 0).await.unwrap().is_empty());
    assert_eq!(repo.list(u32::MAX, 0).await.unwrap().len(), 3);
    assert!(repo.list(10, 3).await.unwrap().is_empty());
}
