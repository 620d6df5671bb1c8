//! 错误处理单元测试
//!
//! 测试应用错误类型与策略拒绝的转换和提示

use lhn_access::{
    error::AppError,
    models::{Capability, EntityKind, FieldGroup, PageId, Role},
    policy::Denial,
};

// ==================== 错误码测试 ====================

#[test]
fn test_denial_codes() {
    let page: AppError = Denial::page(Role::Nurse, PageId::Administration).into();
    assert_eq!(page.code(), "PAGE_DENIED");

    let capability: AppError = Denial::CapabilityDenied {
        role: Role::Administrative,
        capability: Capability::FieldEdit(FieldGroup::StudentMedical),
    }
    .into();
    assert_eq!(capability.code(), "CAPABILITY_DENIED");

    let record: AppError = Denial::RecordDenied {
        role: Role::Family,
        kind: EntityKind::Students,
        record_id: 43,
    }
    .into();
    assert_eq!(record.code(), "RECORD_DENIED");
    assert!(record.is_denial());
}

#[test]
fn test_non_denial_codes() {
    assert_eq!(AppError::Unauthorized.code(), "UNAUTHORIZED");
    assert_eq!(AppError::AccountDisabled.code(), "ACCOUNT_DISABLED");
    assert_eq!(AppError::Validation("x".to_string()).code(), "VALIDATION_ERROR");
    assert_eq!(AppError::InvalidRole("x".to_string()).code(), "INVALID_ROLE");
    assert!(!AppError::Unauthorized.is_denial());
}

// ==================== 用户消息测试 ====================

#[test]
fn test_denial_messages_are_localized() {
    let err: AppError = Denial::page(Role::Teacher, PageId::SystemManagement).into();
    assert_eq!(err.user_message(), "Bạn không có quyền truy cập trang này.");
    assert!(!err.user_message().contains("System_Management"));
}

#[test]
fn test_internal_details_hidden() {
    let config_error = AppError::Config("Missing database url".to_string());
    assert!(!config_error.user_message().contains("database url"));

    let internal = AppError::Internal("argon2 failure".to_string());
    assert!(!internal.user_message().contains("argon2"));
}

#[test]
fn test_validation_message_passthrough() {
    let err = AppError::Validation("Mật khẩu phải có ít nhất 8 ký tự".to_string());
    assert_eq!(err.user_message(), "Mật khẩu phải có ít nhất 8 ký tự");
}

#[test]
fn test_display_keeps_details_for_logs() {
    let err: AppError = Denial::CapabilityDenied {
        role: Role::Family,
        capability: Capability::Search(EntityKind::Students),
    }
    .into();
    assert_eq!(
        err.to_string(),
        "Access denied: role family lacks capability search(students)"
    );
}
