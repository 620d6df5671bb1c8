//! 策略拒绝类型

use crate::models::{Capability, EntityKind, PageId, RecordId, Role};
use thiserror::Error;

/// A policy denial; never an exception for well-formed input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("role {role} may not open page {page}")]
    PageDenied { role: Role, page: String },

    #[error("role {role} lacks capability {capability}")]
    CapabilityDenied { role: Role, capability: Capability },

    #[error("role {role} may not access {kind} record {record_id}")]
    RecordDenied {
        role: Role,
        kind: EntityKind,
        record_id: RecordId,
    },
}

impl Denial {
    pub fn page(role: Role, page: PageId) -> Self {
        Denial::PageDenied {
            role,
            page: page.as_str().to_string(),
        }
    }

    /// 指标标签
    pub fn kind(&self) -> &'static str {
        match self {
            Denial::PageDenied { .. } => "page",
            Denial::CapabilityDenied { .. } => "capability",
            Denial::RecordDenied { .. } => "record",
        }
    }

    /// 面向用户的越南语提示
    pub fn user_message(&self) -> &'static str {
        match self {
            Denial::PageDenied { .. } => "Bạn không có quyền truy cập trang này.",
            Denial::CapabilityDenied { .. } => "Bạn không có quyền thực hiện thao tác này.",
            Denial::RecordDenied { .. } => "Bạn không có quyền xem hồ sơ này.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_kinds() {
        assert_eq!(Denial::page(Role::Nurse, PageId::Administration).kind(), "page");
        let denial = Denial::CapabilityDenied {
            role: Role::Family,
            capability: Capability::Print,
        };
        assert_eq!(denial.kind(), "capability");
        assert_eq!(denial.to_string(), "role family lacks capability print");
    }

    #[test]
    fn test_user_message_hides_details() {
        let denial = Denial::RecordDenied {
            role: Role::Family,
            kind: EntityKind::Students,
            record_id: 43,
        };
        let message = denial.user_message();
        assert!(!message.contains("43"));
        assert!(!message.contains("family"));
    }
}
