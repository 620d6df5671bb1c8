//! 数据模型模块
//! 角色、权限能力、会话身份与用户账户

pub mod auth;
pub mod capability;
pub mod principal;
pub mod role;
pub mod user;

pub use capability::{Capability, EntityKind, FieldGroup, PageId, RecordId};
pub use principal::{Principal, PrincipalError, Session};
pub use role::{is_valid_role, Role};
