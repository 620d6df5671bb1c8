//! 访问控制策略引擎
//! 静态权限表 + 无状态评估器

pub mod denial;
pub mod evaluator;
pub mod tables;

pub use denial::Denial;
pub use evaluator::PolicyEvaluator;
pub use tables::{allows, AccessMode, PermissionTables, RoleSet};
