//! Làng Hữu Nghị 档案管理系统 —— 访问控制库
//! 角色权限表、策略评估器及账户认证

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod policy;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use error::AppError;
pub use models::{Capability, EntityKind, FieldGroup, PageId, Principal, RecordId, Role};
pub use policy::{Denial, PolicyEvaluator};
