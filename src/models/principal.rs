//! Session identity

use super::{capability::RecordId, role::Role};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The authenticated actor making a request
///
/// Built once at login from the persisted user record and dropped at logout.
/// Fields are private so the family/record pairing cannot be broken after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    user_id: i64,
    username: String,
    role: Role,
    scoped_record_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("family principal requires a linked record id")]
    MissingScope,
    #[error("role {0} cannot carry a linked record id")]
    UnexpectedScope(Role),
}

impl Principal {
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        role: Role,
        scoped_record_id: Option<RecordId>,
    ) -> Result<Self, PrincipalError> {
        match (role.is_scoped(), scoped_record_id) {
            (true, None) => return Err(PrincipalError::MissingScope),
            (false, Some(_)) => return Err(PrincipalError::UnexpectedScope(role)),
            _ => {}
        }

        Ok(Self {
            user_id,
            username: username.into(),
            role,
            scoped_record_id,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn scoped_record_id(&self) -> Option<RecordId> {
        self.scoped_record_id
    }
}

/// A login session; owns the principal until logout consumes it
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub principal: Principal,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(principal: Principal) -> Self {
        Self {
            id: Uuid::new_v4(),
            principal,
            started_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_requires_scope() {
        assert_eq!(
            Principal::new(1, "phuhuynh", Role::Family, None),
            Err(PrincipalError::MissingScope)
        );
        let p = Principal::new(1, "phuhuynh", Role::Family, Some(42)).unwrap();
        assert_eq!(p.scoped_record_id(), Some(42));
    }

    #[test]
    fn test_staff_rejects_scope() {
        for role in Role::ALL.into_iter().filter(|r| !r.is_scoped()) {
            assert_eq!(
                Principal::new(2, "nhanvien", role, Some(7)),
                Err(PrincipalError::UnexpectedScope(role))
            );
            assert!(Principal::new(2, "nhanvien", role, None).is_ok());
        }
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let p = Principal::new(3, "bacsi", Role::Doctor, None).unwrap();
        let a = Session::start(p.clone());
        let b = Session::start(p);
        assert_ne!(a.id, b.id);
    }
}
