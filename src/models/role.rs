//! Role registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Administrative,
    Teacher,
    Doctor,
    Nurse,
    Counselor,
    Family,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Administrative,
        Role::Teacher,
        Role::Doctor,
        Role::Nurse,
        Role::Counselor,
        Role::Family,
    ];

    /// Identifier as stored in the users table
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Administrative => "administrative",
            Role::Teacher => "teacher",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::Counselor => "counselor",
            Role::Family => "family",
        }
    }

    /// Vietnamese display label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Quản trị viên",
            Role::Administrative => "Hành chính",
            Role::Teacher => "Giáo viên",
            Role::Doctor => "Bác sĩ",
            Role::Nurse => "Y tá",
            Role::Counselor => "Chuyên viên tâm lý",
            Role::Family => "Gia đình",
        }
    }

    /// Roles restricted to a single linked record
    pub fn is_scoped(&self) -> bool {
        matches!(self, Role::Family)
    }

    /// Roles that may search every entity kind
    pub fn has_blanket_search(&self) -> bool {
        matches!(self, Role::Admin | Role::Administrative)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Returns true iff `value` names one of the seven roles
pub fn is_valid_role(value: &str) -> bool {
    value.parse::<Role>().is_ok()
}
