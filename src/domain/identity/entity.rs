//! Identity entities

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Role custom claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Default,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Default => "default",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "default" => Ok(Self::Default),
            _ => Err(DomainError::invalid_field("role", "Invalid role")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity attached to a verified token, or a listed user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    pub user_id: String,
    pub role: Option<Role>,
}

impl IdentityClaims {
    pub fn new(email: impl Into<String>, user_id: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            email: email.into(),
            user_id: user_id.into(),
            role,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Account created by a sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResult {
    pub user_id: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("default".parse::<Role>().unwrap(), Role::Default);

        let err = "invalid_role".parse::<Role>().unwrap_err();
        assert_eq!(err.detail(), "Invalid role");
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_claims_serialize_missing_role_as_null() {
        let claims = IdentityClaims::new("test@example.com", "uid", None);
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], serde_json::Value::Null);
    }
}
