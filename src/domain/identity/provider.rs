//! Identity provider trait

use async_trait::async_trait;

use super::{IdentityClaims, Role, SignUpResult};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Account management and token verification backend
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email/password account
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, DomainError>;

    /// Exchange credentials for an ID token
    async fn sign_in(&self, email: &str, password: &str) -> Result<String, DomainError>;

    /// Verify an ID token and extract its claims
    async fn verify_token(&self, token: &str) -> Result<IdentityClaims, DomainError>;

    /// List every account with its role claim
    async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError>;

    /// Set the role custom claim of an account
    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError>;

    /// Read the role custom claim of an account
    async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}
