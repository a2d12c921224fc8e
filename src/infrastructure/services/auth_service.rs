//! Auth service - registration, login and role management over an identity provider

use std::sync::Arc;

use tracing::info;

use crate::domain::identity::{require_admin, IdentityClaims, IdentityProvider, Role};
use crate::domain::DomainError;

/// Account created through registration
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub user_id: String,
    pub email: String,
    pub role: Option<Role>,
}

/// Prefix provider rejections, keep other failures as they are
fn rejected_with(prefix: &'static str) -> impl Fn(DomainError) -> DomainError {
    move |err| match err {
        DomainError::ProviderRejected { provider, message } => {
            DomainError::provider_rejected(provider, format!("{}: {}", prefix, message))
        }
        other => other,
    }
}

/// Any failure becomes a rejection carrying `prefix`
fn failed_with(prefix: &'static str, provider: &'static str) -> impl Fn(DomainError) -> DomainError {
    move |err| DomainError::provider_rejected(provider, format!("{}: {}", prefix, err.detail()))
}

/// Auth service
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Create an account and optionally assign its role
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Registration, DomainError> {
        let account = self
            .provider
            .sign_up(email, password)
            .await
            .map_err(rejected_with("Registration failed"))?;

        if let Some(role) = role {
            self.set_role(&account.user_id, role).await?;
        }

        info!(user_id = %account.user_id, role = ?role, "User registered");

        Ok(Registration {
            user_id: account.user_id,
            email: account.email,
            role,
        })
    }

    /// Exchange credentials for an ID token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        self.provider
            .sign_in(email, password)
            .await
            .map_err(rejected_with("Login failed"))
    }

    /// Claims of a valid token
    pub async fn authenticate(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        self.provider.verify_token(token).await
    }

    /// Claims of a valid token carrying the admin role
    pub async fn authorize_admin(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        let claims = self.authenticate(token).await?;
        require_admin(&claims)?;
        Ok(claims)
    }

    pub async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError> {
        self.provider.list_users().await
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError> {
        self.provider
            .set_role(user_id, role)
            .await
            .map_err(failed_with("Failed to set role", self.provider.name()))
    }

    pub async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError> {
        self.provider
            .get_role(user_id)
            .await
            .map_err(failed_with("Failed to get role", self.provider.name()))
    }
}
