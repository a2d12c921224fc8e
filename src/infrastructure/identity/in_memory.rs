//! In-memory identity provider

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

use super::password::{Argon2Hasher, PasswordHasher};
use crate::domain::identity::{IdentityClaims, IdentityProvider, Role, SignUpResult};
use crate::domain::DomainError;

const PROVIDER: &str = "memory";

/// Minimum password length, matching the hosted provider
const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    email: String,
    password_hash: String,
    role: Option<Role>,
}

#[derive(Debug, Default)]
struct Accounts {
    /// Sign-up order
    by_id: Vec<Account>,
    /// Opaque token to user id
    tokens: HashMap<String, String>,
}

/// Identity provider keeping accounts and tokens in process memory
///
/// Used for local runs without a Firebase project. Rejections use the same
/// error codes as the Identity Toolkit API.
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    hasher: Arc<dyn PasswordHasher>,
    accounts: RwLock<Accounts>,
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new(Arc::new(Argon2Hasher::new()))
    }
}

impl InMemoryIdentityProvider {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            hasher,
            accounts: RwLock::new(Accounts::default()),
        }
    }

    fn random_string(len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, DomainError> {
        if !email.contains('@') {
            return Err(DomainError::provider_rejected(PROVIDER, "INVALID_EMAIL"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::provider_rejected(
                PROVIDER,
                "WEAK_PASSWORD : Password should be at least 6 characters",
            ));
        }

        let password_hash = self.hasher.hash(password)?;
        let mut accounts = self.accounts.write().await;

        if accounts.by_id.iter().any(|a| a.email == email) {
            return Err(DomainError::provider_rejected(PROVIDER, "EMAIL_EXISTS"));
        }

        let account = Account {
            user_id: Self::random_string(28),
            email: email.to_string(),
            password_hash,
            role: None,
        };
        let result = SignUpResult {
            user_id: account.user_id.clone(),
            email: account.email.clone(),
        };
        accounts.by_id.push(account);

        debug!(user_id = %result.user_id, "Account created");
        Ok(result)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let mut accounts = self.accounts.write().await;

        let user_id = accounts
            .by_id
            .iter()
            .find(|a| a.email == email && self.hasher.verify(password, &a.password_hash))
            .map(|a| a.user_id.clone())
            .ok_or_else(|| DomainError::provider_rejected(PROVIDER, "INVALID_LOGIN_CREDENTIALS"))?;

        let token = Self::random_string(48);
        accounts.tokens.insert(token.clone(), user_id);
        Ok(token)
    }

    async fn verify_token(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        let accounts = self.accounts.read().await;

        let account = accounts
            .tokens
            .get(token)
            .and_then(|user_id| accounts.by_id.iter().find(|a| &a.user_id == user_id))
            .ok_or_else(|| DomainError::unauthorized("Invalid Firebase token"))?;

        Ok(IdentityClaims::new(
            account.email.clone(),
            account.user_id.clone(),
            account.role,
        ))
    }

    async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError> {
        let accounts = self.accounts.read().await;

        Ok(accounts
            .by_id
            .iter()
            .map(|a| IdentityClaims::new(a.email.clone(), a.user_id.clone(), a.role))
            .collect())
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .by_id
            .iter_mut()
            .find(|a| a.user_id == user_id)
            .ok_or_else(|| DomainError::provider_rejected(PROVIDER, "USER_NOT_FOUND"))?;

        account.role = Some(role);
        Ok(())
    }

    async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError> {
        let accounts = self.accounts.read().await;

        accounts
            .by_id
            .iter()
            .find(|a| a.user_id == user_id)
            .map(|a| a.role)
            .ok_or_else(|| DomainError::provider_rejected(PROVIDER, "USER_NOT_FOUND"))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_sign_in_and_verify() {
        let provider = InMemoryIdentityProvider::default();

        let created = provider.sign_up("ada@example.com", "secret1").await.unwrap();
        let token = provider.sign_in("ada@example.com", "secret1").await.unwrap();
        let claims = provider.verify_token(&token).await.unwrap();

        assert_eq!(claims.user_id, created.user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let provider = InMemoryIdentityProvider::default();
        provider.sign_up("ada@example.com", "secret1").await.unwrap();

        let err = provider.sign_up("ada@example.com", "secret2").await.unwrap_err();
        assert_eq!(err.detail(), "EMAIL_EXISTS");
    }

    #[tokio::test]
    async fn test_weak_password_is_rejected() {
        let provider = InMemoryIdentityProvider::default();

        let err = provider.sign_up("ada@example.com", "abc").await.unwrap_err();
        assert!(matches!(err, DomainError::ProviderRejected { .. }));
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let provider = InMemoryIdentityProvider::default();
        provider.sign_up("ada@example.com", "secret1").await.unwrap();

        let err = provider.sign_in("ada@example.com", "nope!!").await.unwrap_err();
        assert_eq!(err.detail(), "INVALID_LOGIN_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let provider = InMemoryIdentityProvider::default();

        let err = provider.verify_token("forged").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_roles_show_up_in_claims_and_listing() {
        let provider = InMemoryIdentityProvider::default();
        let created = provider.sign_up("ada@example.com", "secret1").await.unwrap();
        provider.sign_up("bob@example.com", "secret1").await.unwrap();

        provider.set_role(&created.user_id, Role::Admin).await.unwrap();
        let token = provider.sign_in("ada@example.com", "secret1").await.unwrap();

        assert_eq!(provider.get_role(&created.user_id).await.unwrap(), Some(Role::Admin));
        assert_eq!(
            provider.verify_token(&token).await.unwrap().role,
            Some(Role::Admin)
        );

        let users = provider.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, None);
    }

    #[tokio::test]
    async fn test_set_role_for_unknown_user() {
        let provider = InMemoryIdentityProvider::default();

        let err = provider.set_role("missing", Role::Default).await.unwrap_err();
        assert_eq!(err.detail(), "USER_NOT_FOUND");
    }
}
