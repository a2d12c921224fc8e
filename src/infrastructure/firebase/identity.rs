//! Firebase Authentication backed identity provider

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::client::{failure_reason, FirebaseClient, PROVIDER};
use crate::domain::identity::{IdentityClaims, IdentityProvider, Role, SignUpResult};
use crate::domain::DomainError;

const PAGE_SIZE: u32 = 1000;

/// Claims read from a Firebase ID token
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    /// JSON-encoded custom claims
    #[serde(default)]
    custom_attributes: Option<String>,
}

impl AccountInfo {
    fn role(&self) -> Option<Role> {
        let attributes: Value = serde_json::from_str(self.custom_attributes.as_deref()?).ok()?;
        attributes.get("role")?.as_str()?.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountPage {
    #[serde(default)]
    users: Vec<AccountInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn invalid_token() -> DomainError {
    DomainError::unauthorized("Invalid Firebase token")
}

/// Identity provider talking to the Identity Toolkit REST API
#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    client: Arc<FirebaseClient>,
}

impl FirebaseIdentityProvider {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self { client }
    }

    /// Call an endpoint authenticated by the web API key
    async fn public_call(&self, action: &str, body: Value) -> Result<Value, DomainError> {
        let response = self
            .client
            .http()
            .send_json(Method::POST, &self.client.public_auth_url(action), &[], Some(&body))
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider_rejected(
                PROVIDER,
                failure_reason(&response),
            ));
        }

        Ok(response.body)
    }

    /// Call a project-scoped admin endpoint
    async fn admin_call(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, DomainError> {
        let response = self.client.admin_request(method, url, body).await?;

        if !response.is_success() {
            return Err(DomainError::provider_rejected(
                PROVIDER,
                failure_reason(&response),
            ));
        }

        Ok(response.body)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, DomainError> {
        let mut keys = self.client.signing_keys(false).await?;

        if keys.find(kid).is_none() {
            debug!(kid, "Unknown signing key, refreshing key set");
            keys = self.client.signing_keys(true).await?;
        }

        let jwk = keys.find(kid).ok_or_else(invalid_token)?;
        DecodingKey::from_jwk(jwk).map_err(|_| invalid_token())
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, DomainError> {
        let body = self
            .public_call(
                "signUp",
                json!({"email": email, "password": password, "returnSecureToken": true}),
            )
            .await?;

        let account: AccountInfo = serde_json::from_value(body).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Unexpected sign-up response: {}", e))
        })?;

        Ok(SignUpResult {
            email: account.email.unwrap_or_else(|| email.to_string()),
            user_id: account.local_id,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let body = self
            .public_call(
                "signInWithPassword",
                json!({"email": email, "password": password, "returnSecureToken": true}),
            )
            .await?;

        body.get("idToken")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| DomainError::provider(PROVIDER, "Sign-in response carries no idToken"))
    }

    async fn verify_token(&self, token: &str) -> Result<IdentityClaims, DomainError> {
        let header = decode_header(token).map_err(|_| invalid_token())?;
        let kid = header.kid.ok_or_else(invalid_token)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client.project_id()]);
        validation.set_issuer(&[self.client.token_issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let claims = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::unauthorized("Token has expired"),
                _ => invalid_token(),
            })?
            .claims;

        let (Some(email), Some(user_id)) = (
            claims.email.filter(|e| !e.is_empty()),
            claims.user_id.filter(|u| !u.is_empty()),
        ) else {
            return Err(DomainError::unauthorized(
                "Invalid token: missing required fields",
            ));
        };

        let role = claims.role.and_then(|r| match r.parse::<Role>() {
            Ok(role) => Some(role),
            Err(_) => {
                warn!(user_id = %user_id, role = %r, "Ignoring unknown role claim");
                None
            }
        });

        Ok(IdentityClaims::new(email, user_id, role))
    }

    async fn list_users(&self) -> Result<Vec<IdentityClaims>, DomainError> {
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!("{}?maxResults={}", self.client.admin_auth_url("batchGet"), PAGE_SIZE);
            if let Some(token) = &page_token {
                url.push_str("&nextPageToken=");
                url.push_str(token);
            }

            let body = self.admin_call(Method::GET, &url, None).await?;
            let page: AccountPage = serde_json::from_value(body).map_err(|e| {
                DomainError::provider(PROVIDER, format!("Unexpected account listing: {}", e))
            })?;

            users.extend(page.users.iter().map(|account| {
                IdentityClaims::new(
                    account.email.clone().unwrap_or_default(),
                    account.local_id.clone(),
                    account.role(),
                )
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(users)
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<(), DomainError> {
        let attributes = json!({"role": role}).to_string();

        self.admin_call(
            Method::POST,
            &self.client.admin_auth_url("update"),
            Some(&json!({"localId": user_id, "customAttributes": attributes})),
        )
        .await?;

        debug!(user_id, role = %role, "Role claim updated");
        Ok(())
    }

    async fn get_role(&self, user_id: &str) -> Result<Option<Role>, DomainError> {
        let body = self
            .admin_call(
                Method::POST,
                &self.client.admin_auth_url("lookup"),
                Some(&json!({"localId": [user_id]})),
            )
            .await?;

        let page: AccountPage = serde_json::from_value(body).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Unexpected account lookup: {}", e))
        })?;

        page.users
            .first()
            .map(AccountInfo::role)
            .ok_or_else(|| DomainError::provider_rejected(PROVIDER, "USER_NOT_FOUND"))
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
