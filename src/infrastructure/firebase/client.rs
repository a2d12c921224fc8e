//! Shared Firebase REST plumbing: endpoints, admin credentials and signing keys

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{debug, info};

use crate::config::FirebaseConfig;
use crate::domain::DomainError;
use crate::infrastructure::http_client::{HttpClientTrait, JsonResponse};

pub(crate) const PROVIDER: &str = "firebase";

const ADMIN_SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform \
https://www.googleapis.com/auth/identitytoolkit \
https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh cached credentials this long before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

const SIGNING_KEYS_TTL_SECS: i64 = 3600;

/// Fields of a service account key file used for admin calls
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

impl<T: Clone> Cached<T> {
    fn fresh(&self) -> Option<T> {
        (Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at)
            .then(|| self.value.clone())
    }
}

/// Firebase project handle injected into the identity provider and the
/// Firestore document store
pub struct FirebaseClient {
    config: FirebaseConfig,
    http: Arc<dyn HttpClientTrait>,
    service_account: OnceCell<ServiceAccount>,
    access_token: Mutex<Option<Cached<String>>>,
    signing_keys: RwLock<Option<Cached<JwkSet>>>,
}

impl std::fmt::Debug for FirebaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseClient")
            .field("project_id", &self.config.project_id)
            .field("web_api_key", &"[hidden]")
            .field("credentials_path", &self.config.credentials_path)
            .finish()
    }
}

impl FirebaseClient {
    pub fn new(config: FirebaseConfig, http: Arc<dyn HttpClientTrait>) -> Result<Self, DomainError> {
        if config.project_id.trim().is_empty() {
            return Err(DomainError::configuration("firebase.project_id must be set"));
        }

        Ok(Self {
            config,
            http,
            service_account: OnceCell::new(),
            access_token: Mutex::new(None),
            signing_keys: RwLock::new(None),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    pub fn http(&self) -> &dyn HttpClientTrait {
        self.http.as_ref()
    }

    /// Public Identity Toolkit endpoint authenticated by the web API key
    pub fn public_auth_url(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.config.identity_toolkit_url.trim_end_matches('/'),
            action,
            self.config.web_api_key
        )
    }

    /// Project-scoped Identity Toolkit admin endpoint
    pub fn admin_auth_url(&self, action: &str) -> String {
        format!(
            "{}/v1/projects/{}/accounts:{}",
            self.config.identity_toolkit_url.trim_end_matches('/'),
            self.config.project_id,
            action
        )
    }

    pub fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
            self.config.firestore_url.trim_end_matches('/'),
            self.config.project_id,
            collection,
            id
        )
    }

    /// Issuer expected in ID tokens
    pub fn token_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.config.project_id)
    }

    /// Send an authenticated admin request
    pub async fn admin_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<JsonResponse, DomainError> {
        let token = self.bearer_token().await?;
        let authorization = format!("Bearer {}", token);

        self.http
            .send_json(method, url, &[("Authorization", authorization.as_str())], body)
            .await
    }

    /// OAuth access token for admin calls.
    ///
    /// A configured static token wins; otherwise a service-account assertion
    /// is exchanged at the token URI and cached until shortly before expiry.
    pub async fn bearer_token(&self) -> Result<String, DomainError> {
        if let Some(token) = self.config.access_token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(token.clone());
        }

        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref().and_then(Cached::fresh) {
            return Ok(token);
        }

        let account = self.service_account().await?;
        let assertion = sign_assertion(account)?;

        let response = self
            .http
            .post_form(
                &account.token_uri,
                &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
            )
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider(
                PROVIDER,
                format!(
                    "Access token exchange failed with HTTP {}: {}",
                    response.status, response.body
                ),
            ));
        }

        let token: TokenResponse = serde_json::from_value(response.body).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Unexpected token response: {}", e))
        })?;

        debug!(expires_in = token.expires_in, "Obtained Firebase admin access token");

        *cached = Some(Cached {
            value: token.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });

        Ok(token.access_token)
    }

    async fn service_account(&self) -> Result<&ServiceAccount, DomainError> {
        self.service_account
            .get_or_try_init(|| async {
                let path = self.config.credentials_path.as_deref().ok_or_else(|| {
                    DomainError::configuration(
                        "Firebase admin credentials are not configured \
                         (set firebase.credentials_path or firebase.access_token)",
                    )
                })?;

                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    DomainError::configuration(format!(
                        "Failed to read service account file {}: {}",
                        path, e
                    ))
                })?;

                let account: ServiceAccount = serde_json::from_str(&content).map_err(|e| {
                    DomainError::configuration(format!(
                        "Invalid service account file {}: {}",
                        path, e
                    ))
                })?;

                info!(client_email = %account.client_email, "Loaded Firebase service account");
                Ok::<_, DomainError>(account)
            })
            .await
    }

    /// Token-signing keys, cached for an hour. `refresh` bypasses the cache.
    pub async fn signing_keys(&self, refresh: bool) -> Result<JwkSet, DomainError> {
        if !refresh {
            if let Some(keys) = self.signing_keys.read().await.as_ref().and_then(Cached::fresh) {
                return Ok(keys);
            }
        }

        let response = self
            .http
            .send_json(Method::GET, &self.config.jwks_url, &[], None)
            .await?;

        if !response.is_success() {
            return Err(DomainError::provider(
                PROVIDER,
                format!("Failed to fetch signing keys: HTTP {}", response.status),
            ));
        }

        let keys: JwkSet = serde_json::from_value(response.body).map_err(|e| {
            DomainError::provider(PROVIDER, format!("Invalid signing key set: {}", e))
        })?;

        *self.signing_keys.write().await = Some(Cached {
            value: keys.clone(),
            expires_at: Utc::now() + Duration::seconds(SIGNING_KEYS_TTL_SECS),
        });

        Ok(keys)
    }
}

fn sign_assertion(account: &ServiceAccount) -> Result<String, DomainError> {
    let now = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: &account.client_email,
        scope: ADMIN_SCOPES,
        aud: &account.token_uri,
        iat: now,
        exp: now + 3600,
    };

    let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes()).map_err(|e| {
        DomainError::configuration(format!("Invalid service account private key: {}", e))
    })?;

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| DomainError::internal(format!("Failed to sign token assertion: {}", e)))
}

/// `error.message` of a failed call, or its status
pub(crate) fn failure_reason(response: &JsonResponse) -> String {
    response
        .error_message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", response.status))
}
