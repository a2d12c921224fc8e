use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;

use crate::domain::DomainError;

/// Status and decoded body of a JSON exchange
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: u16,
    /// `Value::Null` when the body is empty or not JSON
    pub body: Value,
}

impl JsonResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `error.message` of a Google API error body
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
    }
}

/// Trait for HTTP client operations
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// Download a resource. Non-success statuses are errors.
    async fn get_bytes(&self, url: &str) -> Result<Bytes, DomainError>;

    /// Send an optional JSON body and decode the JSON answer whatever its status
    async fn send_json(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<JsonResponse, DomainError>;

    /// Post an urlencoded form and decode the JSON answer whatever its status
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<JsonResponse, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn decode(response: reqwest::Response) -> Result<JsonResponse, DomainError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::network(format!("Failed to read response: {}", e)))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(JsonResponse { status, body })
    }
}

/// Malformed or unsupported URLs surface as builder errors
fn map_send_error(url: &str, error: reqwest::Error) -> DomainError {
    if error.is_builder() {
        DomainError::invalid_source(format!("Invalid URL: {}", url))
    } else {
        DomainError::network(format!("Request to {} failed: {}", url, error))
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_bytes(&self, url: &str) -> Result<Bytes, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_send_error(url, e))?;

        if !response.status().is_success() {
            return Err(DomainError::network(format!(
                "Download from {} failed: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| DomainError::network(format!("Failed to read {}: {}", url, e)))
    }

    async fn send_json(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<JsonResponse, DomainError> {
        let mut request = self.client.request(method, url);

        for (key, value) in headers {
            request = request.header(*key, *value);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| map_send_error(url, e))?;
        Self::decode(response).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<JsonResponse, DomainError> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| map_send_error(url, e))?;

        Self::decode(response).await
    }
}
