//! Shared helpers for router-level tests
#![allow(dead_code)]

use std::path::Path;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use flower_data_science::config::AppConfig;
use flower_data_science::{api::create_router_with_state, create_app_state};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const IRIS_CSV: &str = include_str!("../../data/Iris.csv");

/// Router over in-memory backends and files in a temporary directory
pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
    pub dir: TempDir,
}

/// Catalog holding an `iris` entry, local CSV present, no model yet
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_, _| {}).await
}

/// `adjust` sees the default test config and the temporary root before the
/// state is built
pub async fn spawn_app_with(adjust: impl FnOnce(&mut AppConfig, &Path)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    std::fs::write(
        root.join("urls_config.json"),
        serde_json::to_vec_pretty(&json!({
            "iris": {"name": "iris", "url": "https://example.com/iris.zip"}
        }))
        .unwrap(),
    )
    .unwrap();
    std::fs::create_dir_all(root.join("data")).unwrap();
    std::fs::write(root.join("data/Iris.csv"), IRIS_CSV).unwrap();

    let mut config = AppConfig::default();
    config.storage.datasets_path = path_string(&root.join("urls_config.json"));
    config.storage.iris_csv_path = path_string(&root.join("data/Iris.csv"));
    config.storage.model_path = path_string(&root.join("models/iris_model.json"));
    config.storage.parameters_seed_path = path_string(&root.join("model_parameters.json"));
    adjust(&mut config, root);

    let state = create_app_state(&config).await.unwrap();

    TestApp {
        router: create_router_with_state(state),
        config,
        dir,
    }
}

pub fn path_string(path: &Path) -> String {
    path.display().to_string()
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, Some(token)).await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(method, uri, Some(body), None).await
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    /// Register an account, then exchange its credentials for a token
    pub async fn register_and_login(&self, email: &str, role: Option<&str>) -> String {
        let (status, body) = self
            .send_json(
                Method::POST,
                "/register",
                json!({"email": email, "password": "secret123", "role": role}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        let (status, body) = self.login(email, "secret123").await;
        assert_eq!(status, StatusCode::OK, "{body}");

        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!(
                "username={}&password={}",
                username.replace('@', "%40"),
                password
            )))
            .unwrap();

        self.call(request).await
    }
}
