mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::spawn_app;

#[tokio::test]
async fn get_registered_dataset() {
    let app = spawn_app().await;

    let (status, body) = app.get("/dataset/iris").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"name": "iris", "url": "https://example.com/iris.zip"}));
}

#[tokio::test]
async fn get_unknown_dataset_is_not_found() {
    let app = spawn_app().await;

    let (status, body) = app.get("/dataset/wine").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Dataset not found in configuration file: wine");
}

#[tokio::test]
async fn post_creates_then_rejects_duplicate() {
    let app = spawn_app().await;
    let record = json!({"name": "wine", "url": "https://example.com/wine.zip"});

    let (status, body) = app.send_json(Method::POST, "/dataset", record.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, record);

    let (status, body) = app.send_json(Method::POST, "/dataset", record).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["detail"],
        "Dataset already exists: wine. Use PUT if you wish to update it."
    );
}

#[tokio::test]
async fn post_rejects_invalid_name_and_url() {
    let app = spawn_app().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/dataset",
            json!({"name": "red wine", "url": "https://example.com/wine.zip"}),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Invalid name: red wine");
    assert_eq!(body["param"], "name");

    let (status, body) = app
        .send_json(Method::POST, "/dataset", json!({"name": "wine", "url": "not a url"}))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Invalid URL: not a url");
    assert_eq!(body["param"], "url");
}

#[tokio::test]
async fn post_with_missing_field_is_unprocessable() {
    let app = spawn_app().await;

    let (status, body) = app
        .send_json(Method::POST, "/dataset", json!({"name": "wine"}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["type"], "validation_error");
}

#[tokio::test]
async fn put_distinguishes_create_from_update() {
    let app = spawn_app().await;

    let (status, _) = app
        .send_json(
            Method::PUT,
            "/dataset",
            json!({"name": "iris", "url": "https://example.com/iris-v2.zip"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send_json(
            Method::PUT,
            "/dataset",
            json!({"name": "wine", "url": "https://example.com/wine.zip"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/dataset/iris").await;
    assert_eq!(body["url"], "https://example.com/iris-v2.zip");
}

#[tokio::test]
async fn delete_removes_dataset_once() {
    let app = spawn_app().await;

    let (status, body) = app.send(Method::DELETE, "/dataset/iris", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dataset iris was successfully deleted");

    let (status, body) = app.send(Method::DELETE, "/dataset/iris", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Dataset not found: iris");
}

#[tokio::test]
async fn catalog_file_keeps_key_order() {
    let app = spawn_app().await;

    for name in ["zeta", "alpha", "mid"] {
        let (status, _) = app
            .send_json(
                Method::POST,
                "/dataset",
                json!({"name": name, "url": format!("https://example.com/{name}.zip")}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let content = std::fs::read_to_string(&app.config.storage.datasets_path).unwrap();
    let catalog: Value = serde_json::from_str(&content).unwrap();
    let keys: Vec<&str> = catalog.as_object().unwrap().keys().map(String::as_str).collect();

    assert_eq!(keys, ["iris", "zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn missing_catalog_is_a_server_error() {
    let app = spawn_app().await;
    std::fs::remove_file(&app.config.storage.datasets_path).unwrap();

    let (status, body) = app.get("/dataset/iris").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        format!("Configuration file not found: {}", app.config.storage.datasets_path)
    );

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn health_endpoints_answer() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = app.get("/live").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"][0]["name"], "dataset_catalog");
}
