//! Firebase backends against a mock Identity Toolkit / Firestore server

use std::sync::Arc;

use chrono::Utc;
use flower_data_science::config::FirebaseConfig;
use flower_data_science::domain::{DocumentStore, IdentityProvider, Role};
use flower_data_science::infrastructure::firebase::{
    FirebaseClient, FirebaseIdentityProvider, FirestoreDocumentStore,
};
use flower_data_science::infrastructure::http_client::HttpClient;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "demo-project";
const TEST_KEY: &str = include_str!("fixtures/test_rsa_key.pem");
const TEST_JWKS: &str = include_str!("fixtures/test_jwks.json");

fn client(server: &MockServer) -> Arc<FirebaseClient> {
    let config = FirebaseConfig {
        project_id: PROJECT.to_string(),
        web_api_key: "web-key".to_string(),
        access_token: Some("owner".to_string()),
        identity_toolkit_url: server.uri(),
        firestore_url: server.uri(),
        jwks_url: format!("{}/jwks", server.uri()),
        ..Default::default()
    };

    Arc::new(FirebaseClient::new(config, Arc::new(HttpClient::new())).unwrap())
}

async fn mount_jwks(server: &MockServer) {
    let jwks: Value = serde_json::from_str(TEST_JWKS).unwrap();
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .mount(server)
        .await;
}

fn id_token(claims: Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some("test-key-1".to_string());
    let key = EncodingKey::from_rsa_pem(TEST_KEY.as_bytes()).unwrap();

    encode(&header, &claims, &key).unwrap()
}

fn claims(exp_offset_secs: i64) -> Value {
    let now = Utc::now().timestamp();
    json!({
        "iss": format!("https://securetoken.google.com/{}", PROJECT),
        "aud": PROJECT,
        "sub": "uid-1",
        "user_id": "uid-1",
        "email": "ada@example.com",
        "role": "admin",
        "iat": now - 60,
        "exp": now + exp_offset_secs,
    })
}

#[tokio::test]
async fn verify_token_reads_claims() {
    let server = MockServer::start().await;
    mount_jwks(&server).await;
    let provider = FirebaseIdentityProvider::new(client(&server));

    let identity = provider.verify_token(&id_token(claims(3600))).await.unwrap();

    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.user_id, "uid-1");
    assert_eq!(identity.role, Some(Role::Admin));
}

#[tokio::test]
async fn verify_token_rejects_expired_and_foreign_tokens() {
    let server = MockServer::start().await;
    mount_jwks(&server).await;
    let provider = FirebaseIdentityProvider::new(client(&server));

    let expired = provider.verify_token(&id_token(claims(-3600))).await.unwrap_err();
    assert_eq!(expired.detail(), "Token has expired");

    let mut foreign = claims(3600);
    foreign["aud"] = json!("other-project");
    let err = provider.verify_token(&id_token(foreign)).await.unwrap_err();
    assert_eq!(err.detail(), "Invalid Firebase token");

    let err = provider.verify_token("not-a-jwt").await.unwrap_err();
    assert_eq!(err.detail(), "Invalid Firebase token");
}

#[tokio::test]
async fn verify_token_requires_email_and_user_id() {
    let server = MockServer::start().await;
    mount_jwks(&server).await;
    let provider = FirebaseIdentityProvider::new(client(&server));

    let mut anonymous = claims(3600);
    anonymous.as_object_mut().unwrap().remove("email");

    let err = provider.verify_token(&id_token(anonymous)).await.unwrap_err();
    assert_eq!(err.detail(), "Invalid token: missing required fields");
}

#[tokio::test]
async fn sign_up_and_rejection_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .and(query_param("key", "web-key"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret123",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "email": "ada@example.com",
            "idToken": "token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
        })))
        .mount(&server)
        .await;
    let provider = FirebaseIdentityProvider::new(client(&server));

    let account = provider.sign_up("ada@example.com", "secret123").await.unwrap();
    assert_eq!(account.user_id, "uid-1");

    let err = provider.sign_in("ada@example.com", "nope").await.unwrap_err();
    assert_eq!(err.detail(), "INVALID_LOGIN_CREDENTIALS");
}

#[tokio::test]
async fn admin_calls_use_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/projects/{}/accounts:batchGet", PROJECT)))
        .and(header("authorization", "Bearer owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                {"localId": "uid-1", "email": "ada@example.com", "customAttributes": "{\"role\":\"admin\"}"},
                {"localId": "uid-2", "email": "bob@example.com"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{}/accounts:update", PROJECT)))
        .and(header("authorization", "Bearer owner"))
        .and(body_json(json!({
            "localId": "uid-2",
            "customAttributes": "{\"role\":\"default\"}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"localId": "uid-2"})))
        .expect(1)
        .mount(&server)
        .await;
    let provider = FirebaseIdentityProvider::new(client(&server));

    let users = provider.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].role, Some(Role::Admin));
    assert_eq!(users[1].role, None);

    provider.set_role("uid-2", Role::Default).await.unwrap();
}

#[tokio::test]
async fn firestore_document_round_trip() {
    let server = MockServer::start().await;
    let document_path = format!(
        "/v1/projects/{}/databases/(default)/documents/parameters/parameters",
        PROJECT
    );
    Mock::given(method("PATCH"))
        .and(path(document_path.clone()))
        .and(body_json(json!({
            "fields": {
                "n_estimators": {"integerValue": "100"},
                "criterion": {"stringValue": "gini"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(document_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo-project/databases/(default)/documents/parameters/parameters",
            "fields": {
                "n_estimators": {"integerValue": "100"},
                "criterion": {"stringValue": "gini"}
            }
        })))
        .mount(&server)
        .await;
    let store = FirestoreDocumentStore::new(client(&server));

    let document = json!({"n_estimators": 100, "criterion": "gini"});
    store
        .set_document("parameters", "parameters", document.as_object().unwrap().clone())
        .await
        .unwrap();

    let fetched = store.get_document("parameters", "parameters").await.unwrap();
    assert_eq!(fetched.map(Value::Object), Some(document));
}

#[tokio::test]
async fn firestore_missing_document_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;
    let store = FirestoreDocumentStore::new(client(&server));

    assert!(store.get_document("parameters", "missing").await.unwrap().is_none());
}
