use bookstore_api::models::user::Claims;
use serde_json::{json, Value};
use tracing::Level;

use crate::common::{spawn_app, spawn_app_with, JWT_ISSUER, JWT_SECRET, PASSWORD};

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let response = app.get("/health").await;
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_with_memory_storage() {
    let app = spawn_app().await;

    let response = app.get("/ready").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_login() {
    let app = spawn_app().await;

    let response = app.login("admin", PASSWORD).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().expect("No token in response");

    let claims = Claims::from_token(token, JWT_SECRET, JWT_ISSUER).unwrap();
    assert_eq!(claims.sub, "admin@bookstore.com");
    assert_eq!(claims.aud, JWT_ISSUER);
    assert!(claims.has_role("Administrator"));
    assert!(uuid::Uuid::parse_str(&claims.nameid).is_ok());
}

#[tokio::test]
async fn test_each_login_gets_a_fresh_token_id() {
    let app = spawn_app().await;

    let first = Claims::from_token(&app.token("customer1").await, JWT_SECRET, JWT_ISSUER).unwrap();
    let second = Claims::from_token(&app.token("customer1").await, JWT_SECRET, JWT_ISSUER).unwrap();
    assert_ne!(first.jti, second.jti);
    assert_eq!(first.nameid, second.nameid);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = spawn_app().await;

    let response = app.login("admin", "hunter2-wrong").await;
    assert_eq!(response.status(), 401);
    let text = response.text().await.unwrap();
    assert!(!text.contains("hunter2-wrong"));
    assert!(!text.contains("admin"));

    assert!(app
        .logger
        .at_level(Level::WARN)
        .iter()
        .all(|record| !record.message.contains("hunter2-wrong")));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = spawn_app().await;

    let response = app.login("ghost", PASSWORD).await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/users"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_protected_writes_require_token() {
    let app = spawn_app_with(|config| config.auth.protect_writes = true).await;

    let body = json!({ "firstname": "Frank", "lastname": "Herbert" });
    let response = app.post("/api/authors", &body).await;
    assert_eq!(response.status(), 401);

    // Reads stay open
    assert_eq!(app.get("/api/authors").await.status(), 200);

    let token = app.token("customer1").await;
    let response = app
        .client
        .post(app.url("/api/authors"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_protected_writes_reject_bad_token() {
    let app = spawn_app_with(|config| config.auth.protect_writes = true).await;

    let response = app
        .client
        .delete(app.url("/api/books/1"))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_protected_writes_enforce_role() {
    let app = spawn_app_with(|config| {
        config.auth.protect_writes = true;
        config.auth.write_role = Some("Administrator".to_string());
    })
    .await;
    let body = json!({ "firstname": "Frank", "lastname": "Herbert" });

    let customer = app.token("customer1").await;
    let response = app
        .client
        .post(app.url("/api/authors"))
        .bearer_auth(customer)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let admin = app.token("admin").await;
    let response = app
        .client
        .post(app.url("/api/authors"))
        .bearer_auth(admin)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}
