mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

fn snapshot(id: i64, username: &str) -> serde_json::Value {
    json!({
        "id": id,
        "username": username,
        "is_active": true,
        "created_at": null,
        "updated_at": null
    })
}

#[tokio::test]
async fn test_ping() {
    let app = TestApp::spawn().await;

    let response = app.get("/ping").send().await.expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "pong");
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let body = app.register("alice", "s3cret").await;

    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["is_active"], true);
    assert!(body["data"]["id"].is_i64());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password_hash").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let response = app
        .post("/api/v1/user/register")
        .json(&json!({ "username": "alice", "password": "different" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_invalid_username() {
    let app = TestApp::spawn().await;

    for username in ["ab", "has space", "semi;colon"] {
        let response = app
            .post("/api/v1/user/register")
            .json(&json!({ "username": username, "password": "s3cret" }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", username);
    }
}

#[tokio::test]
async fn test_register_empty_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/user/register")
        .json(&json!({ "username": "alice", "password": "" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let response = app
        .post("/api/v1/user/login")
        .json(&json!({ "username": "alice", "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 200);
    let token = body["data"]["access_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let response = app
        .post("/api/v1/user/login")
        .json(&json!({ "username": "alice", "password": "S3cret" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let wrong_password = app
        .post("/api/v1/user/login")
        .json(&json!({ "username": "alice", "password": "nope" }))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_user = app
        .post("/api/v1/user/login")
        .json(&json!({ "username": "mallory", "password": "nope" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status(), unknown_user.status());

    let wrong_password: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_user: serde_json::Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_login_inactive_user() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;
    app.deactivate("alice").await;

    let response = app
        .post("/api/v1/user/login")
        .json(&json!({ "username": "alice", "password": "s3cret" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice", "s3cret").await;
    let token = app.login("alice", "s3cret").await;

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["id"], registered["data"]["id"]);
    assert_eq!(body["data"]["is_active"], true);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_me_without_authorization_header() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/v1/user/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_malformed_authorization_header() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;
    let token = app.login("alice", "s3cret").await;

    let headers = [
        "Bearer".to_string(),
        "Basic xyz".to_string(),
        format!("bearer {}", token),
        format!("Bearer {} extra", token),
    ];

    for header in headers {
        let response = app
            .get("/api/v1/user/me")
            .header("Authorization", header.as_str())
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", header);
    }
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/api/v1/user/me", "not-a-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let token = app
        .jwt_handler
        .issue(&snapshot(1, "alice"), chrono::Duration::zero())
        .unwrap();

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_foreign_signature() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;

    let forger = auth::JwtHandler::new(b"some-other-secret-of-reasonable-length");
    let token = forger
        .issue(&snapshot(1, "alice"), chrono::Duration::hours(1))
        .unwrap();

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_trusts_token_snapshot() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret").await;
    let token = app.login("alice", "s3cret").await;

    app.deactivate("alice").await;

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["is_active"], true);
}

#[tokio::test]
async fn test_me_refreshing_rejects_deactivated_user() {
    let app = TestApp::spawn_refreshing().await;
    app.register("alice", "s3cret").await;
    let token = app.login("alice", "s3cret").await;

    let before = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(before.status(), StatusCode::OK);

    app.deactivate("alice").await;

    let after = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_refreshing_rejects_unknown_user() {
    let app = TestApp::spawn_refreshing().await;

    let token = app
        .jwt_handler
        .issue(&snapshot(42, "ghost"), chrono::Duration::hours(1))
        .unwrap();

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = TestApp::spawn().await;

    let registered = app.register("alice", "s3cret").await;
    let token = app.login("alice", "s3cret").await;

    let response = app
        .get_authenticated("/api/v1/user/me", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["id"], registered["data"]["id"]);
}
