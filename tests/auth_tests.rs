//! Integration tests for authentication endpoints.

mod common;

use common::TestApp;

#[tokio::test]
async fn test_phone_login_full_flow() {
    let app = TestApp::new().await;

    // Request a code
    let response = app
        .server()
        .post("/api/auth/send-code")
        .json(&serde_json::json!({ "phone": "13800138000" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    let code = body["data"]["code"].as_str().expect("code in demo mode");
    assert_eq!(code.len(), 6);
    assert_eq!(body["data"]["expiresIn"], 600);

    // Log in with it
    let response = app
        .server()
        .post("/api/auth/login-phone")
        .json(&serde_json::json!({ "phone": "13800138000", "code": code }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["phone"], "13800138000");
    assert_eq!(body["data"]["user"]["loginType"], "phone");
    // Nickname derives from the phone tail
    assert_eq!(body["data"]["user"]["nickname"], "user_8000");
}

#[tokio::test]
async fn test_send_code_rejects_bad_phone() {
    let app = TestApp::new().await;

    for phone in ["12345", "21800138000", "1380013800a", ""] {
        let response = app
            .server()
            .post("/api/auth/send-code")
            .json(&serde_json::json!({ "phone": phone }))
            .await;
        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_phone_login_wrong_code() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/auth/send-code")
        .json(&serde_json::json!({ "phone": "13800138000" }))
        .await;
    let body: serde_json::Value = response.json();
    let code = body["data"]["code"].as_str().unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let response = app
        .server()
        .post("/api/auth/login-phone")
        .json(&serde_json::json!({ "phone": "13800138000", "code": wrong }))
        .await;
    response.assert_status_bad_request();

    // The right code still works afterwards
    let response = app
        .server()
        .post("/api/auth/login-phone")
        .json(&serde_json::json!({ "phone": "13800138000", "code": code }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_phone_login_without_code_request() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/auth/login-phone")
        .json(&serde_json::json!({ "phone": "13800138000", "code": "123456" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_phone_login_same_account_on_repeat() {
    let app = TestApp::new().await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = app
            .server()
            .post("/api/auth/send-code")
            .json(&serde_json::json!({ "phone": "13912345678" }))
            .await;
        let body: serde_json::Value = response.json();
        let code = body["data"]["code"].as_str().unwrap().to_string();

        let response = app
            .server()
            .post("/api/auth/login-phone")
            .json(&serde_json::json!({ "phone": "13912345678", "code": code }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        ids.push(body["data"]["user"]["id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_register_and_email_login() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "nickname": "Viewer"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["user"]["email"], "viewer@example.com");
    assert_eq!(body["data"]["user"]["nickname"], "Viewer");
    // Password hash never leaves the server
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123"
        }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    // Bad email
    let response = app
        .server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "not-an-email",
            "password": "secret123",
            "confirmPassword": "secret123"
        }))
        .await;
    response.assert_status_bad_request();

    // Short password
    let response = app
        .server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "a@b.com",
            "password": "short",
            "confirmPassword": "short"
        }))
        .await;
    response.assert_status_bad_request();

    // Mismatched confirmation
    let response = app
        .server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "a@b.com",
            "password": "secret123",
            "confirmPassword": "different1"
        }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;

    let body = serde_json::json!({
        "email": "dup@example.com",
        "password": "secret123",
        "confirmPassword": "secret123"
    });

    app.server().post("/api/auth/register").json(&body).await;
    let response = app.server().post("/api/auth/register").json(&body).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_email_login_wrong_password() {
    let app = TestApp::new().await;

    app.server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123",
            "confirmPassword": "secret123"
        }))
        .await;

    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "wrong-password"
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_email_login_unknown_address() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "secret123"
        }))
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_qq_flow() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/auth/qq/init").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let state = body["data"]["state"].as_str().unwrap().to_string();
    assert!(body["data"]["authUrl"]
        .as_str()
        .unwrap()
        .contains("graph.qq.com"));

    let response = app
        .server()
        .get("/api/auth/qq/callback")
        .add_query_param("code", "demo-code")
        .add_query_param("state", &state)
        .await;
    response.assert_status(axum::http::StatusCode::SEE_OTHER);
    let location = response
        .header("location")
        .to_str()
        .expect("location header")
        .to_string();
    assert!(location.contains("token="));

    // State is one-shot
    let response = app
        .server()
        .get("/api/auth/qq/callback")
        .add_query_param("code", "demo-code")
        .add_query_param("state", &state)
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_qq_callback_missing_code() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .get("/api/auth/qq/callback")
        .add_query_param("state", "whatever")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_me_endpoint() {
    let app = TestApp::new().await;
    let (user_id, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    let response = app
        .server()
        .get("/api/auth/me")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["id"], user_id.to_string());
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/auth/me").await;
    response.assert_status_unauthorized();

    let (name, value) = app.auth_header("invalid-token-xyz");
    let response = app
        .server()
        .get("/api/auth/me")
        .add_header(name, value)
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new().await;

    app.server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123",
            "confirmPassword": "secret123"
        }))
        .await;

    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123"
        }))
        .await;
    let body: serde_json::Value = response.json();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let (name, value) = app.auth_header(&token);

    // Wrong old password
    let response = app
        .server()
        .post("/api/auth/change-password")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({
            "oldPassword": "wrong",
            "newPassword": "newsecret1",
            "confirmPassword": "newsecret1"
        }))
        .await;
    response.assert_status_bad_request();

    // Correct old password
    let response = app
        .server()
        .post("/api/auth/change-password")
        .add_header(name, value)
        .json(&serde_json::json!({
            "oldPassword": "secret123",
            "newPassword": "newsecret1",
            "confirmPassword": "newsecret1"
        }))
        .await;
    response.assert_status_ok();

    // Old password no longer works, new one does
    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "secret123"
        }))
        .await;
    response.assert_status_unauthorized();

    let response = app
        .server()
        .post("/api/auth/login")
        .json(&serde_json::json!({
            "email": "viewer@example.com",
            "password": "newsecret1"
        }))
        .await;
    response.assert_status_ok();
}
