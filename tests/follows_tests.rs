//! Integration tests for follow endpoints.

mod common;

use common::TestApp;

#[tokio::test]
async fn test_follow_and_unfollow() {
    let app = TestApp::new().await;
    let (_, alice) = app.create_user("13800138000").await;
    let (bob_id, _) = app.create_user("13900139000").await;

    let (name, value) = app.auth_header(&alice);
    let response = app
        .server()
        .post("/api/follows")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({ "followingId": bob_id }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    // Duplicate follow is a 400
    let response = app
        .server()
        .post("/api/follows")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({ "followingId": bob_id }))
        .await;
    response.assert_status_bad_request();

    let response = app
        .server()
        .get(&format!("/api/follows/check/{}", bob_id))
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["isFollowing"], true);

    let response = app
        .server()
        .delete(&format!("/api/follows/{}", bob_id))
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();

    // Unfollowing again is a 400
    let response = app
        .server()
        .delete(&format!("/api/follows/{}", bob_id))
        .add_header(name, value)
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_self_follow_rejected() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.create_user("13800138000").await;

    let (name, value) = app.auth_header(&alice);
    let response = app
        .server()
        .post("/api/follows")
        .add_header(name, value)
        .json(&serde_json::json!({ "followingId": alice_id }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let app = TestApp::new().await;
    let (_, alice) = app.create_user("13800138000").await;

    let (name, value) = app.auth_header(&alice);
    let response = app
        .server()
        .post("/api/follows")
        .add_header(name, value)
        .json(&serde_json::json!({ "followingId": uuid::Uuid::new_v4() }))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_lists_and_stats() {
    let app = TestApp::new().await;
    let (alice_id, alice) = app.create_user("13800138000").await;
    let (bob_id, bob) = app.create_user("13900139000").await;
    let (_, carol) = app.create_user("13700137000").await;

    // Bob and Carol both follow Alice; Alice follows Bob
    for token in [&bob, &carol] {
        let (name, value) = app.auth_header(token);
        app.server()
            .post("/api/follows")
            .add_header(name, value)
            .json(&serde_json::json!({ "followingId": alice_id }))
            .await;
    }
    let (name, value) = app.auth_header(&alice);
    app.server()
        .post("/api/follows")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({ "followingId": bob_id }))
        .await;

    let response = app
        .server()
        .get("/api/follows/stats")
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["followerCount"], 2);
    assert_eq!(body["data"]["followingCount"], 1);

    let response = app
        .server()
        .get("/api/follows/followers/list")
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 2);

    let response = app
        .server()
        .get("/api/follows/following/list")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["id"], bob_id.to_string());
}

#[tokio::test]
async fn test_public_lists_omit_email() {
    let app = TestApp::new().await;
    let (alice_id, _) = app.create_user("13800138000").await;

    // An email account follows Alice
    let response = app
        .server()
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "fan@example.com",
            "password": "secret123",
            "confirmPassword": "secret123"
        }))
        .await;
    let body: serde_json::Value = response.json();
    let fan_token = body["data"]["token"].as_str().unwrap().to_string();

    let (name, value) = app.auth_header(&fan_token);
    app.server()
        .post("/api/follows")
        .add_header(name, value)
        .json(&serde_json::json!({ "followingId": alice_id }))
        .await;

    // Public follower list never exposes emails
    let response = app
        .server()
        .get(&format!("/api/follows/user/{}/followers", alice_id))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert!(body["data"][0].get("email").is_none());
}

#[tokio::test]
async fn test_public_lists_unknown_user() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .get(&format!("/api/follows/user/{}/followers", uuid::Uuid::new_v4()))
        .await;
    response.assert_status_not_found();
}
