//! Integration tests for favorites endpoints.

mod common;

use common::TestApp;

fn favorite_body(movie_id: u32, title: &str) -> serde_json::Value {
    serde_json::json!({
        "movieId": movie_id,
        "movieTitle": title,
        "moviePoster": "/posters/1.jpg",
        "movieRating": 8.5,
        "movieCategory": "drama",
        "movieYear": 2023,
        "mediaType": "movie"
    })
}

#[tokio::test]
async fn test_add_and_list_favorites() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    let response = app
        .server()
        .post("/api/favorites")
        .add_header(name.clone(), value.clone())
        .json(&favorite_body(1, "The Long Night"))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let response = app
        .server()
        .get("/api/favorites")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["movieTitle"], "The Long Night");
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_duplicate_favorite_rejected() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    app.server()
        .post("/api/favorites")
        .add_header(name.clone(), value.clone())
        .json(&favorite_body(1, "The Long Night"))
        .await;

    let response = app
        .server()
        .post("/api/favorites")
        .add_header(name, value)
        .json(&favorite_body(1, "The Long Night"))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_check_and_count() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    app.server()
        .post("/api/favorites")
        .add_header(name.clone(), value.clone())
        .json(&favorite_body(3, "Quiet Rivers"))
        .await;

    let response = app
        .server()
        .get("/api/favorites/check/3")
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["isFavorited"], true);

    let response = app
        .server()
        .get("/api/favorites/check/99")
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["isFavorited"], false);

    let response = app
        .server()
        .get("/api/favorites/count")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_remove_favorite_is_idempotent() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    app.server()
        .post("/api/favorites")
        .add_header(name.clone(), value.clone())
        .json(&favorite_body(1, "The Long Night"))
        .await;

    let response = app
        .server()
        .delete("/api/favorites/1")
        .add_header(name.clone(), value.clone())
        .await;
    response.assert_status_ok();

    // Removing again still succeeds
    let response = app
        .server()
        .delete("/api/favorites/1")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_batch_remove_and_clear() {
    let app = TestApp::new().await;
    let (_, token) = app.create_user("13800138000").await;
    let (name, value) = app.auth_header(&token);

    for id in 1..=4 {
        app.server()
            .post("/api/favorites")
            .add_header(name.clone(), value.clone())
            .json(&favorite_body(id, &format!("Title {}", id)))
            .await;
    }

    let response = app
        .server()
        .post("/api/favorites/batch/remove")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({ "movieIds": [1, 2] }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["count"], 2);

    // Empty batch is rejected
    let response = app
        .server()
        .post("/api/favorites/batch/remove")
        .add_header(name.clone(), value.clone())
        .json(&serde_json::json!({ "movieIds": [] }))
        .await;
    response.assert_status_bad_request();

    let response = app
        .server()
        .post("/api/favorites/clear/all")
        .add_header(name.clone(), value.clone())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["count"], 2);

    let response = app
        .server()
        .get("/api/favorites/count")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_favorites_are_per_user() {
    let app = TestApp::new().await;
    let (_, alice) = app.create_user("13800138000").await;
    let (_, bob) = app.create_user("13900139000").await;

    let (name, value) = app.auth_header(&alice);
    app.server()
        .post("/api/favorites")
        .add_header(name, value)
        .json(&favorite_body(1, "The Long Night"))
        .await;

    let (name, value) = app.auth_header(&bob);
    let response = app
        .server()
        .get("/api/favorites")
        .add_header(name, value)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_favorites_require_auth() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/favorites").await;
    response.assert_status_unauthorized();

    let response = app
        .server()
        .post("/api/favorites")
        .json(&favorite_body(1, "The Long Night"))
        .await;
    response.assert_status_unauthorized();
}
