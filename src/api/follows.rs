//! Follow API endpoints: directed edges between users.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::auth::Claims;
use crate::store::models::{Follow, UserSummary};
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub following_id: Uuid,
}

/// POST /api/follows
pub async fn follow(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<FollowRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Follow>>)> {
    if body.following_id == claims.sub {
        return Err(AppError::BadRequest("You cannot follow yourself".to_string()));
    }
    if state.store().find_user(body.following_id).await.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let draft = Follow {
        id: Uuid::nil(),
        follower_id: claims.sub,
        following_id: body.following_id,
        created_at: Utc::now(),
    };

    let follow = state
        .store()
        .add_follow(draft)
        .await
        .ok_or_else(|| AppError::BadRequest("Already following this user".to_string()))?;

    tracing::info!(user_id = %claims.sub, following_id = %body.following_id, "Follow added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Followed", follow)),
    ))
}

/// DELETE /api/follows/:following_id
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(following_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store().unfollow(claims.sub, following_id).await {
        return Err(AppError::BadRequest(
            "You are not following this user".to_string(),
        ));
    }

    Ok(Json(ApiResponse::message("Unfollowed")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsFollowingData {
    pub is_following: bool,
}

/// GET /api/follows/check/:following_id
pub async fn check(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(following_id): Path<Uuid>,
) -> Result<Json<ApiResponse<IsFollowingData>>> {
    let is_following = state.store().is_following(claims.sub, following_id).await;
    Ok(Json(ApiResponse::ok("OK", IsFollowingData { is_following })))
}

async fn summaries(
    state: &AppState,
    ids: Vec<Uuid>,
    private: bool,
) -> Vec<UserSummary> {
    let mut result = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(user) = state.store().find_user(id).await {
            result.push(if private {
                UserSummary::private(&user)
            } else {
                UserSummary::public(&user)
            });
        }
    }
    result
}

/// GET /api/follows/following/list
pub async fn following_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<UserSummary>>> {
    let ids = state.store().following_of(claims.sub).await;
    let users = summaries(&state, ids, true).await;
    Ok(Json(ListResponse::paginate("OK", users, &page)))
}

/// GET /api/follows/followers/list
pub async fn followers_list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<UserSummary>>> {
    let ids = state.store().followers_of(claims.sub).await;
    let users = summaries(&state, ids, true).await;
    Ok(Json(ListResponse::paginate("OK", users, &page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStats {
    pub follower_count: usize,
    pub following_count: usize,
}

/// GET /api/follows/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<FollowStats>>> {
    let follower_count = state.store().followers_of(claims.sub).await.len();
    let following_count = state.store().following_of(claims.sub).await.len();

    Ok(Json(ApiResponse::ok(
        "OK",
        FollowStats {
            follower_count,
            following_count,
        },
    )))
}

/// GET /api/follows/user/:user_id/followers (public; summaries omit email)
pub async fn public_followers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<UserSummary>>> {
    if state.store().find_user(user_id).await.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let ids = state.store().followers_of(user_id).await;
    let users = summaries(&state, ids, false).await;
    Ok(Json(ListResponse::paginate("OK", users, &page)))
}

/// GET /api/follows/user/:user_id/following (public; summaries omit email)
pub async fn public_following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<UserSummary>>> {
    if state.store().find_user(user_id).await.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let ids = state.store().following_of(user_id).await;
    let users = summaries(&state, ids, false).await;
    Ok(Json(ListResponse::paginate("OK", users, &page)))
}
