//! Comment API endpoints: rated reviews with likes and threaded replies.

use std::collections::HashMap;

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
use crate::store::models::{Comment, Reply, DEFAULT_COMMENT_AVATAR};
use crate::store::Denied;
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

fn validate_rating(rating: u8) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

fn denied_to_error(denied: Denied) -> AppError {
    match denied {
        Denied::NotFound => AppError::NotFound("Comment not found".to_string()),
        Denied::NotOwner => AppError::Forbidden("You can only modify your own comments".to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub movie_id: u32,
    pub content: String,
    pub rating: u8,
}

/// POST /api/comments
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Comment>>)> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Comment content is required".to_string()));
    }
    validate_rating(body.rating)?;

    let user = state
        .store()
        .find_user(claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let now = Utc::now();
    let draft = Comment {
        id: Uuid::nil(),
        user_id: user.id,
        user_name: user.nickname,
        user_avatar: user.avatar,
        movie_id: body.movie_id,
        rating: body.rating,
        content: body.content,
        likes: 0,
        liked_by: Vec::new(),
        replies: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    let comment = state.store().add_comment(draft).await;
    tracing::info!(user_id = %claims.sub, comment_id = %comment.id, "Comment posted");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Comment posted", comment)),
    ))
}

#[derive(Debug, Deserialize)]
pub struct MovieCommentsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_limit() -> usize {
    20
}

/// GET /api/comments/movie/:movie_id
///
/// `sort`: `latest` (default), `helpful` (likes desc), `rating` (desc).
pub async fn for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<u32>,
    Query(query): Query<MovieCommentsQuery>,
) -> Result<Json<ListResponse<Comment>>> {
    let mut comments = state.store().comments_for_movie(movie_id).await;

    match query.sort.as_deref() {
        Some("helpful") => comments.sort_by(|a, b| b.likes.cmp(&a.likes)),
        Some("rating") => comments.sort_by(|a, b| b.rating.cmp(&a.rating)),
        _ => {} // already newest first
    }

    let page = Pagination {
        limit: query.limit,
        offset: query.offset,
    };
    Ok(Json(ListResponse::paginate("OK", comments, &page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentStats {
    pub total_comments: usize,
    pub average_rating: f64,
    pub rating_distribution: HashMap<String, usize>,
}

/// GET /api/comments/movie/:movie_id/stats
pub async fn movie_stats(
    State(state): State<AppState>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<CommentStats>>> {
    let comments = state.store().comments_for_movie(movie_id).await;
    let average_rating = state.store().average_rating(movie_id).await;
    let distribution = state.store().rating_distribution(movie_id).await;

    let mut rating_distribution = HashMap::new();
    for (index, count) in distribution.iter().enumerate() {
        rating_distribution.insert((index + 1).to_string(), *count);
    }

    Ok(Json(ApiResponse::ok(
        "OK",
        CommentStats {
            total_comments: comments.len(),
            average_rating,
            rating_distribution,
        },
    )))
}

/// GET /api/comments/user
pub async fn for_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Comment>>> {
    let comments = state.store().comments_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", comments, &page)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
}

/// PUT /api/comments/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<ApiResponse<Comment>>> {
    if let Some(rating) = body.rating {
        validate_rating(rating)?;
    }
    if let Some(content) = body.content.as_deref() {
        if content.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Comment content must not be empty".to_string(),
            ));
        }
    }

    let updated = state
        .store()
        .update_comment(id, claims.sub, |comment| {
            if let Some(content) = body.content {
                comment.content = content;
            }
            if let Some(rating) = body.rating {
                comment.rating = rating;
            }
        })
        .await
        .map_err(denied_to_error)?;

    Ok(Json(ApiResponse::ok("Comment updated", updated)))
}

/// DELETE /api/comments/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .store()
        .delete_comment(id, claims.sub)
        .await
        .map_err(denied_to_error)?;

    Ok(Json(ApiResponse::message("Comment deleted")))
}

/// POST /api/comments/:id/like
pub async fn like(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Comment>>> {
    let comment = state
        .store()
        .like_comment(id, claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Comment liked", comment)))
}

/// DELETE /api/comments/:id/like
pub async fn unlike(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Comment>>> {
    let comment = state
        .store()
        .unlike_comment(id, claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Like removed", comment)))
}

#[derive(Debug, Deserialize)]
pub struct AddReplyRequest {
    pub content: String,
}

/// POST /api/comments/:id/replies
pub async fn add_reply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddReplyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reply>>)> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Reply content is required".to_string()));
    }

    let user = state
        .store()
        .find_user(claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let draft = Reply {
        id: Uuid::nil(),
        user_id: user.id,
        user_name: user.nickname,
        user_avatar: if user.avatar.is_empty() {
            DEFAULT_COMMENT_AVATAR.to_string()
        } else {
            user.avatar
        },
        content: body.content,
        created_at: Utc::now(),
    };

    let reply = state
        .store()
        .add_reply(id, draft)
        .await
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Reply posted", reply)),
    ))
}

/// DELETE /api/comments/:id/replies/:reply_id
///
/// Allowed for the reply author and the comment owner.
pub async fn delete_reply(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, reply_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .store()
        .delete_reply(id, reply_id, claims.sub)
        .await
        .map_err(|denied| match denied {
            Denied::NotFound => AppError::NotFound("Reply not found".to_string()),
            Denied::NotOwner => {
                AppError::Forbidden("You can only delete your own replies".to_string())
            }
        })?;

    Ok(Json(ApiResponse::message("Reply deleted")))
}
