//! Watch history API endpoints. One record per (user, movie); re-watching
//! overwrites it.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::auth::Claims;
use crate::store::models::{MediaType, WatchHistory};
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

fn validate_progress(progress: f32) -> Result<()> {
    if !(0.0..=100.0).contains(&progress) {
        return Err(AppError::BadRequest(
            "Progress must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWatchRequest {
    pub movie_id: u32,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub progress: Option<f32>,
}

/// POST /api/watch-history
pub async fn record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<RecordWatchRequest>,
) -> Result<Json<ApiResponse<WatchHistory>>> {
    if body.movie_title.trim().is_empty() {
        return Err(AppError::BadRequest("Movie title is required".to_string()));
    }
    let progress = body.progress.unwrap_or(0.0);
    validate_progress(progress)?;

    let draft = WatchHistory {
        id: Uuid::nil(),
        user_id: claims.sub,
        movie_id: body.movie_id,
        movie_title: body.movie_title,
        movie_poster: body.movie_poster.unwrap_or_default(),
        media_type: body.media_type.unwrap_or_default(),
        duration: body.duration.unwrap_or(0),
        progress,
        watched_at: Utc::now(),
    };

    let saved = state.store().save_watch(draft).await;
    Ok(Json(ApiResponse::ok("Watch recorded", saved)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWatchRequest {
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub progress: Option<f32>,
}

/// PUT /api/watch-history/:movie_id
///
/// Updates progress on an existing record, creating a minimal one from the
/// catalog when none exists yet.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
    Json(body): Json<UpdateWatchRequest>,
) -> Result<Json<ApiResponse<WatchHistory>>> {
    if let Some(progress) = body.progress {
        validate_progress(progress)?;
    }

    if let Some(updated) = state
        .store()
        .update_watch_progress(claims.sub, movie_id, body.duration, body.progress)
        .await
    {
        return Ok(Json(ApiResponse::ok("Progress updated", updated)));
    }

    let item = state
        .store()
        .catalog_item(movie_id)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let draft = WatchHistory {
        id: Uuid::nil(),
        user_id: claims.sub,
        movie_id,
        movie_title: item.title.clone(),
        movie_poster: item.poster.clone(),
        media_type: item.media_type,
        duration: body.duration.unwrap_or(0),
        progress: body.progress.unwrap_or(0.0),
        watched_at: Utc::now(),
    };
    let saved = state.store().save_watch(draft).await;

    Ok(Json(ApiResponse::ok("Progress updated", saved)))
}

/// GET /api/watch-history
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<WatchHistory>>> {
    let history = state.store().history_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", history, &page)))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

fn default_recent_limit() -> usize {
    10
}

/// GET /api/watch-history/recent
pub async fn recent(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<ApiResponse<Vec<WatchHistory>>>> {
    let mut history = state.store().history_for_user(claims.sub).await;
    history.truncate(query.limit);
    Ok(Json(ApiResponse::ok("OK", history)))
}

/// GET /api/watch-history/:movie_id
///
/// `data` is null when the movie has not been watched; still a 200.
pub async fn single(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<Option<WatchHistory>>>> {
    let record = state.store().watch_record(claims.sub, movie_id).await;
    Ok(Json(ApiResponse::ok("OK", record)))
}

/// DELETE /api/watch-history/:movie_id
///
/// Succeeds whether or not a record exists, like removing a favorite.
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<()>>> {
    state.store().delete_watch(claims.sub, movie_id).await;
    Ok(Json(ApiResponse::message("Watch record deleted")))
}

/// DELETE /api/watch-history/clear/all
pub async fn clear(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state.store().clear_history(claims.sub).await;
    tracing::info!(user_id = %claims.sub, removed = removed, "Watch history cleared");
    Ok(Json(ApiResponse::message(format!(
        "Removed {} watch records",
        removed
    ))))
}
