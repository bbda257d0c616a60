//! Favorites API endpoints.

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
use crate::store::models::{Favorite, MediaType};
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub movie_id: u32,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    #[serde(default)]
    pub movie_rating: Option<f64>,
    #[serde(default)]
    pub movie_category: Option<String>,
    #[serde(default)]
    pub movie_year: Option<i32>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

/// POST /api/favorites
pub async fn add(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Favorite>>)> {
    if body.movie_title.trim().is_empty() {
        return Err(AppError::BadRequest("Movie title is required".to_string()));
    }

    let draft = Favorite {
        id: Uuid::nil(),
        user_id: claims.sub,
        movie_id: body.movie_id,
        movie_title: body.movie_title,
        movie_poster: body.movie_poster.unwrap_or_default(),
        movie_rating: body.movie_rating.unwrap_or(0.0),
        movie_category: body.movie_category.unwrap_or_default(),
        movie_year: body.movie_year.unwrap_or(0),
        media_type: body.media_type.unwrap_or_default(),
        created_at: Utc::now(),
    };

    let favorite = state
        .store()
        .add_favorite(draft)
        .await
        .ok_or_else(|| AppError::BadRequest("Already in favorites".to_string()))?;

    tracing::info!(user_id = %claims.sub, movie_id = favorite.movie_id, "Favorite added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Added to favorites", favorite)),
    ))
}

/// GET /api/favorites
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Favorite>>> {
    let favorites = state.store().favorites_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", favorites, &page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckData {
    pub is_favorited: bool,
}

/// GET /api/favorites/check/:movie_id
pub async fn check(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<CheckData>>> {
    let is_favorited = state.store().is_favorited(claims.sub, movie_id).await;
    Ok(Json(ApiResponse::ok("OK", CheckData { is_favorited })))
}

#[derive(Debug, Serialize)]
pub struct CountData {
    pub count: usize,
}

/// GET /api/favorites/count
pub async fn count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<CountData>>> {
    let count = state.store().favorite_count(claims.sub).await;
    Ok(Json(ApiResponse::ok("OK", CountData { count })))
}

/// DELETE /api/favorites/:movie_id
///
/// Removing an absent favorite still succeeds.
pub async fn remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<()>>> {
    state.store().remove_favorite(claims.sub, movie_id).await;
    Ok(Json(ApiResponse::message("Removed from favorites")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRemoveRequest {
    pub movie_ids: Vec<u32>,
}

/// POST /api/favorites/batch/remove
pub async fn batch_remove(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<BatchRemoveRequest>,
) -> Result<Json<ApiResponse<CountData>>> {
    if body.movie_ids.is_empty() {
        return Err(AppError::BadRequest(
            "movieIds must not be empty".to_string(),
        ));
    }

    let removed = state
        .store()
        .remove_favorites(claims.sub, &body.movie_ids)
        .await;

    Ok(Json(ApiResponse::ok(
        format!("Removed {} favorites", removed),
        CountData { count: removed },
    )))
}

/// POST /api/favorites/clear/all
pub async fn clear(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<CountData>>> {
    let removed = state.store().clear_favorites(claims.sub).await;
    tracing::info!(user_id = %claims.sub, removed = removed, "Favorites cleared");

    Ok(Json(ApiResponse::ok(
        format!("Removed {} favorites", removed),
        CountData { count: removed },
    )))
}
