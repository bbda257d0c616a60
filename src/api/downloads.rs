//! Download API endpoints.

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
use crate::store::models::{Download, DownloadStatus, MediaType, Quality};
use crate::store::Denied;
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDownloadRequest {
    pub movie_id: u32,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub quality: Option<Quality>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub status: Option<DownloadStatus>,
}

/// POST /api/downloads
///
/// Re-downloading the same movie at the same quality overwrites the record.
pub async fn add(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<AddDownloadRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Download>>)> {
    if body.movie_title.trim().is_empty() {
        return Err(AppError::BadRequest("Movie title is required".to_string()));
    }

    let draft = Download {
        id: Uuid::nil(),
        user_id: claims.sub,
        movie_id: body.movie_id,
        movie_title: body.movie_title,
        movie_poster: body.movie_poster.unwrap_or_default(),
        media_type: body.media_type.unwrap_or_default(),
        quality: body.quality.unwrap_or_default(),
        file_size: body.file_size.unwrap_or(0),
        status: body.status.unwrap_or_default(),
        downloaded_at: Utc::now(),
    };

    let download = state.store().save_download(draft).await;
    tracing::info!(
        user_id = %claims.sub,
        movie_id = download.movie_id,
        quality = %download.quality,
        "Download saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Download saved", download)),
    ))
}

/// GET /api/downloads
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Download>>> {
    let downloads = state.store().downloads_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", downloads, &page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadStats {
    pub total_count: usize,
    pub total_size: u64,
    pub quality_distribution: HashMap<String, usize>,
}

/// GET /api/downloads/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<DownloadStats>>> {
    let downloads = state.store().downloads_for_user(claims.sub).await;

    let mut quality_distribution: HashMap<String, usize> = HashMap::new();
    for quality in Quality::ALL {
        quality_distribution.insert(quality.as_str().to_string(), 0);
    }
    for download in &downloads {
        *quality_distribution
            .entry(download.quality.as_str().to_string())
            .or_insert(0) += 1;
    }

    let stats = DownloadStats {
        total_count: downloads.len(),
        total_size: state.store().total_download_size(claims.sub).await,
        quality_distribution,
    };

    Ok(Json(ApiResponse::ok("OK", stats)))
}

/// GET /api/downloads/movie/:movie_id
pub async fn for_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<Vec<Download>>>> {
    let downloads = state.store().downloads_for_movie(claims.sub, movie_id).await;
    Ok(Json(ApiResponse::ok("OK", downloads)))
}

/// DELETE /api/downloads/:download_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(download_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .store()
        .delete_download(download_id, claims.sub)
        .await
        .map_err(|denied| match denied {
            Denied::NotFound => AppError::NotFound("Download not found".to_string()),
            Denied::NotOwner => {
                AppError::Forbidden("You can only delete your own downloads".to_string())
            }
        })?;

    Ok(Json(ApiResponse::message("Download deleted")))
}

/// DELETE /api/downloads/movie/:movie_id
pub async fn delete_for_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(movie_id): Path<u32>,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state
        .store()
        .delete_movie_downloads(claims.sub, movie_id)
        .await;
    Ok(Json(ApiResponse::message(format!(
        "Removed {} downloads",
        removed
    ))))
}

/// DELETE /api/downloads/clear/all
pub async fn clear(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<()>>> {
    let removed = state.store().clear_downloads(claims.sub).await;
    tracing::info!(user_id = %claims.sub, removed = removed, "Downloads cleared");
    Ok(Json(ApiResponse::message(format!(
        "Removed {} downloads",
        removed
    ))))
}
