//! Playlist API endpoints.
//!
//! Playlists are owned: any id that belongs to another user reads as 404.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::auth::Claims;
use crate::store::models::Playlist;
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

const MAX_NAME_LEN: usize = 50;
const DEFAULT_ICON: &str = "📁";

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Playlist name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(
            "Playlist name must be at most 50 characters".to_string(),
        ));
    }
    Ok(name.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// POST /api/playlists
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Playlist>>)> {
    let name = validate_name(&body.name)?;

    let draft = Playlist::draft(
        claims.sub,
        name,
        body.description.unwrap_or_default(),
        body.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
        body.is_public.unwrap_or(false),
    );

    let playlist = state.store().create_playlist(draft).await.ok_or_else(|| {
        AppError::BadRequest("A playlist with this name already exists".to_string())
    })?;

    tracing::info!(user_id = %claims.sub, playlist_id = %playlist.id, "Playlist created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Playlist created", playlist)),
    ))
}

/// GET /api/playlists
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Playlist>>> {
    let playlists = state.store().playlists_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", playlists, &page)))
}

/// GET /api/playlists/:id
pub async fn detail(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Playlist>>> {
    let playlist = state
        .store()
        .playlist_for_user(id, claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(ApiResponse::ok("OK", playlist)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

/// PUT /api/playlists/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePlaylistRequest>,
) -> Result<Json<ApiResponse<Playlist>>> {
    let name = match body.name.as_deref() {
        Some(raw) => {
            let name = validate_name(raw)?;
            // Renaming must not collide with another of the user's playlists
            let taken = state
                .store()
                .playlists_for_user(claims.sub)
                .await
                .iter()
                .any(|p| p.id != id && p.name == name);
            if taken {
                return Err(AppError::BadRequest(
                    "A playlist with this name already exists".to_string(),
                ));
            }
            Some(name)
        }
        None => None,
    };

    let updated = state
        .store()
        .with_playlist(id, claims.sub, |playlist| {
            if let Some(name) = name {
                playlist.name = name;
            }
            if let Some(description) = body.description {
                playlist.description = description;
            }
            if let Some(icon) = body.icon {
                playlist.icon = icon;
            }
            if let Some(is_public) = body.is_public {
                playlist.is_public = is_public;
            }
            playlist.clone()
        })
        .await
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(ApiResponse::ok("Playlist updated", updated)))
}

/// DELETE /api/playlists/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store().delete_playlist(id, claims.sub).await {
        return Err(AppError::NotFound("Playlist not found".to_string()));
    }

    tracing::info!(user_id = %claims.sub, playlist_id = %id, "Playlist deleted");
    Ok(Json(ApiResponse::message("Playlist deleted")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMovieRequest {
    pub movie_id: u32,
}

/// POST /api/playlists/:id/movies
pub async fn add_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddMovieRequest>,
) -> Result<Json<ApiResponse<Playlist>>> {
    let result = state
        .store()
        .with_playlist(id, claims.sub, |playlist| {
            (playlist.add_movie(body.movie_id), playlist.clone())
        })
        .await;

    match result {
        Some((true, playlist)) => Ok(Json(ApiResponse::ok("Movie added to playlist", playlist))),
        Some((false, _)) => Err(AppError::BadRequest(
            "Movie is already in this playlist".to_string(),
        )),
        None => Err(AppError::NotFound("Playlist not found".to_string())),
    }
}

/// DELETE /api/playlists/:id/movies/:movie_id
pub async fn remove_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, movie_id)): Path<(Uuid, u32)>,
) -> Result<Json<ApiResponse<Playlist>>> {
    let result = state
        .store()
        .with_playlist(id, claims.sub, |playlist| {
            (playlist.remove_movie(movie_id), playlist.clone())
        })
        .await;

    match result {
        Some((true, playlist)) => Ok(Json(ApiResponse::ok(
            "Movie removed from playlist",
            playlist,
        ))),
        Some((false, _)) => Err(AppError::NotFound(
            "Movie is not in this playlist".to_string(),
        )),
        None => Err(AppError::NotFound("Playlist not found".to_string())),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InPlaylistData {
    pub in_playlist: bool,
}

/// GET /api/playlists/:id/movies/:movie_id/check
pub async fn check_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, movie_id)): Path<(Uuid, u32)>,
) -> Result<Json<ApiResponse<InPlaylistData>>> {
    let playlist = state
        .store()
        .playlist_for_user(id, claims.sub)
        .await
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    Ok(Json(ApiResponse::ok(
        "OK",
        InPlaylistData {
            in_playlist: playlist.has_movie(movie_id),
        },
    )))
}

/// POST /api/playlists/:id/clear
pub async fn clear(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Playlist>>> {
    let result = state
        .store()
        .with_playlist(id, claims.sub, |playlist| {
            let removed = playlist.movies.len();
            playlist.movies.clear();
            (removed, playlist.clone())
        })
        .await;

    match result {
        Some((removed, playlist)) => Ok(Json(ApiResponse::ok(
            format!("Removed {} movies from playlist", removed),
            playlist,
        ))),
        None => Err(AppError::NotFound("Playlist not found".to_string())),
    }
}
