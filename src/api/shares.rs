//! Share API endpoints: record share events for movies, playlists, and
//! profiles, plus QR code and preview helpers.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::auth::Claims;
use crate::store::models::Share;
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

/// What a share target looks like when rendered by the receiving platform.
#[derive(Debug, Serialize)]
pub struct ShareContent {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareData {
    pub share: Share,
    pub share_content: ShareContent,
}

fn share_draft(user_id: Uuid, platform: String, share_url: String) -> Share {
    Share {
        id: Uuid::nil(),
        user_id,
        movie_id: None,
        movie_title: None,
        movie_poster: None,
        playlist_id: None,
        playlist_name: None,
        target_user_id: None,
        platform,
        share_url,
        shared_at: Utc::now(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMovieRequest {
    pub movie_id: u32,
    pub movie_title: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    pub platform: String,
}

/// POST /api/shares/movie
pub async fn share_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ShareMovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareData>>)> {
    if body.movie_title.trim().is_empty() || body.platform.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Movie title and platform are required".to_string(),
        ));
    }

    let url = format!(
        "{}/movie/{}",
        state.config().frontend.base_url,
        body.movie_id
    );
    let poster = body.movie_poster.unwrap_or_default();

    let mut draft = share_draft(claims.sub, body.platform, url.clone());
    draft.movie_id = Some(body.movie_id);
    draft.movie_title = Some(body.movie_title.clone());
    draft.movie_poster = Some(poster.clone());

    let share = state.store().add_share(draft).await;
    tracing::info!(user_id = %claims.sub, movie_id = body.movie_id, "Movie shared");

    let data = ShareData {
        share,
        share_content: ShareContent {
            title: body.movie_title.clone(),
            description: format!("Watch {} on CineHub", body.movie_title),
            image: poster,
            url,
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Share recorded", data)),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePlaylistRequest {
    pub playlist_id: Uuid,
    pub playlist_name: String,
    pub platform: String,
}

/// POST /api/shares/playlist
pub async fn share_playlist(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<SharePlaylistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareData>>)> {
    if body.playlist_name.trim().is_empty() || body.platform.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Playlist name and platform are required".to_string(),
        ));
    }

    let url = format!(
        "{}/playlist/{}",
        state.config().frontend.base_url,
        body.playlist_id
    );

    let mut draft = share_draft(claims.sub, body.platform, url.clone());
    draft.playlist_id = Some(body.playlist_id);
    draft.playlist_name = Some(body.playlist_name.clone());

    let share = state.store().add_share(draft).await;

    let data = ShareData {
        share,
        share_content: ShareContent {
            title: body.playlist_name.clone(),
            description: format!("Check out the playlist {} on CineHub", body.playlist_name),
            image: String::new(),
            url,
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Share recorded", data)),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareProfileRequest {
    pub target_user_id: Uuid,
    pub platform: String,
}

/// POST /api/shares/profile
pub async fn share_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ShareProfileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareData>>)> {
    if body.platform.trim().is_empty() {
        return Err(AppError::BadRequest("Platform is required".to_string()));
    }
    let target = state
        .store()
        .find_user(body.target_user_id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let url = format!(
        "{}/user/{}",
        state.config().frontend.base_url,
        body.target_user_id
    );

    let mut draft = share_draft(claims.sub, body.platform, url.clone());
    draft.target_user_id = Some(body.target_user_id);

    let share = state.store().add_share(draft).await;

    let data = ShareData {
        share,
        share_content: ShareContent {
            title: target.nickname.clone(),
            description: format!("Follow {} on CineHub", target.nickname),
            image: target.avatar,
            url,
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Share recorded", data)),
    ))
}

/// GET /api/shares
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Share>>> {
    let shares = state.store().shares_for_user(claims.sub).await;
    Ok(Json(ListResponse::paginate("OK", shares, &page)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareStats {
    pub total_shares: usize,
    pub platform_stats: HashMap<String, usize>,
}

/// GET /api/shares/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<ShareStats>>> {
    let shares = state.store().shares_for_user(claims.sub).await;

    let mut platform_stats: HashMap<String, usize> = HashMap::new();
    for share in &shares {
        *platform_stats.entry(share.platform.clone()).or_insert(0) += 1;
    }

    Ok(Json(ApiResponse::ok(
        "OK",
        ShareStats {
            total_shares: shares.len(),
            platform_stats,
        },
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareTargetType {
    Movie,
    Playlist,
    User,
}

#[derive(Debug, Deserialize)]
pub struct QrRequest {
    #[serde(rename = "type")]
    pub target_type: ShareTargetType,
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrData {
    pub share_url: String,
    pub qr_code_url: String,
}

fn target_url(base: &str, target_type: &ShareTargetType, id: &str) -> String {
    match target_type {
        ShareTargetType::Movie => format!("{}/movie/{}", base, id),
        ShareTargetType::Playlist => format!("{}/playlist/{}", base, id),
        ShareTargetType::User => format!("{}/user/{}", base, id),
    }
}

/// POST /api/shares/qr
///
/// Builds a QR image URL for the share link via the external qrserver API.
pub async fn qr(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<QrRequest>,
) -> Result<Json<ApiResponse<QrData>>> {
    if body.id.trim().is_empty() {
        return Err(AppError::BadRequest("Target id is required".to_string()));
    }

    let share_url = target_url(&state.config().frontend.base_url, &body.target_type, &body.id);
    let qr_code_url = format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={}",
        urlencoding::encode(&share_url)
    );

    tracing::debug!(user_id = %claims.sub, url = %share_url, "QR code requested");

    Ok(Json(ApiResponse::ok(
        "OK",
        QrData {
            share_url,
            qr_code_url,
        },
    )))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(rename = "type")]
    pub target_type: ShareTargetType,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewData {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
}

/// GET /api/shares/preview (public)
///
/// Static metadata for link previews on the receiving platform.
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<ApiResponse<PreviewData>>> {
    let url = target_url(&state.config().frontend.base_url, &query.target_type, &query.id);

    let (title, description) = match query.target_type {
        ShareTargetType::Movie => {
            let title = query
                .id
                .parse::<u32>()
                .ok()
                .and_then(|id| state.store().catalog_item(id))
                .map(|item| item.title.clone())
                .unwrap_or_else(|| "CineHub".to_string());
            (title.clone(), format!("Watch {} on CineHub", title))
        }
        ShareTargetType::Playlist => (
            "CineHub playlist".to_string(),
            "A hand-picked playlist on CineHub".to_string(),
        ),
        ShareTargetType::User => (
            "CineHub profile".to_string(),
            "A movie lover on CineHub".to_string(),
        ),
    };

    Ok(Json(ApiResponse::ok(
        "OK",
        PreviewData {
            title,
            description,
            image: "https://via.placeholder.com/300x200?text=CineHub".to_string(),
            url,
        },
    )))
}
