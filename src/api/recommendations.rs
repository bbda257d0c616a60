//! Recommendation API endpoints.
//!
//! The personalized list is produced by the generator in
//! `services::recommend` and persisted per user; the public picks are
//! simple catalog slices with human-readable reasons.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::services::auth::Claims;
use crate::services::recommend;
use crate::store::models::Recommendation;
use crate::store::CatalogItem;
use crate::AppState;

use super::{ApiResponse, ListResponse, Pagination};

/// Stored recommendations kept per user before pagination.
const STORED_LIMIT: usize = 100;

/// Runs the generator for the user and persists the output.
async fn regenerate(state: &AppState, user_id: Uuid) -> Vec<Recommendation> {
    let history = state.store().history_for_user(user_id).await;
    let generated = recommend::generate(user_id, &history, state.store().catalog());

    let mut stored = Vec::with_capacity(generated.len());
    for rec in generated {
        stored.push(state.store().upsert_recommendation(rec).await);
    }
    stored
}

/// GET /api/recommendations
///
/// Returns the stored list, generating it first when the user has none.
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(page): Query<Pagination>,
) -> Result<Json<ListResponse<Recommendation>>> {
    let mut recommendations = state
        .store()
        .recommendations_for_user(claims.sub, STORED_LIMIT)
        .await;

    if recommendations.is_empty() {
        regenerate(&state, claims.sub).await;
        recommendations = state
            .store()
            .recommendations_for_user(claims.sub, STORED_LIMIT)
            .await;
    }

    Ok(Json(ListResponse::paginate("OK", recommendations, &page)))
}

/// POST /api/recommendations/generate
///
/// Discards the stored list and rebuilds it from the current watch history.
pub async fn generate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Vec<Recommendation>>>> {
    state.store().clear_recommendations(claims.sub).await;
    let recommendations = regenerate(&state, claims.sub).await;

    tracing::info!(
        user_id = %claims.sub,
        count = recommendations.len(),
        "Recommendations regenerated"
    );

    Ok(Json(ApiResponse::ok(
        "Recommendations generated",
        recommendations,
    )))
}

/// DELETE /api/recommendations/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    if !state.store().delete_recommendation(id, claims.sub).await {
        return Err(AppError::NotFound("Recommendation not found".to_string()));
    }
    Ok(Json(ApiResponse::message("Recommendation deleted")))
}

/// A catalog pick with the reason it was selected.
#[derive(Debug, Serialize)]
pub struct Pick {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    /// Optional: exclude this user's watched and favorited titles.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

async fn excluded_ids(state: &AppState, user_id: Option<Uuid>) -> Vec<u32> {
    let Some(user_id) = user_id else {
        return Vec::new();
    };
    let mut ids: Vec<u32> = state
        .store()
        .history_for_user(user_id)
        .await
        .iter()
        .map(|w| w.movie_id)
        .collect();
    ids.extend(
        state
            .store()
            .favorites_for_user(user_id)
            .await
            .iter()
            .map(|f| f.movie_id),
    );
    ids
}

fn by_rating_desc(a: &CatalogItem, b: &CatalogItem) -> std::cmp::Ordering {
    b.rating
        .unwrap_or(0.0)
        .partial_cmp(&a.rating.unwrap_or(0.0))
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// GET /api/recommendations/category/:category (public)
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<PickQuery>,
) -> Result<Json<ApiResponse<Vec<Pick>>>> {
    let excluded = excluded_ids(&state, query.user_id).await;

    let mut items: Vec<CatalogItem> = state
        .store()
        .catalog()
        .iter()
        .filter(|item| item.category == category && !excluded.contains(&item.id))
        .cloned()
        .collect();
    items.sort_by(by_rating_desc);
    items.truncate(query.limit.unwrap_or(10));

    let picks = items
        .into_iter()
        .map(|item| Pick {
            reason: format!("Recommended from the {} category", item.category),
            item,
        })
        .collect();

    Ok(Json(ApiResponse::ok("OK", picks)))
}

/// GET /api/recommendations/popular (public)
pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PickQuery>,
) -> Result<Json<ApiResponse<Vec<Pick>>>> {
    let excluded = excluded_ids(&state, query.user_id).await;

    let mut items: Vec<CatalogItem> = state
        .store()
        .catalog()
        .iter()
        .filter(|item| !excluded.contains(&item.id))
        .cloned()
        .collect();
    items.sort_by(by_rating_desc);
    items.truncate(query.limit.unwrap_or(20));

    let picks = items
        .into_iter()
        .map(|item| Pick {
            reason: "Popular pick".to_string(),
            item,
        })
        .collect();

    Ok(Json(ApiResponse::ok("OK", picks)))
}

/// GET /api/recommendations/new (public)
pub async fn newest(
    State(state): State<AppState>,
    Query(query): Query<PickQuery>,
) -> Result<Json<ApiResponse<Vec<Pick>>>> {
    let excluded = excluded_ids(&state, query.user_id).await;

    let mut items: Vec<CatalogItem> = state
        .store()
        .catalog()
        .iter()
        .filter(|item| !excluded.contains(&item.id))
        .cloned()
        .collect();
    items.sort_by(|a, b| b.year.cmp(&a.year));
    items.truncate(query.limit.unwrap_or(20));

    let picks = items
        .into_iter()
        .map(|item| Pick {
            reason: "New release".to_string(),
            item,
        })
        .collect();

    Ok(Json(ApiResponse::ok("OK", picks)))
}

/// GET /api/recommendations/similar/:movie_id (public)
pub async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<u32>,
    Query(query): Query<PickQuery>,
) -> Result<Json<ApiResponse<Vec<Pick>>>> {
    let source = state
        .store()
        .catalog_item(movie_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut items: Vec<CatalogItem> = state
        .store()
        .catalog()
        .iter()
        .filter(|item| item.category == source.category && item.id != movie_id)
        .cloned()
        .collect();
    items.sort_by(by_rating_desc);
    items.truncate(query.limit.unwrap_or(10));

    let picks = items
        .into_iter()
        .map(|item| Pick {
            reason: format!("Similar to {}", source.title),
            item,
        })
        .collect();

    Ok(Json(ApiResponse::ok("OK", picks)))
}
