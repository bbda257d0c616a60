//! Content-based recommendation generator.
//!
//! Scores every unwatched catalog title against the user's watch history:
//! ten points per historical watch in the same category, plus a flat five
//! point bonus for highly rated titles. Zero-score candidates are dropped
//! and the rest are kept in descending score order, capped at twenty.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::store::catalog::CatalogItem;
use crate::store::models::{Recommendation, WatchHistory};

const CATEGORY_WEIGHT: f64 = 10.0;
const RATING_BONUS: f64 = 5.0;
const RATING_THRESHOLD: f64 = 8.0;
const MAX_RECOMMENDATIONS: usize = 20;

/// Builds the recommendation list for a user from their watch history.
///
/// Pure function over the inputs; the caller persists the result. The
/// sort is stable, so equally scored titles keep catalog order.
pub fn generate(
    user_id: Uuid,
    history: &[WatchHistory],
    catalog: &[CatalogItem],
) -> Vec<Recommendation> {
    let watched: Vec<u32> = history.iter().map(|w| w.movie_id).collect();

    let mut category_freq: HashMap<&str, usize> = HashMap::new();
    for record in history {
        if let Some(item) = catalog.iter().find(|c| c.id == record.movie_id) {
            *category_freq.entry(item.category.as_str()).or_insert(0) += 1;
        }
    }

    let mut scored: Vec<(f64, &CatalogItem, String)> = Vec::new();
    for item in catalog {
        if watched.contains(&item.id) {
            continue;
        }

        let freq = category_freq.get(item.category.as_str()).copied().unwrap_or(0);
        let highly_rated = item.rating.map_or(false, |r| r >= RATING_THRESHOLD);

        let mut score = freq as f64 * CATEGORY_WEIGHT;
        if highly_rated {
            score += RATING_BONUS;
        }
        if score == 0.0 {
            continue;
        }

        let reason = if freq > 0 {
            let mut reason = format!("Based on the {} titles you watched", item.category);
            if highly_rated {
                reason.push_str(", and it is highly rated");
            }
            reason
        } else {
            "Highly rated".to_string()
        };

        scored.push((score, item, reason));
    }

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MAX_RECOMMENDATIONS);

    scored
        .into_iter()
        .map(|(score, item, reason)| Recommendation {
            id: Uuid::nil(),
            user_id,
            movie_id: item.id,
            movie_title: item.title.clone(),
            movie_poster: item.poster.clone(),
            movie_category: item.category.clone(),
            media_type: item.media_type,
            reason,
            score,
            created_at: Utc::now(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::MediaType;

    fn item(id: u32, category: &str, rating: Option<f64>) -> CatalogItem {
        CatalogItem {
            id,
            title: format!("Title {}", id),
            poster: format!("/posters/{}.jpg", id),
            category: category.to_string(),
            year: 2024,
            rating,
            media_type: MediaType::Movie,
        }
    }

    fn watch(user_id: Uuid, movie_id: u32) -> WatchHistory {
        WatchHistory {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            movie_title: String::new(),
            movie_poster: String::new(),
            media_type: MediaType::Movie,
            duration: 0,
            progress: 100.0,
            watched_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_match_with_rating_bonus() {
        let user = Uuid::new_v4();
        let catalog = vec![
            item(1, "drama", Some(7.0)),
            item(2, "drama", Some(9.0)),
            item(3, "comedy", Some(6.0)),
        ];
        let history = vec![watch(user, 1)];

        let recs = generate(user, &history, &catalog);

        // Only the unwatched drama scores: 10 for the category plus 5 for
        // the high rating. The comedy has no signal at all.
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 2);
        assert_eq!(recs[0].score, 15.0);
        assert_eq!(
            recs[0].reason,
            "Based on the drama titles you watched, and it is highly rated"
        );
    }

    #[test]
    fn test_repeat_watches_raise_category_weight() {
        let user = Uuid::new_v4();
        let catalog = vec![
            item(1, "action", None),
            item(2, "action", None),
            item(3, "action", Some(5.0)),
            item(4, "romance", Some(5.0)),
        ];
        let history = vec![watch(user, 1), watch(user, 2), watch(user, 4)];

        let recs = generate(user, &history, &catalog);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 3);
        assert_eq!(recs[0].score, 20.0);
        assert_eq!(recs[0].reason, "Based on the action titles you watched");
    }

    #[test]
    fn test_rating_alone_still_recommends() {
        let user = Uuid::new_v4();
        let catalog = vec![item(1, "drama", Some(7.0)), item(2, "sci-fi", Some(8.5))];
        let history = vec![watch(user, 1)];

        let recs = generate(user, &history, &catalog);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 2);
        assert_eq!(recs[0].score, 5.0);
        assert_eq!(recs[0].reason, "Highly rated");
    }

    #[test]
    fn test_unrated_titles_get_no_bonus() {
        let user = Uuid::new_v4();
        let catalog = vec![item(1, "drama", None), item(2, "comedy", None)];
        let history = vec![watch(user, 1)];

        let recs = generate(user, &history, &catalog);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_watched_titles_never_recommended() {
        let user = Uuid::new_v4();
        let catalog = vec![item(1, "drama", Some(9.0)), item(2, "drama", Some(9.0))];
        let history = vec![watch(user, 1), watch(user, 2)];

        let recs = generate(user, &history, &catalog);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_empty_history_falls_back_to_rating_picks() {
        let user = Uuid::new_v4();
        let catalog = vec![item(1, "drama", Some(9.0)), item(2, "comedy", Some(6.0))];

        let recs = generate(user, &[], &catalog);

        // No category signal, so only the rating bonus contributes
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 1);
        assert_eq!(recs[0].score, 5.0);
        assert_eq!(recs[0].reason, "Highly rated");
    }

    #[test]
    fn test_capped_at_twenty_in_score_order() {
        let user = Uuid::new_v4();
        let mut catalog = vec![item(1, "drama", None)];
        for id in 2..=30 {
            // Half the candidates are also highly rated so scores differ
            let rating = if id % 2 == 0 { Some(9.0) } else { Some(6.0) };
            catalog.push(item(id, "drama", rating));
        }
        let history = vec![watch(user, 1)];

        let recs = generate(user, &history, &catalog);

        assert_eq!(recs.len(), 20);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // The 15-point candidates fill the front of the list
        assert_eq!(recs[0].score, 15.0);
    }

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let user = Uuid::new_v4();
        let catalog = vec![
            item(1, "drama", None),
            item(2, "drama", Some(6.0)),
            item(3, "drama", Some(6.0)),
        ];
        let history = vec![watch(user, 1)];

        let recs = generate(user, &history, &catalog);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].movie_id, 2);
        assert_eq!(recs[1].movie_id, 3);
    }
}
