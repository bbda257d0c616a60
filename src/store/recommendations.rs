//! Recommendation table operations. Rows upsert by (user, movie) and are
//! regenerated wholesale by the generator.

use uuid::Uuid;

use super::models::Recommendation;
use super::Store;

impl Store {
    /// Inserts or overwrites the recommendation for (user, movie).
    pub async fn upsert_recommendation(&self, mut rec: Recommendation) -> Recommendation {
        let mut recommendations = self.recommendations.write().await;
        if let Some(existing) = recommendations
            .iter_mut()
            .find(|r| r.user_id == rec.user_id && r.movie_id == rec.movie_id)
        {
            rec.id = existing.id;
            *existing = rec.clone();
            return rec;
        }
        rec.id = Self::next_id();
        recommendations.push(rec.clone());
        rec
    }

    /// Stored recommendations for a user, highest score first, truncated to
    /// `limit`. Stable sort keeps insertion order for equal scores.
    pub async fn recommendations_for_user(&self, user_id: Uuid, limit: usize) -> Vec<Recommendation> {
        let recommendations = self.recommendations.read().await;
        let mut result: Vec<Recommendation> = recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        result.truncate(limit);
        result
    }

    pub async fn clear_recommendations(&self, user_id: Uuid) -> usize {
        let mut recommendations = self.recommendations.write().await;
        let before = recommendations.len();
        recommendations.retain(|r| r.user_id != user_id);
        before - recommendations.len()
    }

    /// Deletes one recommendation, scoped to the owning user.
    pub async fn delete_recommendation(&self, id: Uuid, user_id: Uuid) -> bool {
        let mut recommendations = self.recommendations.write().await;
        let before = recommendations.len();
        recommendations.retain(|r| !(r.id == id && r.user_id == user_id));
        recommendations.len() < before
    }
}
