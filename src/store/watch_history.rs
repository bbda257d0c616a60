//! Watch history table operations. One record per (user, movie).

use chrono::Utc;
use uuid::Uuid;

use super::models::WatchHistory;
use super::Store;

impl Store {
    /// Inserts or overwrites the record for (user, movie).
    pub async fn save_watch(&self, mut record: WatchHistory) -> WatchHistory {
        let mut history = self.watch_history.write().await;
        if let Some(existing) = history
            .iter_mut()
            .find(|w| w.user_id == record.user_id && w.movie_id == record.movie_id)
        {
            record.id = existing.id;
            *existing = record.clone();
            return record;
        }
        record.id = Self::next_id();
        history.push(record.clone());
        record
    }

    /// Updates progress/duration in place, refreshing `watched_at`.
    /// Returns None when no record exists for the pair.
    pub async fn update_watch_progress(
        &self,
        user_id: Uuid,
        movie_id: u32,
        duration: Option<u64>,
        progress: Option<f32>,
    ) -> Option<WatchHistory> {
        let mut history = self.watch_history.write().await;
        let record = history
            .iter_mut()
            .find(|w| w.user_id == user_id && w.movie_id == movie_id)?;
        if let Some(duration) = duration {
            record.duration = duration;
        }
        if let Some(progress) = progress {
            record.progress = progress;
        }
        record.watched_at = Utc::now();
        Some(record.clone())
    }

    /// All records for a user, most recently watched first.
    pub async fn history_for_user(&self, user_id: Uuid) -> Vec<WatchHistory> {
        let history = self.watch_history.read().await;
        let mut result: Vec<WatchHistory> = history
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
        result
    }

    pub async fn watch_record(&self, user_id: Uuid, movie_id: u32) -> Option<WatchHistory> {
        let history = self.watch_history.read().await;
        history
            .iter()
            .find(|w| w.user_id == user_id && w.movie_id == movie_id)
            .cloned()
    }

    pub async fn delete_watch(&self, user_id: Uuid, movie_id: u32) -> bool {
        let mut history = self.watch_history.write().await;
        let before = history.len();
        history.retain(|w| !(w.user_id == user_id && w.movie_id == movie_id));
        history.len() < before
    }

    pub async fn clear_history(&self, user_id: Uuid) -> usize {
        let mut history = self.watch_history.write().await;
        let before = history.len();
        history.retain(|w| w.user_id != user_id);
        before - history.len()
    }
}
