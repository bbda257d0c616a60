//! Favorite table operations.

use uuid::Uuid;

use super::models::Favorite;
use super::Store;

impl Store {
    /// Inserts a favorite unless the (user, movie) pair already exists.
    pub async fn add_favorite(&self, mut favorite: Favorite) -> Option<Favorite> {
        let mut favorites = self.favorites.write().await;
        if favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.movie_id == favorite.movie_id)
        {
            return None;
        }
        favorite.id = Self::next_id();
        favorites.push(favorite.clone());
        Some(favorite)
    }

    pub async fn favorites_for_user(&self, user_id: Uuid) -> Vec<Favorite> {
        let favorites = self.favorites.read().await;
        favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn is_favorited(&self, user_id: Uuid, movie_id: u32) -> bool {
        let favorites = self.favorites.read().await;
        favorites
            .iter()
            .any(|f| f.user_id == user_id && f.movie_id == movie_id)
    }

    pub async fn favorite_count(&self, user_id: Uuid) -> usize {
        let favorites = self.favorites.read().await;
        favorites.iter().filter(|f| f.user_id == user_id).count()
    }

    /// Removes one favorite. Removing an absent pair is a no-op.
    pub async fn remove_favorite(&self, user_id: Uuid, movie_id: u32) -> bool {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| !(f.user_id == user_id && f.movie_id == movie_id));
        favorites.len() < before
    }

    pub async fn remove_favorites(&self, user_id: Uuid, movie_ids: &[u32]) -> usize {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| !(f.user_id == user_id && movie_ids.contains(&f.movie_id)));
        before - favorites.len()
    }

    pub async fn clear_favorites(&self, user_id: Uuid) -> usize {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|f| f.user_id != user_id);
        before - favorites.len()
    }
}
