//! Playlist table operations.
//!
//! Every read or mutation is scoped to the owning user; a playlist id that
//! belongs to someone else behaves as if it did not exist.

use chrono::Utc;
use uuid::Uuid;

use super::models::Playlist;
use super::Store;

impl Store {
    /// Inserts a playlist unless the user already has one with that name.
    pub async fn create_playlist(&self, mut playlist: Playlist) -> Option<Playlist> {
        let mut playlists = self.playlists.write().await;
        if playlists
            .iter()
            .any(|p| p.user_id == playlist.user_id && p.name == playlist.name)
        {
            return None;
        }
        playlist.id = Self::next_id();
        playlists.push(playlist.clone());
        Some(playlist)
    }

    pub async fn playlists_for_user(&self, user_id: Uuid) -> Vec<Playlist> {
        let playlists = self.playlists.read().await;
        playlists
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn playlist_for_user(&self, id: Uuid, user_id: Uuid) -> Option<Playlist> {
        let playlists = self.playlists.read().await;
        playlists
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned()
    }

    /// Runs `f` against the owned playlist under the write lock and returns
    /// its result. None when the playlist is missing or not owned.
    pub async fn with_playlist<R, F>(&self, id: Uuid, user_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Playlist) -> R,
    {
        let mut playlists = self.playlists.write().await;
        let playlist = playlists
            .iter_mut()
            .find(|p| p.id == id && p.user_id == user_id)?;
        let result = f(playlist);
        playlist.updated_at = Utc::now();
        Some(result)
    }

    pub async fn delete_playlist(&self, id: Uuid, user_id: Uuid) -> bool {
        let mut playlists = self.playlists.write().await;
        let before = playlists.len();
        playlists.retain(|p| !(p.id == id && p.user_id == user_id));
        playlists.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::super::models::Playlist;
    use super::super::Store;
    use uuid::Uuid;

    fn draft(user_id: Uuid, name: &str) -> Playlist {
        Playlist::draft(
            user_id,
            name.to_string(),
            String::new(),
            "📁".to_string(),
            false,
        )
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_per_user() {
        let store = Store::with_catalog(Vec::new());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        assert!(store.create_playlist(draft(alice, "watchlist")).await.is_some());
        assert!(store.create_playlist(draft(alice, "watchlist")).await.is_none());
        // Same name under a different user is fine
        assert!(store.create_playlist(draft(bob, "watchlist")).await.is_some());
    }

    #[tokio::test]
    async fn test_with_playlist_requires_ownership() {
        let store = Store::with_catalog(Vec::new());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let playlist = store
            .create_playlist(draft(alice, "watchlist"))
            .await
            .expect("create should succeed");

        let added = store
            .with_playlist(playlist.id, alice, |p| p.add_movie(7))
            .await;
        assert_eq!(added, Some(true));

        let denied = store.with_playlist(playlist.id, bob, |p| p.add_movie(8)).await;
        assert!(denied.is_none());
    }
}
