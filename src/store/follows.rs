//! Follow edge operations. Edges are directed and unique per pair.

use uuid::Uuid;

use super::models::Follow;
use super::Store;

impl Store {
    /// Inserts a follow edge unless it already exists.
    pub async fn add_follow(&self, mut follow: Follow) -> Option<Follow> {
        let mut follows = self.follows.write().await;
        if follows
            .iter()
            .any(|f| f.follower_id == follow.follower_id && f.following_id == follow.following_id)
        {
            return None;
        }
        follow.id = Self::next_id();
        follows.push(follow.clone());
        Some(follow)
    }

    pub async fn is_following(&self, follower_id: Uuid, following_id: Uuid) -> bool {
        let follows = self.follows.read().await;
        follows
            .iter()
            .any(|f| f.follower_id == follower_id && f.following_id == following_id)
    }

    pub async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> bool {
        let mut follows = self.follows.write().await;
        let before = follows.len();
        follows.retain(|f| !(f.follower_id == follower_id && f.following_id == following_id));
        follows.len() < before
    }

    /// Ids of users who follow `user_id`.
    pub async fn followers_of(&self, user_id: Uuid) -> Vec<Uuid> {
        let follows = self.follows.read().await;
        follows
            .iter()
            .filter(|f| f.following_id == user_id)
            .map(|f| f.follower_id)
            .collect()
    }

    /// Ids of users `user_id` follows.
    pub async fn following_of(&self, user_id: Uuid) -> Vec<Uuid> {
        let follows = self.follows.read().await;
        follows
            .iter()
            .filter(|f| f.follower_id == user_id)
            .map(|f| f.following_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::models::Follow;
    use super::super::Store;
    use chrono::Utc;
    use uuid::Uuid;

    fn edge(follower_id: Uuid, following_id: Uuid) -> Follow {
        Follow {
            id: Uuid::nil(),
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_edge_rejected() {
        let store = Store::with_catalog(Vec::new());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(store.add_follow(edge(a, b)).await.is_some());
        assert!(store.add_follow(edge(a, b)).await.is_none());
        // Reverse direction is a distinct edge
        assert!(store.add_follow(edge(b, a)).await.is_some());

        assert!(store.is_following(a, b).await);
        assert!(store.unfollow(a, b).await);
        assert!(!store.is_following(a, b).await);
        assert!(!store.unfollow(a, b).await);
    }
}
