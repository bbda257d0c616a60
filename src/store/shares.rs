//! Share table operations.

use uuid::Uuid;

use super::models::Share;
use super::Store;

impl Store {
    pub async fn add_share(&self, mut share: Share) -> Share {
        share.id = Self::next_id();
        let mut shares = self.shares.write().await;
        shares.push(share.clone());
        share
    }

    /// All shares by a user, most recent first.
    pub async fn shares_for_user(&self, user_id: Uuid) -> Vec<Share> {
        let shares = self.shares.read().await;
        let mut result: Vec<Share> = shares
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.shared_at.cmp(&a.shared_at));
        result
    }
}
