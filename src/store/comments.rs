//! Comment table operations: CRUD, like toggles, threaded replies.

use uuid::Uuid;

use super::models::{Comment, Reply};
use super::{Denied, Store};

impl Store {
    pub async fn add_comment(&self, mut comment: Comment) -> Comment {
        comment.id = Self::next_id();
        let mut comments = self.comments.write().await;
        comments.push(comment.clone());
        comment
    }

    /// All comments on a movie, most recent first.
    pub async fn comments_for_movie(&self, movie_id: u32) -> Vec<Comment> {
        let comments = self.comments.read().await;
        let mut result: Vec<Comment> = comments
            .iter()
            .filter(|c| c.movie_id == movie_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    /// All comments by a user, most recent first.
    pub async fn comments_for_user(&self, user_id: Uuid) -> Vec<Comment> {
        let comments = self.comments.read().await;
        let mut result: Vec<Comment> = comments
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }

    pub async fn find_comment(&self, id: Uuid) -> Option<Comment> {
        let comments = self.comments.read().await;
        comments.iter().find(|c| c.id == id).cloned()
    }

    /// Applies `f` when the comment exists and is owned by `user_id`.
    pub async fn update_comment<F>(&self, id: Uuid, user_id: Uuid, f: F) -> Result<Comment, Denied>
    where
        F: FnOnce(&mut Comment),
    {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Denied::NotFound)?;
        if comment.user_id != user_id {
            return Err(Denied::NotOwner);
        }
        f(comment);
        comment.updated_at = chrono::Utc::now();
        Ok(comment.clone())
    }

    pub async fn delete_comment(&self, id: Uuid, user_id: Uuid) -> Result<(), Denied> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter()
            .find(|c| c.id == id)
            .ok_or(Denied::NotFound)?;
        if comment.user_id != user_id {
            return Err(Denied::NotOwner);
        }
        comments.retain(|c| c.id != id);
        Ok(())
    }

    /// Adds `user_id` to the liked-by set; repeated likes are no-ops.
    pub async fn like_comment(&self, id: Uuid, user_id: Uuid) -> Option<Comment> {
        let mut comments = self.comments.write().await;
        let comment = comments.iter_mut().find(|c| c.id == id)?;
        if !comment.liked_by.contains(&user_id) {
            comment.liked_by.push(user_id);
            comment.likes += 1;
        }
        Some(comment.clone())
    }

    /// Removes `user_id` from the liked-by set; absent likes are no-ops.
    pub async fn unlike_comment(&self, id: Uuid, user_id: Uuid) -> Option<Comment> {
        let mut comments = self.comments.write().await;
        let comment = comments.iter_mut().find(|c| c.id == id)?;
        let before = comment.liked_by.len();
        comment.liked_by.retain(|u| *u != user_id);
        if comment.liked_by.len() < before {
            comment.likes -= 1;
        }
        Some(comment.clone())
    }

    pub async fn add_reply(&self, comment_id: Uuid, mut reply: Reply) -> Option<Reply> {
        let mut comments = self.comments.write().await;
        let comment = comments.iter_mut().find(|c| c.id == comment_id)?;
        reply.id = Self::next_id();
        comment.replies.push(reply.clone());
        Some(reply)
    }

    /// Deletes a reply. Allowed for the reply author and the comment owner.
    pub async fn delete_reply(
        &self,
        comment_id: Uuid,
        reply_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), Denied> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(Denied::NotFound)?;
        let reply = comment
            .replies
            .iter()
            .find(|r| r.id == reply_id)
            .ok_or(Denied::NotFound)?;
        if reply.user_id != user_id && comment.user_id != user_id {
            return Err(Denied::NotOwner);
        }
        comment.replies.retain(|r| r.id != reply_id);
        Ok(())
    }

    /// Average rating over all comments on a movie, rounded to one decimal.
    pub async fn average_rating(&self, movie_id: u32) -> f64 {
        let comments = self.comments.read().await;
        let ratings: Vec<u8> = comments
            .iter()
            .filter(|c| c.movie_id == movie_id)
            .map(|c| c.rating)
            .collect();
        if ratings.is_empty() {
            return 0.0;
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(*r)).sum();
        let avg = f64::from(sum) / ratings.len() as f64;
        (avg * 10.0).round() / 10.0
    }

    /// Count of comments per star value, indices 0..5 for stars 1..=5.
    pub async fn rating_distribution(&self, movie_id: u32) -> [usize; 5] {
        let comments = self.comments.read().await;
        let mut distribution = [0usize; 5];
        for comment in comments.iter().filter(|c| c.movie_id == movie_id) {
            if (1..=5).contains(&comment.rating) {
                distribution[usize::from(comment.rating) - 1] += 1;
            }
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::super::models::Comment;
    use super::super::{Denied, Store};
    use chrono::Utc;
    use uuid::Uuid;

    fn draft(user_id: Uuid, movie_id: u32, rating: u8) -> Comment {
        let now = Utc::now();
        Comment {
            id: Uuid::nil(),
            user_id,
            user_name: "tester".to_string(),
            user_avatar: String::new(),
            movie_id,
            rating,
            content: "solid".to_string(),
            likes: 0,
            liked_by: Vec::new(),
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_like_is_idempotent() {
        let store = Store::with_catalog(Vec::new());
        let author = Uuid::new_v4();
        let liker = Uuid::new_v4();
        let comment = store.add_comment(draft(author, 1, 5)).await;

        let liked = store.like_comment(comment.id, liker).await.unwrap();
        assert_eq!(liked.likes, 1);
        let liked_again = store.like_comment(comment.id, liker).await.unwrap();
        assert_eq!(liked_again.likes, 1);

        let unliked = store.unlike_comment(comment.id, liker).await.unwrap();
        assert_eq!(unliked.likes, 0);
        let unliked_again = store.unlike_comment(comment.id, liker).await.unwrap();
        assert_eq!(unliked_again.likes, 0);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let store = Store::with_catalog(Vec::new());
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let comment = store.add_comment(draft(author, 1, 4)).await;

        assert_eq!(
            store.delete_comment(comment.id, stranger).await,
            Err(Denied::NotOwner)
        );
        assert!(store.delete_comment(comment.id, author).await.is_ok());
        assert_eq!(
            store.delete_comment(comment.id, author).await,
            Err(Denied::NotFound)
        );
    }

    #[tokio::test]
    async fn test_average_and_distribution() {
        let store = Store::with_catalog(Vec::new());
        store.add_comment(draft(Uuid::new_v4(), 1, 5)).await;
        store.add_comment(draft(Uuid::new_v4(), 1, 4)).await;
        store.add_comment(draft(Uuid::new_v4(), 2, 1)).await;

        assert_eq!(store.average_rating(1).await, 4.5);
        assert_eq!(store.average_rating(3).await, 0.0);
        assert_eq!(store.rating_distribution(1).await, [0, 0, 0, 1, 1]);
    }
}
