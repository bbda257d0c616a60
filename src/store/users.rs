//! User table operations.

use chrono::Utc;
use uuid::Uuid;

use super::models::User;
use super::Store;

impl Store {
    /// Inserts a user draft, assigning its id.
    pub async fn create_user(&self, mut user: User) -> User {
        user.id = Self::next_id();
        let mut users = self.users.write().await;
        users.push(user.clone());
        user
    }

    pub async fn find_user(&self, id: Uuid) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn find_user_by_phone(&self, phone: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.phone.as_deref() == Some(phone)).cloned()
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.email.as_deref() == Some(email)).cloned()
    }

    pub async fn find_user_by_qq_id(&self, qq_id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.qq_id.as_deref() == Some(qq_id)).cloned()
    }

    /// Applies `f` to the user under the write lock, refreshing `updated_at`.
    /// Returns the updated record, or None when the id is unknown.
    pub async fn update_user<F>(&self, id: Uuid, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        let user = users.iter_mut().find(|u| u.id == id)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }

    /// Finds the user registered with `phone`, creating one when absent.
    /// The scan and insert share one write guard, so two concurrent phone
    /// logins cannot both create an account.
    pub async fn find_or_create_by_phone(&self, phone: &str) -> (User, bool) {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter().find(|u| u.phone.as_deref() == Some(phone)) {
            return (user.clone(), false);
        }
        let mut user = User::from_phone(phone.to_string());
        user.id = Self::next_id();
        users.push(user.clone());
        (user, true)
    }

    /// Finds the user linked to `qq_id`, creating one when absent.
    pub async fn find_or_create_by_qq(&self, draft: User) -> (User, bool) {
        let mut users = self.users.write().await;
        if let Some(user) = users
            .iter()
            .find(|u| u.qq_id.is_some() && u.qq_id == draft.qq_id)
        {
            return (user.clone(), false);
        }
        let mut user = draft;
        user.id = Self::next_id();
        users.push(user.clone());
        (user, true)
    }

    /// Inserts an email user unless the address is already registered.
    pub async fn create_email_user(&self, draft: User) -> Option<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email.is_some() && u.email == draft.email)
        {
            return None;
        }
        let mut user = draft;
        user.id = Self::next_id();
        users.push(user.clone());
        Some(user)
    }
}
