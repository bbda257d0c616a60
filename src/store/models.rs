//! Record types held by the in-memory store.
//!
//! Field names serialize in camelCase to match the wire format the
//! frontend expects. Record ids are assigned by the store on insert;
//! constructors build drafts with a nil id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Animation,
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Movie
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Animation => write!(f, "animation"),
        }
    }
}

/// How an account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Phone,
    Email,
    Qq,
}

impl std::fmt::Display for LoginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginType::Phone => write!(f, "phone"),
            LoginType::Email => write!(f, "email"),
            LoginType::Qq => write!(f, "qq"),
        }
    }
}

/// Download quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "480p")]
    Q480,
    #[serde(rename = "720p")]
    Q720,
    #[serde(rename = "1080p")]
    Q1080,
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Q720
    }
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Q480, Quality::Q720, Quality::Q1080];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Q480 => "480p",
            Quality::Q720 => "720p",
            Quality::Q1080 => "1080p",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Completed,
    Downloading,
    Failed,
}

impl Default for DownloadStatus {
    fn default() -> Self {
        DownloadStatus::Completed
    }
}

pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/150";
pub const DEFAULT_COMMENT_AVATAR: &str = "https://via.placeholder.com/40";

/// A registered account. Exactly one of `phone`, `email`, or `qq_id`
/// identifies the login method.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub nickname: String,
    pub avatar: String,
    pub login_type: LoginType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qq_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qq_nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qq_avatar: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    fn draft(login_type: LoginType, nickname: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            phone: None,
            email: None,
            password_hash: None,
            nickname,
            avatar: DEFAULT_AVATAR.to_string(),
            login_type,
            qq_id: None,
            qq_nickname: None,
            qq_avatar: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Account created through phone-code login.
    pub fn from_phone(phone: String) -> Self {
        let tail = &phone[phone.len().saturating_sub(4)..];
        let nickname = format!("user_{}", tail);
        let mut user = Self::draft(LoginType::Phone, nickname);
        user.phone = Some(phone);
        user.is_verified = true;
        user
    }

    /// Account created through email registration.
    pub fn from_email(email: String, password_hash: String, nickname: String) -> Self {
        let mut user = Self::draft(LoginType::Email, nickname);
        user.email = Some(email);
        user.password_hash = Some(password_hash);
        user.is_verified = true;
        user
    }

    /// Account created through the QQ OAuth stub.
    pub fn from_qq(qq_id: String, qq_nickname: String, qq_avatar: String) -> Self {
        let mut user = Self::draft(LoginType::Qq, qq_nickname.clone());
        user.avatar = qq_avatar.clone();
        user.qq_id = Some(qq_id);
        user.qq_nickname = Some(qq_nickname);
        user.qq_avatar = Some(qq_avatar);
        user.is_verified = true;
        user
    }
}

/// Compact user projection used in follower/following lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub avatar: String,
}

impl UserSummary {
    /// Projection for the caller's own lists (includes email).
    pub fn private(user: &User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }

    /// Projection for public follower/following lists.
    pub fn public(user: &User) -> Self {
        Self {
            id: user.id,
            nickname: user.nickname.clone(),
            email: None,
            avatar: user.avatar.clone(),
        }
    }
}

/// A favorited catalog item, denormalized from the request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub movie_rating: f64,
    pub movie_category: String,
    pub movie_year: i32,
    pub media_type: MediaType,
    pub created_at: DateTime<Utc>,
}

/// A named, ordered collection of catalog item ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub is_public: bool,
    pub movies: Vec<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn draft(user_id: Uuid, name: String, description: String, icon: String, is_public: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            user_id,
            name,
            description,
            icon,
            is_public,
            movies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a movie if not already present. Returns false on duplicate.
    pub fn add_movie(&mut self, movie_id: u32) -> bool {
        if self.movies.contains(&movie_id) {
            return false;
        }
        self.movies.push(movie_id);
        self.updated_at = Utc::now();
        true
    }

    /// Removes a movie if present. Returns false when absent.
    pub fn remove_movie(&mut self, movie_id: u32) -> bool {
        let before = self.movies.len();
        self.movies.retain(|id| *id != movie_id);
        if self.movies.len() < before {
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    pub fn has_movie(&self, movie_id: u32) -> bool {
        self.movies.contains(&movie_id)
    }
}

/// A rated comment on a catalog item, with likes and threaded replies.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub movie_id: u32,
    pub rating: u8,
    pub content: String,
    pub likes: usize,
    pub liked_by: Vec<Uuid>,
    pub replies: Vec<Reply>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A download record; one per (user, movie, quality).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub media_type: MediaType,
    pub quality: Quality,
    pub file_size: u64,
    pub status: DownloadStatus,
    pub downloaded_at: DateTime<Utc>,
}

/// Watch progress for one (user, movie) pair; re-saving overwrites.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub media_type: MediaType,
    /// Seconds watched.
    pub duration: u64,
    /// Percentage, 0-100.
    pub progress: f32,
    pub watched_at: DateTime<Utc>,
}

/// A directed follow edge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A generated recommendation; one per (user, movie), regenerable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: u32,
    pub movie_title: String,
    pub movie_poster: String,
    pub movie_category: String,
    pub media_type: MediaType,
    pub reason: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// A share event for a movie, playlist, or user profile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<Uuid>,
    pub platform: String,
    pub share_url: String,
    pub shared_at: DateTime<Utc>,
}
