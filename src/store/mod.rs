//! In-memory record stores.
//!
//! One ordered `Vec` per entity behind a `tokio::sync::RwLock`, standing in
//! for database tables. All lookups are linear scans. Uniqueness and
//! ownership checks run under the same write guard as the mutation they
//! protect, so check-then-insert sequences cannot interleave.
//!
//! Record ids are assigned here, on insert; upserts keep the existing id.

use tokio::sync::RwLock;
use uuid::Uuid;

pub mod catalog;
pub mod models;

mod comments;
mod downloads;
mod favorites;
mod follows;
mod playlists;
mod recommendations;
mod shares;
mod users;
mod watch_history;

pub use catalog::CatalogItem;

use models::{
    Comment, Download, Favorite, Follow, Playlist, Recommendation, Share, User, WatchHistory,
};

/// Outcome of a mutation that requires ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// No record with that id exists.
    NotFound,
    /// The record exists but belongs to another user.
    NotOwner,
}

/// Process-lifetime state: every table plus the immutable catalog.
pub struct Store {
    catalog: Vec<CatalogItem>,
    pub(crate) users: RwLock<Vec<User>>,
    pub(crate) favorites: RwLock<Vec<Favorite>>,
    pub(crate) playlists: RwLock<Vec<Playlist>>,
    pub(crate) comments: RwLock<Vec<Comment>>,
    pub(crate) downloads: RwLock<Vec<Download>>,
    pub(crate) watch_history: RwLock<Vec<WatchHistory>>,
    pub(crate) follows: RwLock<Vec<Follow>>,
    pub(crate) recommendations: RwLock<Vec<Recommendation>>,
    pub(crate) shares: RwLock<Vec<Share>>,
}

impl Store {
    /// Creates an empty store with the default seeded catalog.
    pub fn new() -> Self {
        Self::with_catalog(catalog::seed())
    }

    /// Creates an empty store around a specific catalog (used by tests).
    pub fn with_catalog(catalog: Vec<CatalogItem>) -> Self {
        Self {
            catalog,
            users: RwLock::new(Vec::new()),
            favorites: RwLock::new(Vec::new()),
            playlists: RwLock::new(Vec::new()),
            comments: RwLock::new(Vec::new()),
            downloads: RwLock::new(Vec::new()),
            watch_history: RwLock::new(Vec::new()),
            follows: RwLock::new(Vec::new()),
            recommendations: RwLock::new(Vec::new()),
            shares: RwLock::new(Vec::new()),
        }
    }

    /// The full catalog (movies and animations).
    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    /// Looks up one catalog item by id.
    pub fn catalog_item(&self, id: u32) -> Option<&CatalogItem> {
        self.catalog.iter().find(|m| m.id == id)
    }

    /// Fresh id for a record being inserted.
    pub(crate) fn next_id() -> Uuid {
        Uuid::new_v4()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
