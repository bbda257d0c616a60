//! Download table operations. Records upsert by (user, movie, quality).

use uuid::Uuid;

use super::models::Download;
use super::{Denied, Store};

impl Store {
    /// Inserts or overwrites the record for (user, movie, quality).
    pub async fn save_download(&self, mut download: Download) -> Download {
        let mut downloads = self.downloads.write().await;
        if let Some(existing) = downloads.iter_mut().find(|d| {
            d.user_id == download.user_id
                && d.movie_id == download.movie_id
                && d.quality == download.quality
        }) {
            download.id = existing.id;
            *existing = download.clone();
            return download;
        }
        download.id = Self::next_id();
        downloads.push(download.clone());
        download
    }

    /// All downloads for a user, most recent first.
    pub async fn downloads_for_user(&self, user_id: Uuid) -> Vec<Download> {
        let downloads = self.downloads.read().await;
        let mut result: Vec<Download> = downloads
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.downloaded_at.cmp(&a.downloaded_at));
        result
    }

    pub async fn downloads_for_movie(&self, user_id: Uuid, movie_id: u32) -> Vec<Download> {
        let downloads = self.downloads.read().await;
        downloads
            .iter()
            .filter(|d| d.user_id == user_id && d.movie_id == movie_id)
            .cloned()
            .collect()
    }

    pub async fn delete_download(&self, id: Uuid, user_id: Uuid) -> Result<(), Denied> {
        let mut downloads = self.downloads.write().await;
        let download = downloads
            .iter()
            .find(|d| d.id == id)
            .ok_or(Denied::NotFound)?;
        if download.user_id != user_id {
            return Err(Denied::NotOwner);
        }
        downloads.retain(|d| d.id != id);
        Ok(())
    }

    pub async fn delete_movie_downloads(&self, user_id: Uuid, movie_id: u32) -> usize {
        let mut downloads = self.downloads.write().await;
        let before = downloads.len();
        downloads.retain(|d| !(d.user_id == user_id && d.movie_id == movie_id));
        before - downloads.len()
    }

    pub async fn clear_downloads(&self, user_id: Uuid) -> usize {
        let mut downloads = self.downloads.write().await;
        let before = downloads.len();
        downloads.retain(|d| d.user_id != user_id);
        before - downloads.len()
    }

    pub async fn total_download_size(&self, user_id: Uuid) -> u64 {
        let downloads = self.downloads.read().await;
        downloads
            .iter()
            .filter(|d| d.user_id == user_id)
            .map(|d| d.file_size)
            .sum()
    }
}
