//! API endpoint handlers for the CineHub backend.
//!
//! Shared response envelope and pagination types live here; one submodule
//! per resource group.

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod comments;
pub mod downloads;
pub mod favorites;
pub mod follows;
pub mod playlists;
pub mod recommendations;
pub mod shares;
pub mod watch_history;

/// Standard success envelope: `{success, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success with a message and no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

/// List envelope with pagination fields.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Vec<T>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T> ListResponse<T> {
    /// Builds a page out of the full result set.
    pub fn paginate(message: impl Into<String>, items: Vec<T>, page: &Pagination) -> Self {
        let total = items.len();
        let data: Vec<T> = items
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();
        Self {
            success: true,
            message: message.into(),
            data,
            total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}

/// `limit`/`offset` query parameters, defaulting to 20/0.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_windows_the_items() {
        let page = Pagination { limit: 2, offset: 1 };
        let response = ListResponse::paginate("ok", vec![1, 2, 3, 4], &page);

        assert_eq!(response.total, 4);
        assert_eq!(response.data, vec![2, 3]);
        assert_eq!(response.limit, 2);
        assert_eq!(response.offset, 1);
    }

    #[test]
    fn test_paginate_past_the_end() {
        let page = Pagination { limit: 20, offset: 10 };
        let response = ListResponse::paginate("ok", vec![1, 2], &page);

        assert_eq!(response.total, 2);
        assert!(response.data.is_empty());
    }
}
