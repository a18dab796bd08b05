//! Discussion post model and DTOs.

use brewlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub thread_id: DbId,
    pub user_name: String,
    pub body: String,
    /// Set by moderation; hidden posts stay in storage.
    pub is_hidden: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub user_name: String,
    pub body: String,
}
