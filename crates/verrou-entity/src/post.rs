//! Blog post entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A blog article.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Unique slug derived from the title.
    pub slug: String,
    /// Body (markdown allowed).
    pub content: String,
    /// Relative path of the cover image.
    pub image: Option<String>,
    /// Drafts are hidden from public listings.
    pub published: bool,
    /// Read counter.
    pub views: i64,
    /// Category foreign key.
    pub category_id: Uuid,
    /// Author foreign key.
    pub author_id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub image: Option<String>,
    pub published: bool,
    pub category_id: Uuid,
    pub author_id: Uuid,
}

/// Partial update of a post.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
}

/// Aggregate numbers for the blog back-office.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostStats {
    pub total_posts: i64,
    pub published: i64,
    pub drafts: i64,
    pub total_categories: i64,
    pub total_views: i64,
}

/// A post joined with its category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostView {
    /// The post row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    /// `{id, name, slug}` of the category.
    pub category: Option<serde_json::Value>,
}
