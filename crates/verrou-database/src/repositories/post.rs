//! Post repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::post::{CreatePost, Post, PostStats, PostView, UpdatePost};

use crate::error::{db_err, map_sqlx_error, unique_violation};
use crate::paginate::{ListSpec, paginate};

const VIEW_FROM: &str = "posts p LEFT JOIN categories c ON c.id = p.category_id";
const VIEW_SELECT: &str =
    "p.*, jsonb_build_object('id', c.id, 'name', c.name, 'slug', c.slug) AS category";

const LIST: ListSpec = ListSpec {
    from: VIEW_FROM,
    select: VIEW_SELECT,
    search: &["p.title", "p.content"],
    sortable: &[
        ("created_at", "p.created_at"),
        ("updated_at", "p.updated_at"),
        ("title", "p.title"),
        ("views", "p.views"),
    ],
};

fn map_slug(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match unique_violation(&e).as_deref() {
        Some("posts_slug_key") => AppError::conflict("Post slug already used"),
        _ => map_sqlx_error(context, e),
    }
}

/// Repository for blog posts.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post.
    pub async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, slug, content, image, published, category_id, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.content)
        .bind(&data.image)
        .bind(data.published)
        .bind(data.category_id)
        .bind(data.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug("Failed to create post"))
    }

    /// Number of posts written by `author_id`.
    pub async fn count_by_author(&self, author_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count posts"))
    }

    /// Whether another post already uses `slug`.
    pub async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check post slug"))
    }

    /// Find a post by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find post"))
    }

    /// Find a post with its category.
    pub async fn find_view(&self, id: Uuid) -> AppResult<Option<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            "SELECT {VIEW_SELECT} FROM {VIEW_FROM} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find post"))
    }

    /// Fetch a published post by slug and count the view.
    pub async fn read_published_by_slug(&self, slug: &str) -> AppResult<Option<PostView>> {
        sqlx::query_as::<_, PostView>(&format!(
            "WITH p AS (UPDATE posts SET views = views + 1 WHERE slug = $1 AND published \
             RETURNING *) SELECT {VIEW_SELECT} FROM p LEFT JOIN categories c ON c.id = p.category_id"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to read post"))
    }

    /// Apply a partial update.
    pub async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                slug = COALESCE($3, slug), \
                content = COALESCE($4, content), \
                image = COALESCE($5, image), \
                published = COALESCE($6, published), \
                category_id = COALESCE($7, category_id), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.slug)
        .bind(&data.content)
        .bind(&data.image)
        .bind(data.published)
        .bind(data.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug("Failed to update post"))
    }

    /// Delete a post. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete post"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Paginated listing with categories.
    pub async fn list(&self, filter: &Filter, query: &PageQuery) -> AppResult<Page<PostView>> {
        paginate(&self.pool, &LIST, filter, query).await
    }

    /// Blog totals.
    pub async fn stats(&self) -> AppResult<PostStats> {
        sqlx::query_as::<_, PostStats>(
            "SELECT COUNT(*) AS total_posts, \
                COUNT(*) FILTER (WHERE published) AS published, \
                COUNT(*) FILTER (WHERE NOT published) AS drafts, \
                (SELECT COUNT(*) FROM categories) AS total_categories, \
                COALESCE(SUM(views), 0)::BIGINT AS total_views \
             FROM posts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to compute post stats"))
    }
}
