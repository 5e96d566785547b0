//! Category repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::category::Category;

use crate::error::{db_err, map_sqlx_error, unique_violation};
use crate::paginate::{ListSpec, paginate};

const LIST: ListSpec = ListSpec {
    from: "categories",
    select: "*",
    search: &["name"],
    sortable: &[
        ("created_at", "created_at"),
        ("updated_at", "updated_at"),
        ("name", "name"),
    ],
};

fn map_unique(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match unique_violation(&e).as_deref() {
        Some("categories_name_key") => AppError::bad_request("Category name already used"),
        Some("categories_slug_key") => AppError::bad_request("Category slug already used"),
        _ => map_sqlx_error(context, e),
    }
}

/// Repository for asset and post categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a category by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find category"))
    }

    /// Whether another category already uses `name` (case-insensitive).
    pub async fn name_taken(&self, name: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE LOWER(name) = LOWER($1) \
             AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check category name"))
    }

    /// Whether another category already uses `slug`.
    pub async fn slug_exists(&self, slug: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check category slug"))
    }

    /// Insert a category.
    pub async fn create(&self, name: &str, slug: &str, image: &str) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug, image) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(slug)
        .bind(image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique("Failed to create category"))
    }

    /// Rename a category and optionally replace its image.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        slug: &str,
        image: Option<&str>,
    ) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, slug = $3, image = COALESCE($4, image), \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(image)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique("Failed to update category"))
    }

    /// Number of posts and assets still attached to the category.
    pub async fn usage(&self, id: Uuid) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM posts WHERE category_id = $1), \
                    (SELECT COUNT(*) FROM assets WHERE category_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count category usage"))
    }

    /// Delete a category. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete category"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Every category, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list categories"))
    }

    /// Paginated listing.
    pub async fn list(&self, query: &PageQuery) -> AppResult<Page<Category>> {
        paginate(&self.pool, &LIST, &Filter::new(), query).await
    }
}
