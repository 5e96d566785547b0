//! Category management shared by the asset catalog and the blog.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::CategoryRepository;
use verrou_entity::category::Category;
use verrou_storage::{UploadPolicy, UploadedFile, Uploader};

use super::events::CatalogEvents;
use crate::context::RequestContext;
use crate::slug::unique_slug;

/// Handles category CRUD and the `categoryUpdated` broadcast.
#[derive(Debug, Clone)]
pub struct CategoryService {
    category_repo: Arc<CategoryRepository>,
    uploader: Arc<Uploader>,
    events: Arc<CatalogEvents>,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<CategoryRepository>,
        uploader: Arc<Uploader>,
        events: Arc<CatalogEvents>,
    ) -> Self {
        Self {
            category_repo,
            uploader,
            events,
        }
    }

    pub async fn list(&self, query: &PageQuery) -> Result<Page<Category>, AppError> {
        self.category_repo.list(query).await
    }

    /// Every category, ordered by name.
    pub async fn all(&self) -> Result<Vec<Category>, AppError> {
        self.category_repo.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.category_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Category not found"))
    }

    /// Creates a category. The image is mandatory.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        image: Option<UploadedFile>,
    ) -> Result<Category, AppError> {
        let name = require_name(name)?;
        if self.category_repo.name_taken(name, None).await? {
            return Err(AppError::bad_request("Category already exists"));
        }
        let image = image.ok_or_else(|| AppError::validation("Image is required"))?;
        let slug = self.slug_for(name, None).await?;

        let path = self.uploader.store(&UploadPolicy::category(), &image).await?;
        let category = match self.category_repo.create(name, &slug, &path).await {
            Ok(category) => category,
            Err(e) => {
                self.uploader.delete_all(std::slice::from_ref(&path)).await;
                return Err(e);
            }
        };

        info!(user_id = %ctx.user_id, category_id = %category.id, slug = %slug, "Category created");
        self.events
            .category_changed("created", serde_json::to_value(&category)?);
        Ok(category)
    }

    /// Renames a category and optionally replaces its image.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        name: Option<&str>,
        image: Option<UploadedFile>,
    ) -> Result<Category, AppError> {
        let existing = self.get(id).await?;

        let name = match name {
            Some(name) => require_name(name)?.to_string(),
            None => existing.name.clone(),
        };
        if self.category_repo.name_taken(&name, Some(id)).await? {
            return Err(AppError::bad_request("Category already exists"));
        }
        let slug = self.slug_for(&name, Some(id)).await?;

        let new_image = match &image {
            Some(file) => Some(self.uploader.store(&UploadPolicy::category(), file).await?),
            None => None,
        };

        let category = match self
            .category_repo
            .update(id, &name, &slug, new_image.as_deref())
            .await
        {
            Ok(category) => category,
            Err(e) => {
                self.uploader.delete_all(new_image.as_slice()).await;
                return Err(e);
            }
        };

        if new_image.is_some() {
            self.uploader.delete_all(existing.image.as_slice()).await;
        }

        info!(user_id = %ctx.user_id, category_id = %id, "Category updated");
        self.events
            .category_changed("updated", serde_json::to_value(&category)?);
        Ok(category)
    }

    /// Deletes an unused category and its image.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let existing = self.get(id).await?;

        let (posts, assets) = self.category_repo.usage(id).await?;
        if posts > 0 || assets > 0 {
            return Err(AppError::bad_request(format!(
                "Category is still used by {posts} post(s) and {assets} asset(s)"
            )));
        }

        if !self.category_repo.delete(id).await? {
            return Err(AppError::not_found("Category not found"));
        }
        self.uploader.delete_all(existing.image.as_slice()).await;

        info!(user_id = %ctx.user_id, category_id = %id, "Category deleted");
        self.events
            .category_changed("deleted", serde_json::json!({ "id": id }));
        Ok(())
    }

    async fn slug_for(&self, name: &str, exclude: Option<Uuid>) -> Result<String, AppError> {
        let repo = &self.category_repo;
        unique_slug(name, |candidate| async move {
            repo.slug_exists(&candidate, exclude).await
        })
        .await
    }
}

fn require_name(name: &str) -> Result<&str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    if name.chars().count() > 100 {
        return Err(AppError::validation("Name must be at most 100 characters"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(require_name("  Vélos ").unwrap(), "Vélos");
        assert!(require_name("   ").is_err());
        assert!(require_name(&"x".repeat(101)).is_err());
    }
}
