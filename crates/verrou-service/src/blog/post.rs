//! Blog posts: authoring, publication and slug-based reads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::types::{Filter, FilterValue, Page, PageQuery};
use verrou_database::repositories::{CategoryRepository, PostRepository};
use verrou_entity::post::{CreatePost, Post, PostStats, PostView, UpdatePost};
use verrou_storage::{UploadPolicy, UploadedFile, Uploader};

use crate::context::RequestContext;
use crate::slug::unique_slug;

/// Parsed multipart body of a new post.
#[derive(Debug, Clone)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub published: Option<bool>,
    pub image: Option<UploadedFile>,
}

/// Parsed multipart body of a post edit; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
    pub image: Option<UploadedFile>,
}

/// Structured filters of the post list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PostFilter {
    pub category_id: Option<Uuid>,
    pub published: Option<bool>,
}

impl PostFilter {
    fn to_filter(self) -> Filter {
        Filter::new()
            .eq_opt("p.category_id", self.category_id.map(FilterValue::Uuid))
            .eq_opt("p.published", self.published.map(FilterValue::Boolean))
    }
}

#[derive(Debug, Clone)]
pub struct PostService {
    post_repo: Arc<PostRepository>,
    category_repo: Arc<CategoryRepository>,
    uploader: Arc<Uploader>,
}

impl PostService {
    pub fn new(
        post_repo: Arc<PostRepository>,
        category_repo: Arc<CategoryRepository>,
        uploader: Arc<Uploader>,
    ) -> Self {
        Self {
            post_repo,
            category_repo,
            uploader,
        }
    }

    /// Creates a post authored by the caller.
    pub async fn create(&self, ctx: &RequestContext, input: CreatePostInput) -> Result<Post, AppError> {
        let title = required("title", &input.title)?;
        let content = required("content", &input.content)?;
        self.ensure_category(input.category_id).await?;
        let slug = self.slug_for(title, None).await?;

        let image = match &input.image {
            Some(file) => Some(self.uploader.store(&UploadPolicy::post(), file).await?),
            None => None,
        };

        let created = self
            .post_repo
            .create(&CreatePost {
                title: title.to_string(),
                slug,
                content: content.to_string(),
                image: image.clone(),
                published: input.published.unwrap_or(false),
                category_id: input.category_id,
                author_id: ctx.user_id,
            })
            .await;
        let post = match created {
            Ok(post) => post,
            Err(e) => {
                self.uploader.delete_all(image.as_slice()).await;
                return Err(e);
            }
        };

        info!(user_id = %ctx.user_id, post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Posts, newest first unless another order is requested.
    pub async fn list(&self, filter: PostFilter, query: &PageQuery) -> Result<Page<PostView>, AppError> {
        self.post_repo.list(&filter.to_filter(), query).await
    }

    /// Published posts of one category.
    pub async fn list_by_category(
        &self,
        category_id: Uuid,
        query: &PageQuery,
    ) -> Result<Page<PostView>, AppError> {
        let filter = PostFilter {
            category_id: Some(category_id),
            published: Some(true),
        };
        self.list(filter, query).await
    }

    pub async fn stats(&self) -> Result<PostStats, AppError> {
        self.post_repo.stats().await
    }

    pub async fn get(&self, id: Uuid) -> Result<PostView, AppError> {
        self.post_repo
            .find_view(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Reads a published post and counts the view.
    pub async fn read_by_slug(&self, slug: &str) -> Result<PostView, AppError> {
        self.post_repo
            .read_published_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Partial update; a new title yields a new slug.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdatePostInput,
    ) -> Result<Post, AppError> {
        let existing = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        let title = match &input.title {
            Some(title) => Some(required("title", title)?.to_string()),
            None => None,
        };
        let content = match &input.content {
            Some(content) => Some(required("content", content)?.to_string()),
            None => None,
        };
        if let Some(category_id) = input.category_id.filter(|c| *c != existing.category_id) {
            self.ensure_category(category_id).await?;
        }

        let slug = match &title {
            Some(title) if *title != existing.title => Some(self.slug_for(title, Some(id)).await?),
            _ => None,
        };

        let image = match &input.image {
            Some(file) => Some(self.uploader.store(&UploadPolicy::post(), file).await?),
            None => None,
        };

        let changes = UpdatePost {
            title,
            slug,
            content,
            image: image.clone(),
            published: input.published,
            category_id: input.category_id,
        };
        let post = match self.post_repo.update(id, &changes).await {
            Ok(post) => post,
            Err(e) => {
                self.uploader.delete_all(image.as_slice()).await;
                return Err(e);
            }
        };

        if image.is_some() {
            self.uploader.delete_all(existing.image.as_slice()).await;
        }

        info!(user_id = %ctx.user_id, post_id = %id, "Post updated");
        Ok(post)
    }

    /// Deletes a post and its image.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let existing = self
            .post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if !self.post_repo.delete(id).await? {
            return Err(AppError::not_found("Post not found"));
        }
        self.uploader.delete_all(existing.image.as_slice()).await;

        info!(user_id = %ctx.user_id, post_id = %id, "Post deleted");
        Ok(())
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<(), AppError> {
        match self.category_repo.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::bad_request("Category not found")),
        }
    }

    async fn slug_for(&self, title: &str, exclude: Option<Uuid>) -> Result<String, AppError> {
        let repo = &self.post_repo;
        unique_slug(title, |candidate| async move {
            repo.slug_exists(&candidate, exclude).await
        })
        .await
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::types::FilterOp;

    #[test]
    fn empty_filter_has_no_conditions() {
        assert!(PostFilter::default().to_filter().is_empty());
    }

    #[test]
    fn filter_binds_category_and_publication() {
        let category = Uuid::new_v4();
        let filter = PostFilter {
            category_id: Some(category),
            published: Some(true),
        }
        .to_filter();
        let conditions = filter.conditions();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].column, "p.category_id");
        assert_eq!(conditions[0].op, FilterOp::Eq);
        assert_eq!(conditions[0].value, FilterValue::Uuid(category));
        assert_eq!(conditions[1].value, FilterValue::Boolean(true));
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(required("title", "  ").is_err());
        assert_eq!(required("title", " Bonjour ").unwrap(), "Bonjour");
    }
}
