//! Admin user management: creation with generated credentials, updates and deletion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use verrou_auth::password::PasswordHasher;
use verrou_core::error::AppError;
use verrou_core::text::{GENERATED_PASSWORD_LEN, generate_password};
use verrou_core::types::{Page, PageQuery};
use verrou_database::repositories::{PostRepository, RoleRepository, UserRepository};
use verrou_entity::user::{CreateUser, UpdateUser, UserWithRole};
use verrou_notify::mail::{Mailer, templates};
use verrou_storage::Uploader;

use super::insert_with_unique_pseudo;
use crate::context::RequestContext;

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Role repository.
    role_repo: Arc<RoleRepository>,
    /// Posts block deletion of their author.
    post_repo: Arc<PostRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Outbound email.
    mailer: Arc<dyn Mailer>,
    /// Upload storage (profile pictures).
    uploader: Arc<Uploader>,
}

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    /// Role assignment.
    pub role_id: Uuid,
}

/// Request to update a user (admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub is_verified: Option<bool>,
    pub role_id: Option<Uuid>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        post_repo: Arc<PostRepository>,
        hasher: Arc<PasswordHasher>,
        mailer: Arc<dyn Mailer>,
        uploader: Arc<Uploader>,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            post_repo,
            hasher,
            mailer,
            uploader,
        }
    }

    /// Lists users with their role.
    pub async fn list_users(&self, query: &PageQuery) -> Result<Page<UserWithRole>, AppError> {
        self.user_repo.list(query).await
    }

    /// Gets a single user by ID.
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserWithRole, AppError> {
        self.user_repo
            .find_with_role(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Creates a user with a random password and emails the credentials.
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        req: CreateUserRequest,
    ) -> Result<UserWithRole, AppError> {
        let email = req.email.trim().to_lowercase();
        if self.user_repo.email_taken(&email, None).await? {
            return Err(AppError::bad_request("Email already used"));
        }
        self.ensure_role_exists(req.role_id).await?;

        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = self.hasher.hash_password(&password)?;

        let user = insert_with_unique_pseudo(
            &self.user_repo,
            CreateUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                pseudo: String::new(),
                email,
                phone: req.phone,
                password_hash,
                role_id: req.role_id,
            },
        )
        .await?;

        let (subject, body) = templates::account_created(&user.first_name, &user.email, &password);
        if let Err(e) = self.mailer.send(&user.email, &subject, &body).await {
            warn!(user_id = %user.id, error = %e, "Failed to send account credentials");
        }

        info!(
            admin_id = %ctx.user_id,
            user_id = %user.id,
            "Admin created user"
        );

        self.get_user(user.id).await
    }

    /// Partially updates a user.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        req: AdminUpdateUserRequest,
    ) -> Result<UserWithRole, AppError> {
        let email = req.email.map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            if self.user_repo.email_taken(email, Some(user_id)).await? {
                return Err(AppError::bad_request("Email already used"));
            }
        }
        if let Some(role_id) = req.role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let changes = UpdateUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email,
            phone: req.phone,
            is_active: req.is_active,
            is_verified: req.is_verified,
            role_id: req.role_id,
        };
        self.user_repo
            .update(user_id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, "Admin updated user");

        self.get_user(user_id).await
    }

    /// Deletes a user with everything that cascades from the account, then
    /// removes the files those rows pointed at.
    ///
    /// Authors of posts are refused with a `Conflict`.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: Uuid) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let posts = self.post_repo.count_by_author(user_id).await?;
        if posts > 0 {
            return Err(AppError::conflict(format!(
                "User authored {posts} post(s); delete or reassign them first"
            )));
        }

        let mut files = self.user_repo.owned_upload_paths(user_id).await?;
        files.extend(user.picture);

        if !self.user_repo.delete(user_id).await? {
            return Err(AppError::not_found("User not found"));
        }
        self.uploader.delete_all(&files).await;

        info!(
            admin_id = %ctx.user_id,
            user_id = %user_id,
            files = files.len(),
            "Admin deleted user"
        );
        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: Uuid) -> Result<(), AppError> {
        match self.role_repo.find_by_id(role_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::bad_request("Role not found")),
        }
    }
}
