//! User self-service operations: profile viewing, edits, password and picture.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use verrou_auth::password::{PasswordHasher, PasswordValidator};
use verrou_core::error::AppError;
use verrou_database::repositories::UserRepository;
use verrou_entity::user::{UpdateUser, User, UserWithRole};
use verrou_storage::{UploadPolicy, UploadedFile, Uploader};

use crate::context::RequestContext;

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct ProfileService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password validator.
    validator: Arc<PasswordValidator>,
    /// Upload storage.
    uploader: Arc<Uploader>,
}

/// Data for updating a user's own profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    pub new_password: String,
}

impl ProfileService {
    /// Creates a new profile service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        uploader: Arc<Uploader>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            validator,
            uploader,
        }
    }

    /// Gets the current user with their role.
    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<UserWithRole, AppError> {
        self.user_repo
            .find_with_role(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the current user's profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> Result<UserWithRole, AppError> {
        let email = req.email.map(|e| e.trim().to_lowercase());
        if let Some(email) = &email {
            if self.user_repo.email_taken(email, Some(ctx.user_id)).await? {
                return Err(AppError::bad_request("Email already used"));
            }
        }

        let changes = UpdateUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email,
            phone: req.phone,
            ..UpdateUser::default()
        };
        self.user_repo
            .update(ctx.user_id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %ctx.user_id, "Profile updated");
        self.get_profile(ctx).await
    }

    /// Changes the current user's password.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        req: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = self.current_user(ctx).await?;

        if !self
            .hasher
            .verify_password(&req.old_password, &user.password_hash)?
        {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        self.validator.validate(&req.new_password)?;
        self.validator
            .validate_not_same(&req.old_password, &req.new_password)?;

        let new_hash = self.hasher.hash_password(&req.new_password)?;
        self.user_repo.update_password(ctx.user_id, &new_hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }

    /// Replaces the profile picture; the previous file is removed.
    pub async fn upload_picture(
        &self,
        ctx: &RequestContext,
        file: UploadedFile,
    ) -> Result<User, AppError> {
        let previous = self.current_user(ctx).await?.picture;

        let path = self.uploader.store(&UploadPolicy::profile(), &file).await?;
        let user = match self.user_repo.set_picture(ctx.user_id, &path).await {
            Ok(user) => user,
            Err(e) => {
                self.uploader.delete_all(std::slice::from_ref(&path)).await;
                return Err(e);
            }
        };

        if let Some(old) = previous {
            self.uploader.delete_all(std::slice::from_ref(&old)).await;
        }

        info!(user_id = %ctx.user_id, path = %path, "Profile picture updated");
        Ok(user)
    }

    async fn current_user(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
