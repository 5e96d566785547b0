//! User repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_core::result::AppResult;
use verrou_core::types::{Filter, Page, PageQuery};
use verrou_entity::user::{CreateUser, UpdateUser, User, UserWithRole};

use crate::error::{db_err, is_foreign_key_violation, map_sqlx_error, unique_violation};
use crate::paginate::{ListSpec, paginate};

const WITH_ROLE: &str =
    "SELECT u.*, r.name AS role_name FROM users u JOIN roles r ON r.id = u.role_id";

const LIST: ListSpec = ListSpec {
    from: "users u JOIN roles r ON r.id = u.role_id",
    select: "u.*, r.name AS role_name",
    search: &["u.first_name", "u.last_name", "u.email", "u.pseudo", "u.phone"],
    sortable: &[
        ("created_at", "u.created_at"),
        ("updated_at", "u.updated_at"),
        ("first_name", "u.first_name"),
        ("last_name", "u.last_name"),
        ("email", "u.email"),
        ("pseudo", "u.pseudo"),
    ],
};

/// Repository for accounts and their credentials.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))
    }

    /// Find a user by primary key, with the role name.
    pub async fn find_with_role(&self, id: Uuid) -> AppResult<Option<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(&format!("{WITH_ROLE} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user"))
    }

    /// Find a user by email (case-insensitive), with the role name.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<UserWithRole>> {
        sqlx::query_as::<_, UserWithRole>(&format!("{WITH_ROLE} WHERE LOWER(u.email) = LOWER($1)"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by email"))
    }

    /// Whether another account already uses `email`.
    pub async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) \
             AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to check email"))
    }

    /// Insert a new user.
    ///
    /// A duplicate email is a `BadRequest`; a duplicate pseudo is a
    /// `Conflict` so that callers can retry with another handle.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, pseudo, email, phone, password_hash, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.pseudo)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(&data.password_hash)
        .bind(data.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some("users_email_key") => AppError::bad_request("Email already used"),
            Some("users_pseudo_key") => AppError::conflict("Pseudo already used"),
            _ => map_sqlx_error("Failed to create user", e),
        })
    }

    /// Apply a partial update. Returns `None` when the user does not exist.
    pub async fn update(&self, id: Uuid, data: &UpdateUser) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                is_active = COALESCE($6, is_active), \
                is_verified = COALESCE($7, is_verified), \
                role_id = COALESCE($8, role_id), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.is_active)
        .bind(data.is_verified)
        .bind(data.role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e).as_deref() {
            Some("users_email_key") => AppError::bad_request("Email already used"),
            _ => map_sqlx_error("Failed to update user", e),
        })
    }

    /// Replace the password hash and close any reset window.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, reset_allowed_until = NULL, otp = NULL, \
             otp_expires_at = NULL, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update password"))?;
        Ok(())
    }

    /// Store a freshly issued reset code.
    pub async fn store_otp(
        &self,
        id: Uuid,
        otp: &str,
        expires_at: DateTime<Utc>,
        sent_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET otp = $2, otp_expires_at = $3, last_email_sent_at = $4, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(otp)
        .bind(expires_at)
        .bind(sent_at)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to store reset code"))?;
        Ok(())
    }

    /// Consume the reset code and open the reset window.
    pub async fn open_reset_window(&self, id: Uuid, until: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET otp = NULL, otp_expires_at = NULL, reset_allowed_until = $2, \
             email_verified_at = COALESCE(email_verified_at, NOW()), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to open reset window"))?;
        Ok(())
    }

    /// Set the profile picture path.
    pub async fn set_picture(&self, id: Uuid, picture: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET picture = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(picture)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to update picture"))
    }

    /// Set the Expo push token.
    pub async fn set_push_token(&self, id: Uuid, token: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET token_notification = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to register push token"))?;
        Ok(())
    }

    /// Delete a user. Returns whether a row was removed.
    ///
    /// Rows still referencing the user without a cascade (authored posts)
    /// turn into a `Conflict`.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::conflict("User is still referenced by authored posts")
                } else {
                    map_sqlx_error("Failed to delete user", e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Upload paths that deleting the user cascades away: files of their
    /// assets, and images of signals they made or that target their assets.
    pub async fn owned_upload_paths(&self, id: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT unnest(images || invoices) FROM assets WHERE user_id = $1 \
             UNION ALL \
             SELECT unnest(s.asset_images || s.place_images) FROM signals s \
             JOIN assets a ON a.id = s.asset_id \
             WHERE s.user_id = $1 OR a.user_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list user uploads"))
    }

    /// Paginated listing with role names.
    pub async fn list(&self, query: &PageQuery) -> AppResult<Page<UserWithRole>> {
        paginate(&self.pool, &LIST, &Filter::new(), query).await
    }
}
