//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::role::RoleName;

/// A registered account (asset owner or back-office staff).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Auto-generated public handle.
    pub pseudo: String,
    /// Relative path of the profile picture.
    pub picture: Option<String>,
    /// Email address, unique.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Pending password-reset code.
    #[serde(skip_serializing)]
    pub otp: Option<String>,
    /// Expiry of the pending reset code.
    #[serde(skip_serializing)]
    pub otp_expires_at: Option<DateTime<Utc>>,
    /// Deadline for `reset-password` after a verified code.
    #[serde(skip_serializing)]
    pub reset_allowed_until: Option<DateTime<Utc>>,
    /// When the email address was verified.
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Last time a reset email was sent (resend gate).
    #[serde(skip_serializing)]
    pub last_email_sent_at: Option<DateTime<Utc>>,
    /// Blocked accounts cannot log in.
    pub is_active: bool,
    /// Whether back-office verified the account.
    pub is_verified: bool,
    /// How many more assets this user may register.
    pub asset_remaining: i32,
    /// Expo push token.
    #[serde(skip_serializing)]
    pub token_notification: Option<String>,
    /// Role foreign key.
    pub role_id: Uuid,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the user may still register an asset.
    pub fn has_asset_quota(&self) -> bool {
        self.asset_remaining > 0
    }
}

/// A user row joined with its role name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserWithRole {
    /// The user row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    /// Name of the user's role.
    pub role_name: RoleName,
}

/// Public projection of a user embedded in other resources.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    /// User identifier.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Public handle.
    pub pseudo: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Profile picture path.
    pub picture: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            pseudo: user.pseudo.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Generated handle.
    pub pseudo: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role_id: Uuid,
}

/// Partial update of a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// Block or unblock the account.
    pub is_active: Option<bool>,
    /// Mark the account verified.
    pub is_verified: Option<bool>,
    /// Move the user to another role.
    pub role_id: Option<Uuid>,
}
