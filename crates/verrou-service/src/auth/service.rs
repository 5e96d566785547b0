//! Public authentication use cases.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use verrou_auth::jwt::{IssuedToken, JwtEncoder};
use verrou_auth::otp;
use verrou_auth::password::{PasswordHasher, PasswordValidator};
use verrou_core::config::AuthConfig;
use verrou_core::error::AppError;
use verrou_database::repositories::{RoleRepository, UserRepository};
use verrou_entity::role::RoleName;
use verrou_entity::user::{CreateUser, UserWithRole};
use verrou_notify::mail::{Mailer, templates};

use crate::user::insert_with_unique_pseudo;

/// Self-registration payload. New accounts get the `client` role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    pub password: String,
}

/// Returned by a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub pseudo: String,
}

/// Credentials for login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Access token plus the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: UserWithRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckOtpRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(equal = 6, message = "The code has 6 digits"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub new_password: String,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Handles registration, login and password recovery.
#[derive(Debug, Clone)]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    role_repo: Arc<RoleRepository>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
    mailer: Arc<dyn Mailer>,
    config: AuthConfig,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        mailer: Arc<dyn Mailer>,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            hasher,
            validator,
            encoder,
            mailer,
            config,
        }
    }

    /// Creates a `client` account with a generated pseudo.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let email = req.email.trim().to_lowercase();
        if self.user_repo.email_taken(&email, None).await? {
            return Err(AppError::bad_request("Email already used"));
        }
        self.validator.validate(&req.password)?;

        let role = self
            .role_repo
            .find_by_name(RoleName::Client)
            .await?
            .ok_or_else(|| AppError::internal("Role 'client' has not been seeded"))?;

        let password_hash = self.hasher.hash_password(&req.password)?;
        let user = insert_with_unique_pseudo(
            &self.user_repo,
            CreateUser {
                first_name: req.first_name.trim().to_string(),
                last_name: req.last_name.trim().to_string(),
                pseudo: String::new(),
                email,
                phone: req.phone,
                password_hash,
                role_id: role.id,
            },
        )
        .await?;

        info!(user_id = %user.id, pseudo = %user.pseudo, "User registered");

        Ok(RegisterResponse {
            message: "Account created".to_string(),
            pseudo: user.pseudo,
        })
    }

    /// Checks credentials and issues an access token.
    ///
    /// Unknown emails and wrong passwords share one message.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let found = self
            .user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::bad_request(INVALID_CREDENTIALS))?;

        if !self
            .hasher
            .verify_password(&req.password, &found.user.password_hash)?
        {
            warn!(email = %req.email, "Login failed: wrong password");
            return Err(AppError::bad_request(INVALID_CREDENTIALS));
        }

        if !found.user.is_active {
            return Err(AppError::forbidden("Account blocked"));
        }

        let token = self.encoder.issue(
            found.user.id,
            found.role_name,
            &found.user.email,
            &found.user.pseudo,
        )?;

        info!(user_id = %found.user.id, role = %found.role_name, "User logged in");

        Ok(LoginResponse { token, user: found })
    }

    /// Emails a reset code, subject to the resend cooldown.
    pub async fn forgot_password(&self, req: ForgotPasswordRequest) -> Result<(), AppError> {
        let found = self
            .user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let user = found.user;

        let now = Utc::now();
        otp::ensure_can_resend(
            user.last_email_sent_at,
            self.config.otp_resend_cooldown_seconds,
            now,
        )?;

        let code = otp::generate_otp();
        let expires_at = otp::expiry(now, self.config.otp_ttl_minutes);
        self.user_repo
            .store_otp(user.id, &code, expires_at, now)
            .await?;

        let (subject, body) =
            templates::password_reset_otp(&user.first_name, &code, self.config.otp_ttl_minutes);
        if let Err(e) = self.mailer.send(&user.email, &subject, &body).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }

        info!(user_id = %user.id, "Password reset code issued");
        Ok(())
    }

    /// Verifies a reset code and opens the reset window.
    pub async fn check_otp(&self, req: CheckOtpRequest) -> Result<(), AppError> {
        let found = self
            .user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let user = found.user;

        let now = Utc::now();
        otp::verify(user.otp.as_deref(), user.otp_expires_at, &req.otp, now)?;

        let until = now + Duration::minutes(self.config.reset_window_minutes);
        self.user_repo.open_reset_window(user.id, until).await?;

        info!(user_id = %user.id, "Password reset code verified");
        Ok(())
    }

    /// Sets a new password inside an open reset window.
    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<(), AppError> {
        let found = self
            .user_repo
            .find_by_email(req.email.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let user = found.user;

        match user.reset_allowed_until {
            Some(until) if until > Utc::now() => {}
            _ => {
                return Err(AppError::bad_request(
                    "Verify the reset code before choosing a new password",
                ));
            }
        }

        self.validator.validate(&req.new_password)?;
        let hash = self.hasher.hash_password(&req.new_password)?;
        self.user_repo.update_password(user.id, &hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}
