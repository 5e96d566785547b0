//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, token and OTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    pub jwt_secret: String,
    /// Access token TTL in hours.
    #[serde(default = "default_jwt_ttl")]
    pub jwt_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Whether the zxcvbn entropy check is applied to new passwords.
    #[serde(default)]
    pub password_require_strong: bool,
    /// Password-reset OTP lifetime in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: i64,
    /// Minimum delay between two reset emails, in seconds.
    #[serde(default = "default_otp_cooldown")]
    pub otp_resend_cooldown_seconds: i64,
    /// Window after a verified OTP during which the password may be reset.
    #[serde(default = "default_reset_window")]
    pub reset_window_minutes: i64,
}

fn default_jwt_ttl() -> u64 {
    72
}

fn default_password_min() -> usize {
    8
}

fn default_otp_ttl() -> i64 {
    10
}

fn default_otp_cooldown() -> i64 {
    90
}

fn default_reset_window() -> i64 {
    15
}
