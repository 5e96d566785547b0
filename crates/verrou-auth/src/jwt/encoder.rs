//! Access token creation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verrou_core::config::AuthConfig;
use verrou_core::error::AppError;
use verrou_entity::role::RoleName;

use super::claims::Claims;

/// Signs HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").field("ttl", &self.ttl).finish()
    }
}

/// A signed token and its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub expired_token_at: DateTime<Utc>,
}

impl JwtEncoder {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::hours(config.jwt_ttl_hours as i64),
        }
    }

    /// Issue an access token for the given identity.
    pub fn issue(
        &self,
        user_id: Uuid,
        role: RoleName,
        email: &str,
        pseudo: &str,
    ) -> Result<IssuedToken, AppError> {
        self.issue_at(Utc::now(), user_id, role, email, pseudo)
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        now: DateTime<Utc>,
        user_id: Uuid,
        role: RoleName,
        email: &str,
        pseudo: &str,
    ) -> Result<IssuedToken, AppError> {
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            pseudo: pseudo.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken {
            access_token,
            expired_token_at: exp,
        })
    }
}
