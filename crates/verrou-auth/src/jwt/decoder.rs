//! Access token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use verrou_core::config::AuthConfig;
use verrou_core::error::AppError;

use super::claims::Claims;

/// Verifies signature and expiry of access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Rejected access token");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
                    JwtErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized("Invalid token"),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use verrou_core::config::AuthConfig;
    use verrou_core::error::ErrorKind;
    use verrou_entity::role::RoleName;

    use super::*;
    use crate::jwt::JwtEncoder;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_ttl_hours: 72,
            password_min_length: 8,
            password_require_strong: false,
            otp_ttl_minutes: 10,
            otp_resend_cooldown_seconds: 90,
            reset_window_minutes: 15,
        }
    }

    #[test]
    fn issued_token_decodes_to_same_identity() {
        let cfg = config("test-secret");
        let user_id = Uuid::new_v4();
        let issued = JwtEncoder::new(&cfg)
            .issue(user_id, RoleName::Client, "ama@verrou.app", "verrou_ab12cd")
            .unwrap();

        let claims = JwtDecoder::new(&cfg).decode(&issued.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, RoleName::Client);
        assert_eq!(claims.pseudo, "verrou_ab12cd");
        assert_eq!(claims.exp - claims.iat, 72 * 3600);
        assert_eq!(claims.expires_at().timestamp(), issued.expired_token_at.timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config("test-secret");
        let issued = JwtEncoder::new(&cfg)
            .issue_at(
                Utc::now() - Duration::days(4),
                Uuid::new_v4(),
                RoleName::Admin,
                "a@b.c",
                "verrou_000000",
            )
            .unwrap();

        let err = JwtDecoder::new(&cfg).decode(&issued.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issued = JwtEncoder::new(&config("one"))
            .issue(Uuid::new_v4(), RoleName::Admin, "a@b.c", "verrou_000000")
            .unwrap();
        let err = JwtDecoder::new(&config("two")).decode(&issued.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = JwtDecoder::new(&config("s")).decode("not.a.jwt").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
