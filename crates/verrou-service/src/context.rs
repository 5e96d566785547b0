//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_entity::role::RoleName;

/// Context for the current authenticated request.
///
/// Built by the bearer extractor from the token claims and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role at the time the token was issued.
    pub role: RoleName,
    /// Email from the token claims.
    pub email: String,
    /// Public handle from the token claims.
    pub pseudo: String,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        role: RoleName,
        email: String,
        pseudo: String,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            email,
            pseudo,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user belongs to the back-office staff.
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Fails with `Forbidden` unless the caller's role is in `allowed`.
    pub fn require_role(&self, allowed: &[RoleName]) -> Result<(), AppError> {
        verrou_auth::require_role(self.role, allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verrou_core::error::ErrorKind;

    fn ctx(role: RoleName) -> RequestContext {
        RequestContext::new(
            Uuid::new_v4(),
            role,
            "jane@example.com".into(),
            "verrou_abc123".into(),
            "127.0.0.1".into(),
            None,
        )
    }

    #[test]
    fn staff_roles_pass_staff_checks() {
        assert!(ctx(RoleName::Secretary).is_staff());
        assert!(!ctx(RoleName::Client).is_staff());
        assert!(ctx(RoleName::Admin).is_admin());
    }

    #[test]
    fn require_role_rejects_outsiders() {
        let err = ctx(RoleName::Client)
            .require_role(&[RoleName::Admin, RoleName::Developer])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(ctx(RoleName::Developer)
            .require_role(&[RoleName::Admin, RoleName::Developer])
            .is_ok());
    }
}
