//! Role sets guarding the routes.

use verrou_core::error::AppError;
use verrou_entity::role::RoleName;

use crate::extractors::AuthUser;

pub const ADMIN: &[RoleName] = &[RoleName::Admin];
pub const STAFF: &[RoleName] = &RoleName::STAFF;
pub const CLIENT: &[RoleName] = &[RoleName::Client];
/// Subscription catalog management.
pub const BILLING: &[RoleName] = &[RoleName::Admin, RoleName::Developer];
/// Everyone allowed to browse subscription tiers.
pub const SUBSCRIPTION_READERS: &[RoleName] = &[
    RoleName::Admin,
    RoleName::Developer,
    RoleName::Secretary,
    RoleName::Client,
];

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    auth.require_role(ADMIN)
}

/// Checks that the authenticated user belongs to the back-office staff.
pub fn require_staff(auth: &AuthUser) -> Result<(), AppError> {
    auth.require_role(STAFF)
}

/// Checks that the authenticated user is an asset owner.
pub fn require_client(auth: &AuthUser) -> Result<(), AppError> {
    auth.require_role(CLIENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use verrou_core::error::ErrorKind;
    use verrou_service::RequestContext;

    fn auth(role: RoleName) -> AuthUser {
        AuthUser(RequestContext::new(
            Uuid::new_v4(),
            role,
            "a@b.c".into(),
            "verrou_test01".into(),
            "127.0.0.1".into(),
            None,
        ))
    }

    #[test]
    fn staff_excludes_clients() {
        assert!(require_staff(&auth(RoleName::Secretary)).is_ok());
        let err = require_staff(&auth(RoleName::Client)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn client_routes_reject_staff() {
        assert!(require_client(&auth(RoleName::Client)).is_ok());
        assert!(require_client(&auth(RoleName::Admin)).is_err());
    }

    #[test]
    fn billing_set_is_admin_and_developer() {
        assert!(auth(RoleName::Developer).require_role(BILLING).is_ok());
        assert!(auth(RoleName::Secretary).require_role(BILLING).is_err());
        assert!(auth(RoleName::Client).require_role(SUBSCRIPTION_READERS).is_ok());
    }
}
