//! Role allow-lists.

use verrou_core::error::AppError;
use verrou_entity::role::RoleName;

/// Allow `role` only if it is one of `allowed`.
pub fn require_role(role: RoleName, allowed: &[RoleName]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Role '{role}' is not allowed to perform this action"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_listed_roles_only() {
        assert!(require_role(RoleName::Admin, &[RoleName::Admin]).is_ok());
        assert!(require_role(RoleName::Secretary, &RoleName::STAFF).is_ok());
        let err = require_role(RoleName::Client, &RoleName::STAFF).unwrap_err();
        assert_eq!(err.kind, verrou_core::error::ErrorKind::Forbidden);
    }
}
