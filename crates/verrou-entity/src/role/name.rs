//! Role name enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use verrou_core::AppError;

/// The roles known to the access-control layer.
///
/// `Client` is the role of self-registered asset owners; `Admin`,
/// `Secretary` and `Developer` make up the back-office staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "role_name", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Full administrator.
    Admin,
    /// Generic back-office user.
    User,
    /// Asset owner (self-registered account).
    Client,
    /// Back-office operator.
    Secretary,
    /// Technical staff.
    Developer,
}

impl RoleName {
    /// Every role, in seeding order.
    pub const ALL: [RoleName; 5] = [
        Self::Admin,
        Self::User,
        Self::Client,
        Self::Secretary,
        Self::Developer,
    ];

    /// Roles allowed on back-office read endpoints.
    pub const STAFF: [RoleName; 3] = [Self::Admin, Self::Secretary, Self::Developer];

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Client => "client",
            Self::Secretary => "secretary",
            Self::Developer => "developer",
        }
    }

    /// Default label used when seeding the `roles` table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrateur",
            Self::User => "Utilisateur",
            Self::Client => "Client",
            Self::Secretary => "Secrétaire",
            Self::Developer => "Développeur",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role belongs to the back-office staff.
    pub fn is_staff(&self) -> bool {
        Self::STAFF.contains(self)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "client" => Ok(Self::Client),
            "secretary" => Ok(Self::Secretary),
            "developer" => Ok(Self::Developer),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, user, client, secretary, developer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Admin".parse::<RoleName>().unwrap(), RoleName::Admin);
        assert_eq!(" client ".parse::<RoleName>().unwrap(), RoleName::Client);
        assert!("root".parse::<RoleName>().is_err());
    }

    #[test]
    fn staff_membership() {
        assert!(RoleName::Secretary.is_staff());
        assert!(RoleName::Developer.is_staff());
        assert!(!RoleName::Client.is_staff());
        assert!(!RoleName::User.is_staff());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&RoleName::Secretary).unwrap();
        assert_eq!(json, "\"secretary\"");
    }
}
