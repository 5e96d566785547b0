//! Audit log classification: which action on which kind of entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use verrou_core::AppError;

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_action", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    /// Map an HTTP method to the action it performs, if it mutates.
    pub fn from_method(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "POST" => Some(Self::Create),
            "PUT" | "PATCH" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Stored form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::validation(format!(
                "Invalid log action: '{s}'. Expected CREATE, UPDATE or DELETE"
            ))),
        }
    }
}

/// Kind of resource a logged request touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "log_entity", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LogEntity {
    Post,
    Category,
    User,
    Auth,
    Unknown,
}

/// Path fragments that make a request auditable, with the entity they denote.
const AUDITED_PATHS: [(&str, LogEntity); 4] = [
    ("/posts", LogEntity::Post),
    ("/categories", LogEntity::Category),
    ("/users", LogEntity::User),
    ("/auth", LogEntity::Auth),
];

impl LogEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Category => "CATEGORY",
            Self::User => "USER",
            Self::Auth => "AUTH",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Classify a request path.
    pub fn from_path(path: &str) -> Self {
        AUDITED_PATHS
            .iter()
            .find(|(fragment, _)| path.contains(fragment))
            .map(|(_, entity)| *entity)
            .unwrap_or(Self::Unknown)
    }

    /// Whether requests on `path` are recorded at all.
    pub fn is_audited_path(path: &str) -> bool {
        !path.contains("/logs") && AUDITED_PATHS.iter().any(|(fragment, _)| path.contains(fragment))
    }
}

impl fmt::Display for LogEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_map_to_actions() {
        assert_eq!(LogAction::from_method("POST"), Some(LogAction::Create));
        assert_eq!(LogAction::from_method("patch"), Some(LogAction::Update));
        assert_eq!(LogAction::from_method("PUT"), Some(LogAction::Update));
        assert_eq!(LogAction::from_method("DELETE"), Some(LogAction::Delete));
        assert_eq!(LogAction::from_method("GET"), None);
    }

    #[test]
    fn paths_map_to_entities() {
        assert_eq!(LogEntity::from_path("/api/posts/abc"), LogEntity::Post);
        assert_eq!(LogEntity::from_path("/api/categories"), LogEntity::Category);
        assert_eq!(LogEntity::from_path("/api/users/1"), LogEntity::User);
        assert_eq!(LogEntity::from_path("/api/auth/login"), LogEntity::Auth);
        assert_eq!(LogEntity::from_path("/api/assets"), LogEntity::Unknown);
    }

    #[test]
    fn log_routes_are_never_audited() {
        assert!(LogEntity::is_audited_path("/api/posts"));
        assert!(!LogEntity::is_audited_path("/api/logs/user/123"));
        assert!(!LogEntity::is_audited_path("/api/assets/123"));
    }

    #[test]
    fn action_parses_from_path_segment() {
        assert_eq!("create".parse::<LogAction>().unwrap(), LogAction::Create);
        assert!("READ".parse::<LogAction>().is_err());
    }
}
