//! Audit log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::{LogAction, LogEntity};

/// An immutable record of a mutating request.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Log {
    /// Unique entry identifier.
    pub id: Uuid,
    /// What was done.
    pub action: LogAction,
    /// On which kind of resource.
    pub entity: LogEntity,
    /// First UUID found in the request path.
    pub entity_id: Option<Uuid>,
    /// Authenticated caller, if any.
    pub user_id: Option<Uuid>,
    /// `{method, url}` of the request.
    pub details: Option<serde_json::Value>,
    /// Client IP (first `x-forwarded-for` hop when proxied).
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// When the request was served.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLog {
    pub action: LogAction,
    pub entity: LogEntity,
    pub entity_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Extract the first UUID appearing as a path segment.
pub fn entity_id_from_path(path: &str) -> Option<Uuid> {
    path.split('/')
        .find_map(|segment| Uuid::parse_str(segment).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_uuid_segment() {
        let id = Uuid::new_v4();
        let path = format!("/api/posts/{id}/publish");
        assert_eq!(entity_id_from_path(&path), Some(id));
        assert_eq!(entity_id_from_path("/api/posts"), None);
    }
}
