//! Query-string DTOs; JSON bodies reuse the service request types.

use serde::{Deserialize, Serialize};

use verrou_service::catalog::AssetFilter;

/// Query of the owner's asset list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetListQuery {
    #[serde(default)]
    pub filter: AssetFilter,
    pub search_key: Option<String>,
}

/// Query of the log cleanup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupQuery {
    /// Entries older than this many days are removed.
    #[serde(default = "default_retention_days")]
    pub days: i64,
}

fn default_retention_days() -> i64 {
    90
}

/// Query parameter for WebSocket authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_defaults_to_ninety_days() {
        let query: CleanupQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.days, 90);
    }

    #[test]
    fn asset_filter_defaults_to_all() {
        let query: AssetListQuery = serde_json::from_str(r#"{"search_key":"velo"}"#).unwrap();
        assert_eq!(query.filter, AssetFilter::All);
    }
}
