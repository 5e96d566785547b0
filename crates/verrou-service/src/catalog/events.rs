//! Realtime fan-out of catalog changes.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_database::repositories::AssetRepository;
use verrou_realtime::{EventName, RealtimeHub, ServerEvent};

/// Publishes `assetUpdated` and `categoryUpdated` events.
#[derive(Debug, Clone)]
pub struct CatalogEvents {
    asset_repo: Arc<AssetRepository>,
    hub: Arc<RealtimeHub>,
}

impl CatalogEvents {
    pub fn new(asset_repo: Arc<AssetRepository>, hub: Arc<RealtimeHub>) -> Self {
        Self { asset_repo, hub }
    }

    /// Push the owner's refreshed asset list to their room.
    ///
    /// Failures are logged; the triggering request has already succeeded.
    pub async fn assets_changed(&self, owner_id: Uuid) {
        match self.owner_snapshot(owner_id).await {
            Ok(data) => {
                let delivered = self
                    .hub
                    .emit_to_user(owner_id, &ServerEvent::new(EventName::AssetUpdated, data));
                debug!(user_id = %owner_id, delivered, "assetUpdated emitted");
            }
            Err(e) => warn!(user_id = %owner_id, error = %e, "Failed to build assetUpdated payload"),
        }
    }

    /// Tell every connected client that the category list changed.
    pub fn category_changed(&self, action: &str, category: serde_json::Value) {
        let delivered = self.hub.broadcast(&ServerEvent::new(
            EventName::CategoryUpdated,
            json!({ "action": action, "category": category }),
        ));
        debug!(action, delivered, "categoryUpdated broadcast");
    }

    async fn owner_snapshot(&self, owner_id: Uuid) -> Result<serde_json::Value, AppError> {
        let assets = self.asset_repo.list_for_user(owner_id, None, None).await?;
        let counts = self.asset_repo.counts(Some(owner_id)).await?;
        Ok(json!({
            "assets": assets,
            "total": counts.total,
            "total_alerte": counts.total_alerte,
            "total_retrouve": counts.total_retrouve,
        }))
    }
}
