//! Asset status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registered asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "asset_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetStatus {
    /// In the owner's possession.
    Available,
    /// Reported stolen.
    Theft,
    /// Reported lost.
    Lost,
    /// Reported found.
    Retrouve,
}

impl AssetStatus {
    /// Statuses counted as "alerted" (stolen or lost).
    pub const ALERTED: [AssetStatus; 2] = [Self::Theft, Self::Lost];

    /// Return the status as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Theft => "THEFT",
            Self::Lost => "LOST",
            Self::Retrouve => "RETROUVE",
        }
    }

    /// Whether the asset is currently reported stolen or lost.
    pub fn is_alerted(&self) -> bool {
        Self::ALERTED.contains(self)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
