//! Alert motif and the asset status it implies.

use serde::{Deserialize, Serialize};

use crate::asset::AssetStatus;

/// Why an owner raised an alert.
///
/// Motifs arrive as free text; unknown values are kept and put the asset
/// back to [`AssetStatus::Available`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motif {
    /// `vol`: the asset was stolen.
    Vol,
    /// `perte`: the asset was lost.
    Perte,
    /// `trouve`: the asset was found again.
    Trouve,
    /// Anything else.
    Other(String),
}

impl Motif {
    /// Parse the motif sent by clients.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "vol" => Self::Vol,
            "perte" => Self::Perte,
            "trouve" | "trouvé" => Self::Trouve,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Status the asset takes once the alert is recorded.
    pub fn asset_status(&self) -> AssetStatus {
        match self {
            Self::Vol => AssetStatus::Theft,
            Self::Perte => AssetStatus::Lost,
            Self::Trouve => AssetStatus::Retrouve,
            Self::Other(_) => AssetStatus::Available,
        }
    }

    /// An alert is resolved from the start when it reports a find.
    pub fn resolves_alert(&self) -> bool {
        matches!(self, Self::Trouve)
    }

    /// Stored form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vol => "vol",
            Self::Perte => "perte",
            Self::Trouve => "trouve",
            Self::Other(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motif_maps_to_asset_status() {
        assert_eq!(Motif::parse("vol").asset_status(), AssetStatus::Theft);
        assert_eq!(Motif::parse("Perte").asset_status(), AssetStatus::Lost);
        assert_eq!(Motif::parse("trouve").asset_status(), AssetStatus::Retrouve);
        assert_eq!(Motif::parse("autre").asset_status(), AssetStatus::Available);
    }

    #[test]
    fn only_found_reports_resolve() {
        assert!(Motif::parse("trouve").resolves_alert());
        assert!(!Motif::parse("vol").resolves_alert());
        assert!(!Motif::parse("").resolves_alert());
    }

    #[test]
    fn unknown_motif_keeps_text() {
        assert_eq!(Motif::parse(" casse ").as_str(), "casse");
    }
}
