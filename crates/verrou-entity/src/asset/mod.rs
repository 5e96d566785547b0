//! Asset domain entities.

pub mod model;
pub mod status;

pub use model::{Asset, AssetCounts, AssetView, CreateAsset};
pub use status::AssetStatus;
