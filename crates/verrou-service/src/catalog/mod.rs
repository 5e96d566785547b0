//! Lost-and-found catalog: categories, assets, alertes and signals.

pub mod alerte;
pub mod asset;
pub mod category;
pub mod events;
pub mod signal;

pub use alerte::{AlerteService, CreateAlerteRequest};
pub use asset::{
    AssetDetail, AssetFilter, AssetService, CreateAssetInput, UpdateAssetRequest, UserAssets,
};
pub use category::CategoryService;
pub use events::CatalogEvents;
pub use signal::{CreateSignalInput, SignalService};
