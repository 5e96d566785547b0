//! Repository implementations, one per table.

pub mod alerte;
pub mod asset;
pub mod category;
pub mod donation;
pub mod log;
pub mod notification;
pub mod post;
pub mod role;
pub mod signal;
pub mod stats;
pub mod subscription;
pub mod user;

pub use alerte::AlerteRepository;
pub use asset::AssetRepository;
pub use category::CategoryRepository;
pub use donation::DonationRepository;
pub use log::{LogRepository, MAX_RETENTION_DAYS};
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use role::RoleRepository;
pub use signal::SignalRepository;
pub use stats::StatsRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
