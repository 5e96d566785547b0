//! # verrou-service
//!
//! Business logic service layer for Verrou. Each service orchestrates
//! repositories, upload storage, authentication, notifications and the
//! realtime hub to implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references. Role checks happen in the
//! HTTP layer; ownership checks happen here.

pub mod audit;
pub mod auth;
pub mod billing;
pub mod blog;
pub mod catalog;
pub mod context;
pub mod dashboard;
pub mod notification;
pub mod slug;
pub mod user;

pub use audit::LogService;
pub use auth::AuthService;
pub use billing::{DonationService, SubscriptionService};
pub use blog::PostService;
pub use catalog::{AlerteService, AssetService, CatalogEvents, CategoryService, SignalService};
pub use context::RequestContext;
pub use dashboard::DashboardService;
pub use notification::NotificationService;
pub use user::{AdminUserService, ProfileService, RoleService};
