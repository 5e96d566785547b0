//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use verrou_auth::JwtDecoder;
use verrou_core::config::AppConfig;
use verrou_realtime::RealtimeHub;
use verrou_service::{
    AdminUserService, AlerteService, AssetService, AuthService, CategoryService, DashboardService,
    DonationService, LogService, NotificationService, PostService, ProfileService, RoleService,
    SignalService, SubscriptionService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool
    pub db_pool: PgPool,
    /// WebSocket connection registry
    pub realtime: Arc<RealtimeHub>,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer token verification
    pub jwt_decoder: Arc<JwtDecoder>,
    pub auth_service: Arc<AuthService>,

    // ── Users ────────────────────────────────────────────────
    pub admin_user_service: Arc<AdminUserService>,
    pub profile_service: Arc<ProfileService>,
    pub role_service: Arc<RoleService>,

    // ── Catalog ──────────────────────────────────────────────
    pub category_service: Arc<CategoryService>,
    pub asset_service: Arc<AssetService>,
    pub alerte_service: Arc<AlerteService>,
    pub signal_service: Arc<SignalService>,

    // ── Blog ─────────────────────────────────────────────────
    pub post_service: Arc<PostService>,

    // ── Billing ──────────────────────────────────────────────
    pub donation_service: Arc<DonationService>,
    pub subscription_service: Arc<SubscriptionService>,

    // ── Notifications & reporting ────────────────────────────
    pub notification_service: Arc<NotificationService>,
    pub dashboard_service: Arc<DashboardService>,
    /// Audit log writer, shared with the cleanup job
    pub log_service: Arc<LogService>,
}
