//! Route definitions for the Verrou HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use std::path::Path;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use verrou_storage::upload::UPLOADS_DIR;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let uploads = Path::new(&state.config.storage.root).join(UPLOADS_DIR);

    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(user_routes())
        .merge(profile_routes())
        .merge(role_routes())
        .merge(category_routes())
        .merge(asset_routes())
        .merge(alerte_routes())
        .merge(signal_routes())
        .merge(post_routes())
        .merge(donation_routes())
        .merge(subscription_routes())
        .merge(notification_routes())
        .merge(dashboard_routes())
        .merge(log_routes());

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .nest_service("/uploads", ServeDir::new(uploads))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::audit::audit_log,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Health check (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Registration, login and password recovery
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route(
            "/auth/forgot-password/check-otp",
            post(handlers::auth::check_otp),
        )
        .route("/auth/reset-password", post(handlers::auth::reset_password))
}

/// Back-office user management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .patch(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
}

/// Self-service profile
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(handlers::profile::get_profile).patch(handlers::profile::update_profile),
        )
        .route(
            "/profile/password",
            patch(handlers::profile::change_password),
        )
        .route("/profile/upload", patch(handlers::profile::upload_picture))
}

fn role_routes() -> Router<AppState> {
    Router::new().route("/roles", get(handlers::role::list_roles))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route("/categories/all", get(handlers::category::all_categories))
        .route(
            "/categories/{id}",
            get(handlers::category::get_category)
                .patch(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
}

/// Asset registration, owner edits and staff verification
fn asset_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/assets",
            get(handlers::asset::list_assets).post(handlers::asset::create_asset),
        )
        .route("/assets/all/user", get(handlers::asset::list_own_assets))
        .route(
            "/assets/categories/{id}",
            get(handlers::asset::list_by_category),
        )
        .route(
            "/assets/users/categories/{id}",
            get(handlers::asset::list_own_by_category),
        )
        .route("/assets/search/{key}", get(handlers::asset::search_assets))
        .route(
            "/assets/{id}",
            get(handlers::asset::get_asset)
                .patch(handlers::asset::update_asset)
                .delete(handlers::asset::delete_asset),
        )
        .route("/assets/{id}/images", patch(handlers::asset::update_images))
        .route(
            "/assets/{id}/invoices",
            patch(handlers::asset::update_invoices),
        )
        .route("/assets/{id}/verify", patch(handlers::asset::toggle_verified))
}

fn alerte_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alertes",
            get(handlers::alerte::list_alertes).post(handlers::alerte::create_alerte),
        )
        .route(
            "/alertes/{id}",
            get(handlers::alerte::get_alerte).delete(handlers::alerte::delete_alerte),
        )
}

fn signal_routes() -> Router<AppState> {
    Router::new().route("/signals/create", post(handlers::signal::create_signal))
}

/// Mini-blog
fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/posts/stats", get(handlers::post::post_stats))
        .route("/posts/slug/{slug}", get(handlers::post::read_by_slug))
        .route(
            "/posts/category/{category_id}",
            get(handlers::post::list_by_category),
        )
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .patch(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
}

fn donation_routes() -> Router<AppState> {
    Router::new().route(
        "/donations",
        get(handlers::donation::list_donations).post(handlers::donation::create_donation),
    )
}

/// Subscription tiers and purchases
fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(handlers::subscription::list_subscriptions)
                .post(handlers::subscription::create_subscription),
        )
        .route(
            "/subscriptions/all-users-subscriptions",
            get(handlers::subscription::list_purchases),
        )
        .route(
            "/subscriptions/user-make-subscription",
            post(handlers::subscription::purchase),
        )
        .route(
            "/subscriptions/{id}/status",
            patch(handlers::subscription::toggle_status),
        )
        .route(
            "/subscriptions/{id}",
            patch(handlers::subscription::update_subscription)
                .delete(handlers::subscription::delete_subscription),
        )
}

/// Push delivery and in-app notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/push-notification/send",
            post(handlers::notification::send_push),
        )
        .route(
            "/push-notification/register-token",
            post(handlers::notification::register_token),
        )
        .route(
            "/push-notification/user/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/push-notification/user/notifications/read/all",
            post(handlers::notification::mark_all_read),
        )
        .route(
            "/push-notification/user/notifications/read/{id}",
            post(handlers::notification::mark_read),
        )
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/admin", get(handlers::dashboard::admin_overview))
        .route("/dashboard/user", get(handlers::dashboard::user_overview))
        .route("/dashboard/stats", get(handlers::dashboard::platform_stats))
}

/// Audit log (admin only)
fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(handlers::log::list_logs))
        .route("/logs/action/{action}", get(handlers::log::list_by_action))
        .route("/logs/user/{user_id}", get(handlers::log::list_by_user))
        .route("/logs/cleanup", delete(handlers::log::cleanup))
}
