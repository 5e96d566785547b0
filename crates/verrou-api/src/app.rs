//! Application builder: wires repositories, services and state into an Axum app.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::oneshot;
use tracing::{info, warn};

use verrou_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use verrou_core::config::AppConfig;
use verrou_core::error::{AppError, ErrorKind};
use verrou_database::repositories::{
    AlerteRepository, AssetRepository, CategoryRepository, DonationRepository, LogRepository,
    NotificationRepository, PostRepository, RoleRepository, SignalRepository, StatsRepository,
    SubscriptionRepository, UserRepository,
};
use verrou_notify::{ExpoPushClient, mail};
use verrou_realtime::RealtimeHub;
use verrou_service::{
    AdminUserService, AlerteService, AssetService, AuthService, CatalogEvents, CategoryService,
    DashboardService, DonationService, LogService, NotificationService, PostService,
    ProfileService, RoleService, SignalService, SubscriptionService,
};
use verrou_storage::{LocalStorageProvider, Uploader};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Construct every repository and service on top of `db_pool`.
pub async fn build_state(config: AppConfig, db_pool: PgPool) -> Result<AppState, AppError> {
    let config = Arc::new(config);

    // ── Repositories ─────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
    let category_repo = Arc::new(CategoryRepository::new(db_pool.clone()));
    let asset_repo = Arc::new(AssetRepository::new(db_pool.clone()));
    let alerte_repo = Arc::new(AlerteRepository::new(db_pool.clone()));
    let signal_repo = Arc::new(SignalRepository::new(db_pool.clone()));
    let post_repo = Arc::new(PostRepository::new(db_pool.clone()));
    let donation_repo = Arc::new(DonationRepository::new(db_pool.clone()));
    let subscription_repo = Arc::new(SubscriptionRepository::new(db_pool.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let log_repo = Arc::new(LogRepository::new(db_pool.clone()));
    let stats_repo = Arc::new(StatsRepository::new(db_pool.clone()));

    // ── Auth ─────────────────────────────────────────────────
    let hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    // ── Storage ──────────────────────────────────────────────
    let provider = LocalStorageProvider::new(&config.storage.root).await?;
    let uploader = Arc::new(Uploader::new(
        Arc::new(provider),
        config.storage.max_upload_size_bytes,
    ));

    // ── Outbound notifications ───────────────────────────────
    let mailer = mail::from_config(&config.mail).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Mailer init failed", e)
    })?;
    let push = Arc::new(ExpoPushClient::new(&config.push).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Push client init failed", e)
    })?);

    // ── Realtime ─────────────────────────────────────────────
    let realtime = Arc::new(RealtimeHub::new());
    let events = Arc::new(CatalogEvents::new(
        Arc::clone(&asset_repo),
        Arc::clone(&realtime),
    ));

    // ── Services ─────────────────────────────────────────────
    let notification_service = Arc::new(NotificationService::new(
        Arc::clone(&notification_repo),
        Arc::clone(&user_repo),
        Arc::clone(&push),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&role_repo),
        Arc::clone(&hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&mailer),
        config.auth.clone(),
    ));
    let admin_user_service = Arc::new(AdminUserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&role_repo),
        Arc::clone(&post_repo),
        Arc::clone(&hasher),
        Arc::clone(&mailer),
        Arc::clone(&uploader),
    ));
    let profile_service = Arc::new(ProfileService::new(
        Arc::clone(&user_repo),
        Arc::clone(&hasher),
        Arc::clone(&password_validator),
        Arc::clone(&uploader),
    ));
    let role_service = Arc::new(RoleService::new(Arc::clone(&role_repo)));
    let category_service = Arc::new(CategoryService::new(
        Arc::clone(&category_repo),
        Arc::clone(&uploader),
        Arc::clone(&events),
    ));
    let asset_service = Arc::new(AssetService::new(
        Arc::clone(&asset_repo),
        Arc::clone(&user_repo),
        Arc::clone(&category_repo),
        Arc::clone(&alerte_repo),
        Arc::clone(&notification_service),
        Arc::clone(&uploader),
        Arc::clone(&events),
    ));
    let alerte_service = Arc::new(AlerteService::new(
        Arc::clone(&alerte_repo),
        Arc::clone(&asset_repo),
        Arc::clone(&events),
    ));
    let signal_service = Arc::new(SignalService::new(
        Arc::clone(&signal_repo),
        Arc::clone(&asset_repo),
        Arc::clone(&user_repo),
        Arc::clone(&notification_service),
        Arc::clone(&uploader),
    ));
    let post_service = Arc::new(PostService::new(
        Arc::clone(&post_repo),
        Arc::clone(&category_repo),
        Arc::clone(&uploader),
    ));
    let donation_service = Arc::new(DonationService::new(Arc::clone(&donation_repo)));
    let subscription_service = Arc::new(SubscriptionService::new(
        Arc::clone(&subscription_repo),
        Arc::clone(&user_repo),
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::clone(&asset_repo),
        Arc::clone(&stats_repo),
    ));
    let log_service = Arc::new(LogService::new(Arc::clone(&log_repo)));

    Ok(AppState {
        config,
        db_pool,
        realtime,
        jwt_decoder,
        auth_service,
        admin_user_service,
        profile_service,
        role_service,
        category_service,
        asset_service,
        alerte_service,
        signal_service,
        post_service,
        donation_service,
        subscription_service,
        notification_service,
        dashboard_service,
        log_service,
    })
}

/// Bind the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e))?;

    info!(address = %addr, "Verrou API listening");

    let (signaled_tx, signaled_rx) = oneshot::channel();
    let signal = async move {
        shutdown.await;
        let _ = signaled_tx.send(());
    };

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(signal)
    .into_future();

    drain_within(server, signaled_rx, grace).await
}

/// Run `server` to completion, but once `signaled` fires give open
/// connections at most `grace` to finish.
async fn drain_within<S>(
    server: S,
    signaled: oneshot::Receiver<()>,
    grace: Duration,
) -> Result<(), AppError>
where
    S: Future<Output = std::io::Result<()>>,
{
    let server_error =
        |e: std::io::Error| AppError::with_source(ErrorKind::Internal, "Server error", e);
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map_err(server_error),
        received = signaled => {
            if received.is_err() {
                return server.await.map_err(server_error);
            }
        }
    }

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(server_error),
        Err(_) => {
            warn!(
                grace_seconds = grace.as_secs(),
                "Connections still open after the grace period, closing them"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stuck_connections_are_cut_after_grace() {
        let (tx, rx) = oneshot::channel();
        tx.send(()).unwrap();
        let server = std::future::pending::<std::io::Result<()>>();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            drain_within(server, rx, Duration::from_millis(20)),
        )
        .await
        .expect("drain did not honour the grace period");

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn server_errors_surface_before_any_signal() {
        let (_tx, rx) = oneshot::channel::<()>();
        let server = async { Err(std::io::Error::other("accept failed")) };

        let err = drain_within(server, rx, Duration::from_secs(1)).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[tokio::test]
    async fn quick_drain_finishes_inside_grace() {
        let (tx, rx) = oneshot::channel();
        let server = async move {
            tx.send(()).unwrap();
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(())
        };

        assert!(drain_within(server, rx, Duration::from_secs(5)).await.is_ok());
    }
}
