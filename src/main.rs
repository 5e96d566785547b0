//! Verrou server: asset registry and theft alert API.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use verrou_core::config::AppConfig;
use verrou_core::error::AppError;
use verrou_database::DatabasePool;
use verrou_database::migration::run_migrations;
use verrou_worker::{CronScheduler, LogCleanupJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("VERROU_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Verrou v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?.into_pool();
    run_migrations(&db_pool).await?;

    // ── Step 2: Services and shared state ────────────────────────
    let worker_config = config.worker.clone();
    let state = verrou_api::build_state(config, db_pool.clone()).await?;

    // ── Step 3: Scheduled jobs ───────────────────────────────────
    let mut scheduler = if worker_config.enabled {
        let scheduler = CronScheduler::new().await?;
        let job = LogCleanupJob::new(state.log_service.clone(), worker_config.log_retention_days);
        scheduler
            .register_log_cleanup(&worker_config.log_cleanup_cron, job)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled jobs disabled");
        None
    };

    // ── Step 4: HTTP server until a shutdown signal ──────────────
    verrou_api::serve(state, async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections...");
    })
    .await?;

    // ── Step 5: Teardown ─────────────────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not stop cleanly");
        }
    }
    db_pool.close().await;

    tracing::info!("Verrou server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM. A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
