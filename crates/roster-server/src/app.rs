//! Application runner.

use crate::{di::build_module, startup};
use roster_config::AppConfig;
use roster_core::{RosterError, RosterResult};
use roster_repository::{DatabaseHealthCheck, DatabasePool, DatabasePoolInterface};
use roster_rest::{create_router, AppState};
use shaku::HasComponent;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Connects to the database, serves HTTP until a shutdown signal, then
/// closes the pool.
pub async fn run(config: AppConfig) -> RosterResult<()> {
    startup::print_banner();

    let db_pool = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let module = build_module(db_pool, &config.security);
    let pool: Arc<dyn DatabasePoolInterface> = module.resolve();

    let app_state = AppState::from_module(module.as_ref())
        .with_health_check(Arc::new(DatabaseHealthCheck::new(Arc::clone(&pool))));
    let router = create_router(app_state, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RosterError::Internal(format!("Failed to bind {addr}: {e}")))?;

    startup::print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RosterError::Internal(format!("REST server error: {e}")));

    pool.close().await;

    served?;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
