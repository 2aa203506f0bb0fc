//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, the click pipeline, and the Axum server lifecycle.

use crate::application::services::{ClickIngestor, LinkService};
use crate::config::Config;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Connected to database"
    );

    Ok(pool)
}

/// Applies the embedded migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Migrations applied");
    Ok(())
}

/// Runs the HTTP server with the given configuration.
///
/// Startup order:
/// 1. PostgreSQL pool and migrations
/// 2. Repositories and [`LinkService`]
/// 3. Click queue and workers via [`ClickIngestor::start`]
/// 4. Axum HTTP server
///
/// On Ctrl-C or SIGTERM the listener stops accepting connections first; the
/// click workers then get `SHUTDOWN_GRACE_SECONDS` to flush the queue.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect(&config).await?;
    migrate(&pool).await?;

    let pool = Arc::new(pool);
    let link_repository: Arc<dyn LinkRepository> = Arc::new(PgLinkRepository::new(pool.clone()));
    let click_repository: Arc<dyn ClickRepository> =
        Arc::new(PgClickRepository::new(pool.clone()));

    let link_service = Arc::new(LinkService::new(
        link_repository,
        Arc::new(RandomCodeGenerator),
        config.allocator(),
    ));

    let ingest = config.ingest();
    let cancel = CancellationToken::new();
    let (click_ingestor, workers) = ClickIngestor::start(ingest, click_repository, cancel);

    let state = AppState::new(link_service, click_ingestor, config.base_url.clone());
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown())
    .await
    .context("Server error")?;

    tracing::info!("HTTP server stopped, flushing click queue");

    let report = workers.shutdown(ingest.shutdown_grace).await;
    if report.aborted > 0 || report.failed > 0 {
        tracing::warn!(
            aborted = report.aborted,
            failed = report.failed,
            "Click queue not fully flushed"
        );
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Waits for Ctrl-C or SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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

    tracing::info!("Shutdown signal received");
}
