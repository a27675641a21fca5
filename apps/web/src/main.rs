//! # Bazaar Web Server
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WebConfig::load()  (BAZAAR_* env vars)                                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  mkdir db/, uploads/ ──► Database::new (migrations) ──► router()       │
//! │                                                           │             │
//! │                                                           ▼             │
//! │                                   axum::serve on 0.0.0.0:5000           │
//! │                                   until Ctrl+C / SIGTERM                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use bazaar_db::migrations::migration_status;
use bazaar_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bazaar_web::config::WebConfig;
use bazaar_web::storage::UploadStore;
use bazaar_web::{router, AppState};

const DEFAULT_LOG_FILTER: &str = "bazaar_web=info,bazaar_db=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Bazaar web server...");

    let config = WebConfig::load().context("loading configuration")?;
    info!(
        bind = %config.bind_address(),
        database = %config.database_path.display(),
        uploads = %config.uploads_dir.display(),
        "Configuration loaded"
    );

    if let Some(parent) = config.database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let uploads = UploadStore::new(&config.uploads_dir);
    uploads
        .ensure_dir()
        .await
        .with_context(|| format!("creating {}", config.uploads_dir.display()))?;

    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("opening database")?;
    anyhow::ensure!(db.health_check().await, "database did not answer a test query");
    let (total, applied) = migration_status(db.pool()).await?;
    info!(total, applied, "Database ready");

    let state = AppState::new(db.clone(), uploads).with_max_body_bytes(config.max_body_bytes);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("binding {}", config.bind_address()))?;
    info!(addr = %config.bind_address(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
