//! Recipe Box - server-rendered recipe site.
//!
//! This binary serves the site on port 3400 by default.
//!
//! # Architecture
//!
//! - Axum web framework, small JSON posts from the recipe editor script
//! - Askama templates for server-side rendering
//! - `PostgreSQL` for users, recipes and sessions
//!
//! Migrations are NOT run on startup. Run them explicitly via:
//! `cargo run -p recipe-box-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use tower_sessions_sqlx_store::PostgresStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_box_web::config::AppConfig;
use recipe_box_web::db::{self, PgRepository};
use recipe_box_web::middleware::create_session_layer;
use recipe_box_web::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "recipe_box_web=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
    })?;

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to create database pool"))?;
    tracing::info!("Database pool created");

    let session_layer = create_session_layer(PostgresStore::new(pool.clone()), &config);
    let state = AppState::new(config.clone(), Arc::new(PgRepository::new(pool)));
    let app = recipe_box_web::app(state, session_layer);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("recipe box listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
