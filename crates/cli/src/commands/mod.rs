//! CLI command implementations.

pub mod migrate;
pub mod user;

use recipe_box_web::config::AppConfig;
use recipe_box_web::db;
use sqlx::PgPool;

/// Load configuration and open a small pool for a one-off command.
async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url, 2).await?;
    Ok(pool)
}
