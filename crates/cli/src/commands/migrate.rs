//! Database migration command.
//!
//! Applies `crates/web/migrations/` and then creates the session store table.

use recipe_box_web::db;

/// Run all migrations against `RECIPES_DATABASE_URL`.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
