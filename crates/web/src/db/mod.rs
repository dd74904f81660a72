//! Recipe persistence.
//!
//! # Database: `recipe_box`
//!
//! ## Tables
//!
//! - `users` - Site accounts, unique email
//! - `recipes` - One owning user each
//! - `ingredients` - Cascade-deleted with their recipe
//! - `directions` - Cascade-deleted with their recipe, ordered by id
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p recipe-box-cli -- migrate
//! ```
//!
//! Handlers only see the [`Repository`] trait. [`PgRepository`] is the real
//! store; [`MemoryRepository`] backs the tests.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use recipe_box_core::{Email, RecipeId, UserId};

use crate::models::{Recipe, RecipePayload, User};

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The query did not finish within its time limit.
    #[error("query timed out")]
    Timeout,

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The user exists but the password did not verify.
    #[error("invalid password")]
    InvalidPassword,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Every persistence operation the handlers need.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Every recipe with its owner's name. Ingredients and directions are left empty.
    async fn get_all_recipes(&self) -> Result<Vec<Recipe>, RepositoryError>;

    /// One recipe with its owner, ingredients and directions.
    ///
    /// Returns `RepositoryError::NotFound` if the id does not exist.
    async fn get_recipe_details(&self, id: RecipeId) -> Result<Recipe, RepositoryError>;

    /// Insert a recipe with an empty image, returning its new id.
    async fn insert_recipe(&self, title: &str, user_id: UserId)
    -> Result<RecipeId, RepositoryError>;

    async fn insert_ingredient(
        &self,
        name: &str,
        amount: &str,
        unit: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError>;

    async fn insert_direction(
        &self,
        direction: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError>;

    /// Update the title and drop every ingredient and direction of the recipe.
    ///
    /// The caller reinserts the submitted children afterwards. Returns
    /// `RepositoryError::NotFound` if `payload.id` does not exist.
    async fn update_recipe(&self, payload: &RecipePayload) -> Result<(), RepositoryError>;

    /// Delete a recipe and, through the cascade, its children.
    ///
    /// Deleting a missing id is not an error.
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), RepositoryError>;

    /// Look up a user and check their password.
    ///
    /// Returns `RepositoryError::NotFound` for an unknown email and
    /// `RepositoryError::InvalidPassword` when the hash does not verify.
    async fn get_user_by_email(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<User, RepositoryError>;

    /// Insert a user and return the stored row.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Errors from running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("schema migration failed: {0}")]
    Schema(#[from] sqlx::migrate::MigrateError),

    #[error("session store migration failed: {0}")]
    SessionStore(#[from] sqlx::Error),
}

/// Apply the recipe schema and create the session table.
///
/// # Errors
///
/// Returns `MigrationError` if either step fails.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrationError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    PostgresStore::new(pool.clone()).migrate().await?;
    Ok(())
}
