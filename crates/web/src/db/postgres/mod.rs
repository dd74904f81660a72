//! `PostgreSQL` implementation of [`Repository`].
//!
//! Each call is a short sequence of single statements with no transaction, and
//! the whole call is bounded by [`QUERY_TIMEOUT`].

mod rows;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use recipe_box_core::{Email, RecipeId, UserId};

use self::rows::{AuthorRow, DirectionRow, IngredientRow, RecipeRow, UserRow};
use super::{Repository, RepositoryError};
use crate::models::{Recipe, RecipeAuthor, RecipePayload, User};
use crate::password::{self, PasswordError};

/// Upper bound for one repository call, independent of the caller.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

const SELECT_RECIPES: &str = r"
    SELECT id, title, image, user_id,
           to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
           to_char(updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
    FROM recipes
    ORDER BY id
";

const SELECT_RECIPE: &str = r"
    SELECT id, title, image, user_id,
           to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
           to_char(updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
    FROM recipes
    WHERE id = $1
";

const SELECT_USER_BY_EMAIL: &str = r"
    SELECT id, name, email, password, image,
           to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
           to_char(updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
    FROM users
    WHERE email = $1
";

const SELECT_USER_BY_ID: &str = r"
    SELECT id, name, email, password, image,
           to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') AS created_at,
           to_char(updated_at, 'YYYY-MM-DD HH24:MI:SS') AS updated_at
    FROM users
    WHERE id = $1
";

/// Repository backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Run a repository call under [`QUERY_TIMEOUT`].
async fn with_timeout<T, F>(operation: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, operation)
        .await
        .map_err(|_| RepositoryError::Timeout)?
}

/// Map constraint violations on INSERT/UPDATE to domain errors.
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict("email already exists".to_owned());
        }
        // The referenced user or recipe is gone
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

#[async_trait]
impl Repository for PgRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        with_timeout(async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_all_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        with_timeout(async {
            let rows = sqlx::query_as::<_, RecipeRow>(SELECT_RECIPES)
                .fetch_all(&self.pool)
                .await?;

            let mut recipes = Vec::with_capacity(rows.len());
            for row in rows {
                let mut recipe = Recipe::try_from(row)?;
                recipe.user.name =
                    sqlx::query_scalar::<_, String>("SELECT name FROM users WHERE id = $1")
                        .bind(recipe.user_id)
                        .fetch_one(&self.pool)
                        .await?;
                recipes.push(recipe);
            }

            Ok::<_, RepositoryError>(recipes)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn get_recipe_details(&self, id: RecipeId) -> Result<Recipe, RepositoryError> {
        with_timeout(async {
            let row = sqlx::query_as::<_, RecipeRow>(SELECT_RECIPE)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;
            let mut recipe = Recipe::try_from(row)?;

            let author =
                sqlx::query_as::<_, AuthorRow>("SELECT id, name, email FROM users WHERE id = $1")
                    .bind(recipe.user_id)
                    .fetch_one(&self.pool)
                    .await?;
            recipe.user = RecipeAuthor::try_from(author)?;

            recipe.ingredients = sqlx::query_as::<_, IngredientRow>(
                "SELECT id, name, amount, unit, recipe_id FROM ingredients WHERE recipe_id = $1 ORDER BY id",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

            recipe.directions = sqlx::query_as::<_, DirectionRow>(
                "SELECT id, direction, recipe_id FROM directions WHERE recipe_id = $1 ORDER BY id",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

            Ok::<_, RepositoryError>(recipe)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn insert_recipe(
        &self,
        title: &str,
        user_id: UserId,
    ) -> Result<RecipeId, RepositoryError> {
        with_timeout(async {
            let now = Utc::now().naive_utc();
            sqlx::query_scalar::<_, RecipeId>(
                r"
                INSERT INTO recipes (title, image, user_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                RETURNING id
                ",
            )
            .bind(title)
            .bind(Vec::<u8>::new())
            .bind(user_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn insert_ingredient(
        &self,
        name: &str,
        amount: &str,
        unit: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        with_timeout(async {
            let now = Utc::now().naive_utc();
            sqlx::query(
                r"
                INSERT INTO ingredients (name, amount, unit, recipe_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                ",
            )
            .bind(name)
            .bind(amount)
            .bind(unit)
            .bind(recipe_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn insert_direction(
        &self,
        direction: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        with_timeout(async {
            let now = Utc::now().naive_utc();
            sqlx::query(
                r"
                INSERT INTO directions (direction, recipe_id, created_at, updated_at)
                VALUES ($1, $2, $3, $3)
                ",
            )
            .bind(direction)
            .bind(recipe_id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    #[instrument(skip(self, payload), fields(recipe_id = %payload.id))]
    async fn update_recipe(&self, payload: &RecipePayload) -> Result<(), RepositoryError> {
        with_timeout(async {
            let now = Utc::now().naive_utc();
            let result = sqlx::query("UPDATE recipes SET title = $1, updated_at = $2 WHERE id = $3")
                .bind(&payload.title)
                .bind(now)
                .bind(payload.id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }

            sqlx::query("DELETE FROM ingredients WHERE recipe_id = $1")
                .bind(payload.id)
                .execute(&self.pool)
                .await?;
            sqlx::query("DELETE FROM directions WHERE recipe_id = $1")
                .bind(payload.id)
                .execute(&self.pool)
                .await?;

            Ok::<_, RepositoryError>(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), RepositoryError> {
        with_timeout(async {
            sqlx::query("DELETE FROM recipes WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok::<_, RepositoryError>(())
        })
        .await
    }

    #[instrument(skip(self, password))]
    async fn get_user_by_email(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<User, RepositoryError> {
        with_timeout(async {
            let row = sqlx::query_as::<_, UserRow>(SELECT_USER_BY_EMAIL)
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;
            let user = User::try_from(row)?;

            password::verify_password(password, &user.password_hash).map_err(|e| match e {
                PasswordError::Mismatch => RepositoryError::InvalidPassword,
                other => RepositoryError::DataCorruption(other.to_string()),
            })?;

            Ok::<_, RepositoryError>(user)
        })
        .await
    }

    #[instrument(skip(self, password_hash))]
    async fn insert_user(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        with_timeout(async {
            let now = Utc::now().naive_utc();
            let id = sqlx::query_scalar::<_, UserId>(
                r"
                INSERT INTO users (name, email, password, image, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                RETURNING id
                ",
            )
            .bind(name)
            .bind(email.as_str())
            .bind(password_hash)
            .bind(Vec::<u8>::new())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

            let row = sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

            User::try_from(row)
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_gives_up_on_a_stalled_call() {
        let result = with_timeout(std::future::pending::<Result<(), RepositoryError>>()).await;
        assert!(matches!(result, Err(RepositoryError::Timeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_allows_calls_just_under_the_limit() {
        let result = with_timeout(async {
            tokio::time::sleep(QUERY_TIMEOUT - Duration::from_millis(1)).await;
            Ok::<_, RepositoryError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_with_timeout_passes_errors_through() {
        let result = with_timeout(async { Err::<(), _>(RepositoryError::NotFound) }).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
