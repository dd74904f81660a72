//! Row types returned by the recipe queries.
//!
//! Timestamps come back as text rendered by `to_char(col, 'YYYY-MM-DD HH24:MI:SS')`
//! and are parsed here. A value that does not match [`TIMESTAMP_FORMAT`] fails
//! the whole conversion.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::FromRow;

use recipe_box_core::{DirectionId, Email, IngredientId, RecipeId, UserId};

use crate::db::RepositoryError;
use crate::models::{Direction, Ingredient, Recipe, RecipeAuthor, User};

/// chrono layout matching the `to_char` pattern used in every SELECT.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `to_char` timestamp as UTC.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the text does not match.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid timestamp {value:?}: {e}")))
}

fn parse_email(value: &str) -> Result<Email, RepositoryError> {
    Email::parse(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: RecipeId,
    pub title: String,
    pub image: Vec<u8>,
    pub user_id: UserId,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = RepositoryError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            image: row.image,
            user_id: row.user_id,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            ingredients: Vec::new(),
            directions: Vec::new(),
            user: RecipeAuthor {
                id: row.user_id,
                ..RecipeAuthor::default()
            },
        })
    }
}

#[derive(Debug, FromRow)]
pub struct AuthorRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl TryFrom<AuthorRow> for RecipeAuthor {
    type Error = RepositoryError;

    fn try_from(row: AuthorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: Some(parse_email(&row.email)?),
        })
    }
}

#[derive(FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: Vec<u8>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            email: parse_email(&row.email)?,
            password_hash: row.password,
            image: row.image,
            roles: Vec::new(),
            recipes: Vec::new(),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct IngredientRow {
    pub id: IngredientId,
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub recipe_id: RecipeId,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            amount: row.amount,
            unit: row.unit,
            recipe_id: row.recipe_id,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct DirectionRow {
    pub id: DirectionId,
    pub direction: String,
    pub recipe_id: RecipeId,
}

impl From<DirectionRow> for Direction {
    fn from(row: DirectionRow) -> Self {
        Self {
            id: row.id,
            direction: row.direction,
            recipe_id: row.recipe_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-03-09 17:05:42").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month(), 3);
        assert_eq!(ts.day(), 9);
        assert_eq!(ts.hour(), 17);
        assert_eq!(ts.second(), 42);
    }

    #[test]
    fn test_parse_timestamp_rejects_other_layouts() {
        for value in ["2024-03-09T17:05:42", "2024-03-09", "", "09/03/2024 17:05:42"] {
            assert!(
                matches!(parse_timestamp(value), Err(RepositoryError::DataCorruption(_))),
                "{value:?} should not parse"
            );
        }
    }

    #[test]
    fn test_bad_timestamp_fails_recipe_conversion() {
        let row = RecipeRow {
            id: RecipeId::new(1),
            title: "Soup".to_owned(),
            image: Vec::new(),
            user_id: UserId::new(2),
            created_at: "2024-03-09 17:05:42".to_owned(),
            updated_at: "yesterday".to_owned(),
        };
        assert!(Recipe::try_from(row).is_err());
    }

    #[test]
    fn test_recipe_conversion_keeps_owner_id() {
        let row = RecipeRow {
            id: RecipeId::new(1),
            title: "Soup".to_owned(),
            image: Vec::new(),
            user_id: UserId::new(2),
            created_at: "2024-03-09 17:05:42".to_owned(),
            updated_at: "2024-03-10 08:00:00".to_owned(),
        };
        let recipe = Recipe::try_from(row).unwrap();
        assert_eq!(recipe.user.id, UserId::new(2));
        assert!(recipe.ingredients.is_empty());
    }
}
