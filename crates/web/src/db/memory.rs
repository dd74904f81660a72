//! In-memory [`Repository`] used by tests and local experiments.
//!
//! Mirrors the `PostgreSQL` behavior the handlers depend on: unique emails,
//! owner and recipe references checked on insert, cascading deletes, and
//! second-precision timestamps.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::RwLock;

use recipe_box_core::{DirectionId, Email, IngredientId, RecipeId, UserId};

use super::{Repository, RepositoryError};
use crate::models::{Direction, Ingredient, Recipe, RecipeAuthor, RecipePayload, User};
use crate::password::{self, PasswordError};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    recipes: BTreeMap<RecipeId, Recipe>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    directions: BTreeMap<DirectionId, Direction>,
    last_user_id: i32,
    last_recipe_id: i32,
    last_ingredient_id: i32,
    last_direction_id: i32,
}

impl Tables {
    fn author(&self, user_id: UserId) -> Result<&User, RepositoryError> {
        self.users.get(&user_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("recipe owner {user_id} does not exist"))
        })
    }
}

/// Repository holding every table in one lock.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Current time at the precision the SQL store returns.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .recipes
            .values()
            .map(|recipe| {
                let owner = tables.author(recipe.user_id)?;
                let mut recipe = recipe.clone();
                recipe.user = RecipeAuthor {
                    id: owner.id,
                    name: owner.name.clone(),
                    email: None,
                };
                Ok(recipe)
            })
            .collect()
    }

    async fn get_recipe_details(&self, id: RecipeId) -> Result<Recipe, RepositoryError> {
        let tables = self.tables.read().await;
        let mut recipe = tables
            .recipes
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        let owner = tables.author(recipe.user_id)?;
        recipe.user = RecipeAuthor {
            id: owner.id,
            name: owner.name.clone(),
            email: Some(owner.email.clone()),
        };
        recipe.ingredients = tables
            .ingredients
            .values()
            .filter(|i| i.recipe_id == id)
            .cloned()
            .collect();
        recipe.directions = tables
            .directions
            .values()
            .filter(|d| d.recipe_id == id)
            .cloned()
            .collect();

        Ok(recipe)
    }

    async fn insert_recipe(
        &self,
        title: &str,
        user_id: UserId,
    ) -> Result<RecipeId, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepositoryError::NotFound);
        }

        tables.last_recipe_id += 1;
        let id = RecipeId::new(tables.last_recipe_id);
        let created_at = now();
        tables.recipes.insert(
            id,
            Recipe {
                id,
                title: title.to_owned(),
                image: Vec::new(),
                user_id,
                created_at,
                updated_at: created_at,
                ingredients: Vec::new(),
                directions: Vec::new(),
                user: RecipeAuthor {
                    id: user_id,
                    ..RecipeAuthor::default()
                },
            },
        );

        Ok(id)
    }

    async fn insert_ingredient(
        &self,
        name: &str,
        amount: &str,
        unit: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(RepositoryError::NotFound);
        }

        tables.last_ingredient_id += 1;
        let id = IngredientId::new(tables.last_ingredient_id);
        tables.ingredients.insert(
            id,
            Ingredient {
                id,
                name: name.to_owned(),
                amount: amount.to_owned(),
                unit: unit.to_owned(),
                recipe_id,
            },
        );

        Ok(())
    }

    async fn insert_direction(
        &self,
        direction: &str,
        recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.recipes.contains_key(&recipe_id) {
            return Err(RepositoryError::NotFound);
        }

        tables.last_direction_id += 1;
        let id = DirectionId::new(tables.last_direction_id);
        tables.directions.insert(
            id,
            Direction {
                id,
                direction: direction.to_owned(),
                recipe_id,
            },
        );

        Ok(())
    }

    async fn update_recipe(&self, payload: &RecipePayload) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let recipe = tables
            .recipes
            .get_mut(&payload.id)
            .ok_or(RepositoryError::NotFound)?;
        recipe.title.clone_from(&payload.title);
        recipe.updated_at = now();

        tables.ingredients.retain(|_, i| i.recipe_id != payload.id);
        tables.directions.retain(|_, d| d.recipe_id != payload.id);

        Ok(())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.recipes.remove(&id).is_some() {
            tables.ingredients.retain(|_, i| i.recipe_id != id);
            tables.directions.retain(|_, d| d.recipe_id != id);
        }
        Ok(())
    }

    async fn get_user_by_email(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<User, RepositoryError> {
        let tables = self.tables.read().await;
        let user = tables
            .users
            .values()
            .find(|u| u.email == *email)
            .ok_or(RepositoryError::NotFound)?;

        password::verify_password(password, &user.password_hash).map_err(|e| match e {
            PasswordError::Mismatch => RepositoryError::InvalidPassword,
            other => RepositoryError::DataCorruption(other.to_string()),
        })?;

        Ok(user.clone())
    }

    async fn insert_user(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == *email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        tables.last_user_id += 1;
        let id = UserId::new(tables.last_user_id);
        let created_at = now();
        let user = User {
            id,
            name: name.to_owned(),
            email: email.clone(),
            password_hash: password_hash.to_owned(),
            image: Vec::new(),
            roles: Vec::new(),
            recipes: Vec::new(),
            created_at,
            updated_at: created_at,
        };
        tables.users.insert(id, user.clone());

        Ok(user)
    }
}
