//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use std::fmt;

use chrono::{DateTime, Utc};

use recipe_box_core::{Email, UserId};

use super::recipe::Recipe;

/// A named permission attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role {
    /// Role name (e.g., "editor").
    pub name: String,
}

/// A registered cook (domain type).
///
/// `Debug` is implemented manually so the password hash never reaches logs.
#[derive(Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: Email,
    /// Argon2 PHC string. Never the plaintext password.
    pub password_hash: String,
    /// Avatar bytes, empty when unset.
    pub image: Vec<u8>,
    /// Roles granted to this user. Not persisted yet, always empty.
    pub roles: Vec<Role>,
    /// Recipes owned by this user, when loaded.
    pub recipes: Vec<Recipe>,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("image_len", &self.image.len())
            .field("roles", &self.roles)
            .field("recipes", &self.recipes.len())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
