//! Recipe domain types.

use chrono::{DateTime, Utc};

use recipe_box_core::{DirectionId, Email, IngredientId, RecipeId, UserId};

/// Snapshot of the owning user, embedded for display.
///
/// The list view only loads the name; the detail view fills in the email too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeAuthor {
    pub id: UserId,
    pub name: String,
    pub email: Option<Email>,
}

/// A recipe with its owner and, on the detail view, its ingredients and directions.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    /// Raw image bytes, empty when no image was uploaded.
    pub image: Vec<u8>,
    /// Owning user. Set at creation and never changed.
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<Direction>,
    pub user: RecipeAuthor,
}

impl Recipe {
    /// Whether the recipe has an image to show.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

/// One ingredient line. `amount` is free-form ("1/2", "a pinch").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub recipe_id: RecipeId,
}

/// One step of the method, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    pub id: DirectionId,
    pub direction: String,
    pub recipe_id: RecipeId,
}
