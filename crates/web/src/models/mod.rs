//! Domain models for the recipe site.

pub mod payload;
pub mod recipe;
pub mod session;
pub mod template;
pub mod user;

pub use payload::{DirectionPayload, IngredientPayload, RecipePayload};
pub use recipe::{Direction, Ingredient, Recipe, RecipeAuthor};
pub use session::{CurrentUser, keys as session_keys};
pub use template::{CredentialValues, PageData, RecipeView, TemplateData};
pub use user::{Role, User};
