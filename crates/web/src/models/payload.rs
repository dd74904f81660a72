//! JSON bodies posted by the recipe editor script.
//!
//! ```json
//! {
//!   "id": 3,
//!   "title": "Pancakes",
//!   "ingredients": [{ "id": 0, "name": "Flour", "amount": "2", "unit": "cup" }],
//!   "directions": [{ "id": 0, "direction": "Mix" }]
//! }
//! ```
//!
//! Ids are echoed back by the editor but ignored on write: edits replace every
//! ingredient and direction.

use serde::{Deserialize, Serialize};

use recipe_box_core::{DirectionId, IngredientId, RecipeId};

use super::recipe::Recipe;

/// A recipe as submitted from the new/edit forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePayload {
    #[serde(default)]
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientPayload>,
    #[serde(default)]
    pub directions: Vec<DirectionPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPayload {
    #[serde(default)]
    pub id: IngredientId,
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionPayload {
    #[serde(default)]
    pub id: DirectionId,
    pub direction: String,
}

impl From<&Recipe> for RecipePayload {
    /// The editor is pre-filled from this shape, which carries no owner data.
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            ingredients: recipe
                .ingredients
                .iter()
                .map(|i| IngredientPayload {
                    id: i.id,
                    name: i.name.clone(),
                    amount: i.amount.clone(),
                    unit: i.unit.clone(),
                })
                .collect(),
            directions: recipe
                .directions
                .iter()
                .map(|d| DirectionPayload {
                    id: d.id,
                    direction: d.direction.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ids_default_to_zero() {
        let payload: RecipePayload = serde_json::from_str(
            r#"{"title":"Toast","ingredients":[{"name":"Bread","amount":"1","unit":"slice"}],"directions":[{"direction":"Toast it"}]}"#,
        )
        .unwrap();

        assert_eq!(payload.id, RecipeId::default());
        assert_eq!(payload.ingredients[0].id, IngredientId::default());
        assert_eq!(payload.directions[0].direction, "Toast it");
    }

    #[test]
    fn test_title_is_required() {
        let result = serde_json::from_str::<RecipePayload>(r#"{"ingredients":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_amount_and_unit_are_optional() {
        let ingredient: IngredientPayload = serde_json::from_str(r#"{"name":"Salt"}"#).unwrap();
        assert_eq!(ingredient.amount, "");
        assert_eq!(ingredient.unit, "");
    }
}
