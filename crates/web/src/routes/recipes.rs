//! Recipe route handlers.
//!
//! The new and edit pages post a JSON [`RecipePayload`] from
//! `static/js/recipe-form.js`; fetch follows the redirect and the script
//! navigates to wherever it landed.

use axum::{
    extract::{Path, State},
    response::Response,
};
use tower_sessions::Session;
use tracing::instrument;

use recipe_box_core::RecipeId;

use super::render_page;
use crate::db::{Repository, RepositoryError};
use crate::error::Result;
use crate::extract::JsonBody;
use crate::middleware::{FlashKind, OptionalUser, RequireUser, flash};
use crate::models::{CurrentUser, PageData, Recipe, RecipePayload, RecipeView, TemplateData};
use crate::renderer::{NEW_RECIPE, RECIPE_DETAILS, RECIPE_EDIT};
use crate::state::AppState;

const DETAILS_ERROR: &str = "Error getting recipe details";

/// Whether the viewer owns the recipe. Display only.
fn is_author(viewer: Option<&CurrentUser>, recipe: &Recipe) -> bool {
    match (viewer, &recipe.user.email) {
        (Some(viewer), Some(owner)) => viewer.email == *owner,
        _ => false,
    }
}

/// Load a recipe for the details and edit pages.
///
/// Any failure becomes an error flash and a redirect home.
async fn load_recipe(
    state: &AppState,
    session: &Session,
    raw_id: &str,
) -> std::result::Result<Recipe, Response> {
    let id = match raw_id.parse::<RecipeId>() {
        Ok(id) => id,
        Err(e) => {
            tracing::info!(error = %e, "Bad recipe id");
            return Err(flash::redirect_with(session, FlashKind::Error, DETAILS_ERROR, "/").await);
        }
    };

    match state.repo().get_recipe_details(id).await {
        Ok(recipe) => Ok(recipe),
        Err(e) => {
            if matches!(e, RepositoryError::NotFound) {
                tracing::info!(recipe_id = %id, "Recipe not found");
            } else {
                tracing::error!(recipe_id = %id, error = %e, "Failed to load recipe");
            }
            Err(flash::redirect_with(session, FlashKind::Error, DETAILS_ERROR, "/").await)
        }
    }
}

/// Build the page data shared by the details and edit pages.
fn recipe_page(viewer: Option<&CurrentUser>, recipe: Recipe) -> Result<TemplateData> {
    let recipe_json = serde_json::to_string(&RecipePayload::from(&recipe))
        .map_err(|e| crate::error::AppError::Internal(format!("recipe JSON: {e}")))?;
    let is_author = is_author(viewer, &recipe);

    let mut data = TemplateData::new(PageData::Recipe(Box::new(RecipeView {
        recipe,
        recipe_json,
    })));
    data.is_author = is_author;
    Ok(data)
}

/// Insert the submitted ingredients then directions, stopping at the first failure.
async fn insert_children(
    repo: &dyn Repository,
    recipe_id: RecipeId,
    payload: &RecipePayload,
) -> std::result::Result<(), RepositoryError> {
    for ingredient in &payload.ingredients {
        repo.insert_ingredient(
            &ingredient.name,
            &ingredient.amount,
            &ingredient.unit,
            recipe_id,
        )
        .await?;
    }
    for direction in &payload.directions {
        repo.insert_direction(&direction.direction, recipe_id).await?;
    }
    Ok(())
}

/// Display one recipe.
#[instrument(skip(state, session, user))]
pub async fn details(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let recipe = match load_recipe(&state, &session, &id).await {
        Ok(recipe) => recipe,
        Err(redirect) => return Ok(redirect),
    };
    let data = recipe_page(user.as_ref(), recipe)?;
    render_page(&state, &session, RECIPE_DETAILS, data).await
}

/// Display the edit form, pre-filled from the stored recipe.
#[instrument(skip(state, session, user))]
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let recipe = match load_recipe(&state, &session, &id).await {
        Ok(recipe) => recipe,
        Err(redirect) => return Ok(redirect),
    };
    let data = recipe_page(user.as_ref(), recipe)?;
    render_page(&state, &session, RECIPE_EDIT, data).await
}

/// Display the empty recipe form.
pub async fn new_page(
    State(state): State<AppState>,
    session: Session,
    RequireUser(_user): RequireUser,
) -> Result<Response> {
    render_page(&state, &session, NEW_RECIPE, TemplateData::default()).await
}

/// Create a recipe owned by the logged-in user.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireUser(user): RequireUser,
    JsonBody(payload): JsonBody<RecipePayload>,
) -> Result<Response> {
    if payload.title.trim().is_empty() {
        return Ok(flash::redirect_with(
            &session,
            FlashKind::Warning,
            "A recipe needs a title",
            "/recipe/new",
        )
        .await);
    }

    let repo = state.repo();
    let recipe_id = match repo.insert_recipe(payload.title.trim(), user.id).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert recipe");
            return Ok(
                flash::redirect_with(&session, FlashKind::Error, "Error creating recipe", "/")
                    .await,
            );
        }
    };

    if let Err(e) = insert_children(repo, recipe_id, &payload).await {
        tracing::error!(recipe_id = %recipe_id, error = %e, "Failed to insert recipe contents");
        return Ok(flash::redirect_with(
            &session,
            FlashKind::Error,
            "Error saving ingredients and directions",
            "/",
        )
        .await);
    }

    tracing::info!(recipe_id = %recipe_id, "Recipe created");
    Ok(flash::redirect_with(&session, FlashKind::Flash, "Recipe created", "/").await)
}

/// Replace a recipe's title, ingredients and directions.
///
/// The id in the path wins over the one in the body. Ownership is not
/// verified before mutating.
#[instrument(skip(state, session, payload))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    JsonBody(mut payload): JsonBody<RecipePayload>,
) -> Result<Response> {
    let Ok(recipe_id) = id.parse::<RecipeId>() else {
        return Ok(
            flash::redirect_with(&session, FlashKind::Error, "Error updating recipe", "/").await,
        );
    };
    payload.id = recipe_id;

    if payload.title.trim().is_empty() {
        return Ok(flash::redirect_with(
            &session,
            FlashKind::Warning,
            "A recipe needs a title",
            &format!("/recipe/edit/{recipe_id}"),
        )
        .await);
    }
    payload.title = payload.title.trim().to_owned();

    let repo = state.repo();
    if let Err(e) = repo.update_recipe(&payload).await {
        tracing::error!(error = %e, "Failed to update recipe");
        return Ok(
            flash::redirect_with(&session, FlashKind::Error, "Error updating recipe", "/").await,
        );
    }

    if let Err(e) = insert_children(repo, recipe_id, &payload).await {
        tracing::error!(error = %e, "Failed to insert recipe contents");
        return Ok(flash::redirect_with(
            &session,
            FlashKind::Error,
            "Error saving ingredients and directions",
            "/",
        )
        .await);
    }

    tracing::info!("Recipe updated");
    Ok(flash::redirect_with(&session, FlashKind::Flash, "Recipe updated", "/").await)
}

/// Delete a recipe and its contents.
///
/// Ownership is not verified before mutating.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let Ok(recipe_id) = id.parse::<RecipeId>() else {
        return Ok(
            flash::redirect_with(&session, FlashKind::Error, "Error deleting recipe", "/").await,
        );
    };

    if let Err(e) = state.repo().delete_recipe(recipe_id).await {
        tracing::error!(error = %e, "Failed to delete recipe");
        return Ok(
            flash::redirect_with(&session, FlashKind::Error, "Error deleting recipe", "/").await,
        );
    }

    tracing::info!(recipe_id = %recipe_id, "Recipe deleted");
    Ok(flash::redirect_with(&session, FlashKind::Flash, "Recipe deleted", "/").await)
}
