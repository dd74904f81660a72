//! Home page route handler.

use axum::{extract::State, response::Response};
use tower_sessions::Session;
use tracing::instrument;

use super::render_page;
use crate::error::Result;
use crate::middleware::{FlashKind, flash};
use crate::models::{PageData, TemplateData};
use crate::renderer::HOME;
use crate::state::AppState;

/// List every recipe.
///
/// A store failure still renders the page, empty and with an error message.
/// The message goes through the session so the renderer pops it like any
/// other flash.
#[instrument(skip_all)]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Response> {
    let data = match state.repo().get_all_recipes().await {
        Ok(recipes) => TemplateData::new(PageData::Recipes(recipes)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch recipes");
            flash::put(&session, FlashKind::Error, "Error getting recipes").await?;
            TemplateData::new(PageData::Recipes(Vec::new()))
        }
    };

    render_page(&state, &session, HOME, data).await
}
