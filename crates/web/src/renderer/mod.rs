//! Page rendering.
//!
//! Pages are Askama templates compiled into the binary. A [`TemplateCache`]
//! maps each page name to its render function. With the cache enabled one
//! registry is built at startup and shared; with it disabled a fresh registry
//! is built for every render.
//!
//! [`Renderer::render`] resolves the page, pops the one-shot messages from the
//! session, fills in the current user, and renders into a `String` before any
//! response is built.

mod pages;

use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Html;
use thiserror::Error;
use tower_sessions::Session;

use crate::middleware::{auth, flash};
use crate::models::TemplateData;

pub const HOME: &str = "home.page.html";
pub const LOGIN: &str = "login.page.html";
pub const SIGNUP: &str = "signup.page.html";
pub const RECIPE_DETAILS: &str = "recipe-details.page.html";
pub const RECIPE_EDIT: &str = "recipe-edit.page.html";
pub const NEW_RECIPE: &str = "new-recipe.page.html";

/// Errors raised while producing a page.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0} does not exist")]
    TemplateNotFound(String),

    /// The handler passed page data the template cannot display.
    #[error("wrong page data for {0}")]
    PayloadMismatch(&'static str),

    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// A compiled page.
pub type RenderFn = fn(&TemplateData) -> Result<String, RenderError>;

/// Page name to render function.
#[derive(Debug, Clone)]
pub struct TemplateCache {
    templates: HashMap<&'static str, RenderFn>,
}

impl TemplateCache {
    /// Register every page template.
    #[must_use]
    pub fn build() -> Self {
        let pages: [(&'static str, RenderFn); 6] = [
            (HOME, pages::home),
            (LOGIN, pages::login),
            (SIGNUP, pages::signup),
            (RECIPE_DETAILS, pages::recipe_details),
            (RECIPE_EDIT, pages::recipe_edit),
            (NEW_RECIPE, pages::new_recipe),
        ];

        Self {
            templates: pages.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<RenderFn> {
        self.templates.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Renders pages with per-request session data injected.
#[derive(Debug, Clone)]
pub struct Renderer {
    cache: Option<Arc<TemplateCache>>,
}

impl Renderer {
    #[must_use]
    pub fn new(use_cache: bool) -> Self {
        Self {
            cache: use_cache.then(|| Arc::new(TemplateCache::build())),
        }
    }

    #[must_use]
    pub const fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Render `name` with `data`.
    ///
    /// The flash, error and warning messages are removed from the session
    /// here, so each is shown exactly once.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::TemplateNotFound` for an unknown page, before the
    /// session is touched. Session and template failures are passed through.
    pub async fn render(
        &self,
        session: &Session,
        name: &str,
        mut data: TemplateData,
    ) -> Result<Html<String>, RenderError> {
        let render_fn = match &self.cache {
            Some(cache) => cache.get(name),
            None => TemplateCache::build().get(name),
        }
        .ok_or_else(|| RenderError::TemplateNotFound(name.to_owned()))?;

        data.flash = flash::pop(session, flash::FlashKind::Flash).await?;
        data.error = flash::pop(session, flash::FlashKind::Error).await?;
        data.warning = flash::pop(session, flash::FlashKind::Warning).await?;
        data.current_user = auth::current_user(session).await?;
        data.is_authenticated = data.current_user.is_some();

        let body = render_fn(&data)?;
        Ok(Html(body))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;
    use crate::models::PageData;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_cache_registers_every_page() {
        let cache = TemplateCache::build();
        assert_eq!(cache.len(), 6);
        for name in [HOME, LOGIN, SIGNUP, RECIPE_DETAILS, RECIPE_EDIT, NEW_RECIPE] {
            assert!(cache.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn test_renderer_mode_follows_flag() {
        assert!(Renderer::new(true).is_cached());
        assert!(!Renderer::new(false).is_cached());
    }

    #[tokio::test]
    async fn test_unknown_template_is_an_error() {
        let session = session();
        flash::put(&session, flash::FlashKind::Flash, "kept").await.unwrap();

        let result = Renderer::new(true)
            .render(&session, "missing.page.html", TemplateData::default())
            .await;
        assert!(matches!(result, Err(RenderError::TemplateNotFound(name)) if name == "missing.page.html"));

        // The message waits for the next successful render
        let popped = flash::pop(&session, flash::FlashKind::Flash).await.unwrap();
        assert_eq!(popped.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let session = session();
        flash::put(&session, flash::FlashKind::Flash, "Recipe created")
            .await
            .unwrap();
        let renderer = Renderer::new(false);

        let first = renderer
            .render(&session, HOME, TemplateData::new(PageData::Recipes(Vec::new())))
            .await
            .unwrap();
        assert!(first.0.contains("Recipe created"));

        let second = renderer
            .render(&session, HOME, TemplateData::new(PageData::Recipes(Vec::new())))
            .await
            .unwrap();
        assert!(!second.0.contains("Recipe created"));
    }

    #[test]
    fn test_mismatched_payload_is_rejected() {
        let render = TemplateCache::build().get(RECIPE_DETAILS).unwrap();
        let result = render(&TemplateData::default());
        assert!(matches!(result, Err(RenderError::PayloadMismatch(RECIPE_DETAILS))));
    }
}
