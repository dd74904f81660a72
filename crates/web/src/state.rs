//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Repository;
use crate::renderer::Renderer;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the repository, the renderer and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    repo: Arc<dyn Repository>,
    renderer: Renderer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The renderer's cache mode comes from `config.use_template_cache`.
    #[must_use]
    pub fn new(config: AppConfig, repo: Arc<dyn Repository>) -> Self {
        let renderer = Renderer::new(config.use_template_cache);
        if renderer.is_cached() {
            tracing::info!("Template cache enabled");
        }

        Self {
            inner: Arc::new(AppStateInner {
                config,
                repo,
                renderer,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the repository.
    #[must_use]
    pub fn repo(&self) -> &dyn Repository {
        self.inner.repo.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }
}
