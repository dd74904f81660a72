//! Session middleware configuration.
//!
//! The server uses a `PostgreSQL` store; tests pass a `MemoryStore`.

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "recipe_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer over any store.
///
/// # Arguments
///
/// * `store` - Session store (the sessions table must exist for `PostgresStore`)
/// * `config` - Site configuration (production mode sets the `Secure` flag)
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &AppConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.in_production)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
