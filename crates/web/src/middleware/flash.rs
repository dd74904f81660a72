//! One-shot session messages.
//!
//! A message is stored by the handler that redirects and removed by the
//! renderer on the next page view.

use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::models::session_keys;

/// The three message slots shown by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Flash,
    Error,
    Warning,
}

impl FlashKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Flash => session_keys::FLASH,
            Self::Error => session_keys::ERROR,
            Self::Warning => session_keys::WARNING,
        }
    }
}

/// Store a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn put(
    session: &Session,
    kind: FlashKind,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(kind.key(), message).await
}

/// Remove and return a message.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn pop(
    session: &Session,
    kind: FlashKind,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(kind.key()).await
}

/// Store a message and redirect.
///
/// A session failure only loses the message; the redirect is still sent.
pub async fn redirect_with(
    session: &Session,
    kind: FlashKind,
    message: &str,
    to: &str,
) -> Response {
    if let Err(e) = put(session, kind, message).await {
        tracing::error!(error = %e, key = kind.key(), "Failed to store flash message");
    }
    Redirect::to(to).into_response()
}
