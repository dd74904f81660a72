//! Authentication extractors and session helpers.
//!
//! The logged-in user is stored in the session as a [`CurrentUser`] under
//! [`session_keys::USER`].

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::flash::{self, FlashKind};
use crate::models::{CurrentUser, session_keys};

/// Where anonymous users are sent.
pub const LOGIN_PATH: &str = "/user/login";

/// Read the current user from the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn current_user(
    session: &Session,
) -> Result<Option<CurrentUser>, tower_sessions::session::Error> {
    session.get::<CurrentUser>(session_keys::USER).await
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(session_keys::USER).await?;
    Ok(())
}

/// Extractor that requires a logged-in user.
///
/// Anonymous requests get a warning flash and a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when a login is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to the login page with a warning.
    RedirectToLogin(Response),
    /// The session layer is missing or the store failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin(response) => response,
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::SessionUnavailable)?;

        match current_user(session).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                let response = flash::redirect_with(
                    session,
                    FlashKind::Warning,
                    "Please log in first",
                    LOGIN_PATH,
                )
                .await;
                Err(AuthRejection::RedirectToLogin(response))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read user from session");
                Err(AuthRejection::SessionUnavailable)
            }
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this never rejects the request. Session read errors
/// are logged and treated as anonymous.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read user from session");
                None
            }),
            None => None,
        };

        Ok(Self(user))
    }
}
