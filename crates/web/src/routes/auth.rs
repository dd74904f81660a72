//! Authentication route handlers.
//!
//! Handles login, signup and logout with argon2 password hashes stored in
//! the `users` table.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::render_page;
use crate::db::RepositoryError;
use crate::error::Result;
use crate::forms::Validator;
use crate::middleware::{FlashKind, OptionalUser, clear_current_user, flash, set_current_user};
use crate::models::{CredentialValues, CurrentUser, PageData, TemplateData, User};
use crate::password::{self, MIN_PASSWORD_LENGTH};
use crate::renderer::{LOGIN, SIGNUP};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Store the user in the session under a fresh session id.
async fn log_in(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    session.cycle_id().await?;
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Users who are already logged in go straight home.
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> Result<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    render_page(&state, &session, LOGIN, TemplateData::default()).await
}

/// Handle login form submission.
///
/// Unknown emails and wrong passwords get the same message; the log line
/// records which one happened.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let mut validator = Validator::new();
    validator
        .required("email", &form.email)
        .required("password", &form.password);
    let email = validator.email("email", &form.email);

    let email = match (validator.finish(), email) {
        (Ok(()), Some(email)) => email,
        (result, _) => {
            let values = CredentialValues {
                name: String::new(),
                email: form.email.clone(),
            };
            let data = TemplateData::new(PageData::Credentials(values))
                .with_errors(result.err().unwrap_or_default());
            return render_page(&state, &session, LOGIN, data).await;
        }
    };

    match state.repo().get_user_by_email(&email, &form.password).await {
        Ok(user) => {
            log_in(&session, &user).await?;
            tracing::info!(user_id = %user.id, "User logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            match e {
                RepositoryError::NotFound => tracing::info!("Login failed: unknown email"),
                RepositoryError::InvalidPassword => tracing::info!("Login failed: wrong password"),
                other => tracing::error!(error = %other, "Login failed"),
            }
            Ok(flash::redirect_with(&session, FlashKind::Error, "Error signing in", "/").await)
        }
    }
}

/// Log out and rotate the session id.
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    session.cycle_id().await?;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(State(state): State<AppState>, session: Session) -> Result<Response> {
    render_page(&state, &session, SIGNUP, TemplateData::default()).await
}

/// Handle signup form submission.
///
/// On success the new user is logged in.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let values = CredentialValues {
        name: form.name.clone(),
        email: form.email.clone(),
    };

    let mut validator = Validator::new();
    validator
        .required("name", &form.name)
        .required("email", &form.email)
        .required("password", &form.password)
        .min_length("password", &form.password, MIN_PASSWORD_LENGTH);
    let email = validator.email("email", &form.email);

    let email = match (validator.finish(), email) {
        (Ok(()), Some(email)) => email,
        (result, _) => {
            let data = TemplateData::new(PageData::Credentials(values))
                .with_errors(result.err().unwrap_or_default());
            return render_page(&state, &session, SIGNUP, data).await;
        }
    };

    let password_hash = match password::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Password hashing failed");
            flash::put(&session, FlashKind::Error, "Error creating account").await?;
            let data = TemplateData::new(PageData::Credentials(values));
            return render_page(&state, &session, SIGNUP, data).await;
        }
    };

    match state
        .repo()
        .insert_user(form.name.trim(), &email, &password_hash)
        .await
    {
        Ok(user) => {
            log_in(&session, &user).await?;
            tracing::info!(user_id = %user.id, "User signed up");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to insert user");
            Ok(flash::redirect_with(
                &session,
                FlashKind::Error,
                "Error inserting new user",
                "/user/signup",
            )
            .await)
        }
    }
}
