//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Recipe list
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Database check
//!
//! # Users
//! GET  /user/login             - Login page
//! POST /user/login             - Login action (form)
//! GET  /user/signup            - Signup page
//! POST /user/signup            - Signup action (form)
//! GET  /user/logout            - Logout
//!
//! # Recipes
//! GET  /recipe/details/{id}    - Recipe page
//! GET  /recipe/new             - New recipe form (requires login)
//! POST /recipe/new             - Create recipe (JSON, requires login)
//! GET  /recipe/edit/{id}       - Edit form
//! POST /recipe/edit/{id}       - Update recipe (JSON)
//! POST /recipe/delete/{id}     - Delete recipe
//! ```

pub mod auth;
pub mod home;
pub mod recipes;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Session, SessionManagerLayer, SessionStore};

use crate::error::Result;
use crate::middleware::{cors_layer, request_id_middleware};
use crate::models::TemplateData;
use crate::state::AppState;

/// Directory served under `/static`, resolved from this crate's manifest so
/// the binary does not depend on its working directory.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Render a page through the shared renderer.
async fn render_page(
    state: &AppState,
    session: &Session,
    name: &str,
    data: TemplateData,
) -> Result<Response> {
    let html = state.renderer().render(session, name, data).await?;
    Ok(html.into_response())
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout))
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/details/{id}", get(recipes::details))
        .route("/new", get(recipes::new_page).post(recipes::create))
        .route("/edit/{id}", get(recipes::edit_page).post(recipes::update))
        .route("/delete/{id}", post(recipes::delete))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/user", user_routes())
        .nest("/recipe", recipe_routes())
}

/// Build the complete application with middleware.
///
/// The session store is a parameter so tests can run on a `MemoryStore`.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let cors = cors_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.repo().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
