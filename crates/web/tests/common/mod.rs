//! Shared harness for the HTTP tests.
//!
//! Each test gets a fresh in-memory repository and session store.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use tower_sessions::MemoryStore;

use recipe_box_core::{Email, RecipeId, UserId};
use recipe_box_web::config::AppConfig;
use recipe_box_web::db::{MemoryRepository, Repository, RepositoryError};
use recipe_box_web::models::{Recipe, RecipePayload, User};
use recipe_box_web::middleware::create_session_layer;
use recipe_box_web::state::AppState;

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<MemoryRepository>,
    state: AppState,
    store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let state = AppState::new(AppConfig::default(), repo.clone());
        let store = MemoryStore::default();
        let server = client(&state, &store);

        Self {
            server,
            repo,
            state,
            store,
        }
    }

    /// Another browser against the same data, with its own cookie jar.
    pub fn second_client(&self) -> TestServer {
        client(&self.state, &self.store)
    }
}

/// A server whose every repository call times out.
pub fn unavailable_server() -> TestServer {
    let state = AppState::new(AppConfig::default(), Arc::new(UnavailableRepository));
    client(&state, &MemoryStore::default())
}

/// Repository standing in for a database that never answers.
pub struct UnavailableRepository;

#[async_trait]
impl Repository for UnavailableRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn get_all_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn get_recipe_details(&self, _id: RecipeId) -> Result<Recipe, RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn insert_recipe(
        &self,
        _title: &str,
        _user_id: UserId,
    ) -> Result<RecipeId, RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn insert_ingredient(
        &self,
        _name: &str,
        _amount: &str,
        _unit: &str,
        _recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn insert_direction(
        &self,
        _direction: &str,
        _recipe_id: RecipeId,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn update_recipe(&self, _payload: &RecipePayload) -> Result<(), RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn delete_recipe(&self, _id: RecipeId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn get_user_by_email(
        &self,
        _email: &Email,
        _password: &str,
    ) -> Result<User, RepositoryError> {
        Err(RepositoryError::Timeout)
    }

    async fn insert_user(
        &self,
        _name: &str,
        _email: &Email,
        _password_hash: &str,
    ) -> Result<User, RepositoryError> {
        Err(RepositoryError::Timeout)
    }
}

fn client(state: &AppState, store: &MemoryStore) -> TestServer {
    let session_layer = create_session_layer(store.clone(), state.config());
    let app = recipe_box_web::app(state.clone(), session_layer);
    TestServer::builder().save_cookies().build(app).unwrap()
}

pub async fn signup(server: &TestServer, name: &str, email: &str, password: &str) -> TestResponse {
    server
        .post("/user/signup")
        .form(&[("name", name), ("email", email), ("password", password)])
        .await
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> TestResponse {
    server
        .post("/user/login")
        .form(&[("email", email), ("password", password)])
        .await
}

/// Assert a 303 to `location`.
pub fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), location);
}
