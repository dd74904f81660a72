//! Recipe pages and JSON endpoints over HTTP.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use recipe_box_core::RecipeId;
use recipe_box_web::db::{Repository, RepositoryError};
use serde_json::json;

use common::{TestApp, assert_redirect, signup, unavailable_server};

async fn only_recipe_id(app: &TestApp) -> RecipeId {
    let recipes = app.repo.get_all_recipes().await.unwrap();
    assert_eq!(recipes.len(), 1);
    recipes[0].id
}

async fn create_titled(server: &TestServer, title: &str) -> TestResponse {
    server
        .post("/recipe/new")
        .json(&json!({ "title": title, "ingredients": [], "directions": [] }))
        .await
}

async fn create_bread(app: &TestApp) -> RecipeId {
    let response = app
        .server
        .post("/recipe/new")
        .json(&json!({
            "title": "Bread",
            "ingredients": [{ "name": "Flour", "amount": "2", "unit": "cup" }],
            "directions": [{ "direction": "Mix" }]
        }))
        .await;
    assert_redirect(&response, "/");
    only_recipe_id(app).await
}

#[tokio::test]
async fn test_home_store_failure_shows_error() {
    let server = unavailable_server();

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("Error getting recipes"));

    server
        .get("/health/ready")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::new();

    let response = app.server.get("/static/css/main.css").await;
    response.assert_status_ok();
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("ok");

    app.server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_requests_get_an_id() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());

    let response = app
        .server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("upstream-123"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "upstream-123");
}

#[tokio::test]
async fn test_missing_recipe_redirects_home_with_error() {
    let app = TestApp::new();

    let response = app.server.get("/recipe/details/999").await;
    assert_redirect(&response, "/");

    let home = app.server.get("/").await;
    home.assert_status_ok();
    assert!(home.text().contains("Error getting recipe details"));
}

#[tokio::test]
async fn test_non_numeric_id_redirects_home_with_error() {
    let app = TestApp::new();

    let response = app.server.get("/recipe/edit/abc").await;
    assert_redirect(&response, "/");
    assert!(app.server.get("/").await.text().contains("Error getting recipe details"));
}

#[tokio::test]
async fn test_new_recipe_requires_login() {
    let app = TestApp::new();

    let response = app.server.get("/recipe/new").await;
    assert_redirect(&response, "/user/login");
    assert!(app.server.get("/user/login").await.text().contains("Please log in first"));

    let response = app
        .server
        .post("/recipe/new")
        .json(&json!({ "title": "Sneaky" }))
        .await;
    assert_redirect(&response, "/user/login");
    assert!(app.repo.get_all_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_round_trip() {
    let app = TestApp::new();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;

    let id = create_bread(&app).await;

    let recipe = app.repo.get_recipe_details(id).await.unwrap();
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].name, "Flour");
    assert_eq!(recipe.ingredients[0].amount, "2");
    assert_eq!(recipe.ingredients[0].unit, "cup");
    assert_eq!(recipe.directions.len(), 1);
    assert_eq!(recipe.directions[0].direction, "Mix");

    let home = app.server.get("/").await.text();
    assert!(home.contains("Recipe created"));
    assert!(home.contains("Bread"));

    let details = app.server.get(&format!("/recipe/details/{id}")).await;
    details.assert_status_ok();
    let body = details.text();
    assert!(body.contains("Flour"));
    assert!(body.contains("Mix"));
    // The owner sees the edit controls
    assert!(body.contains(&format!("/recipe/edit/{id}")));
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let app = TestApp::new();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;

    let response = app
        .server
        .post("/recipe/new")
        .json(&json!({ "title": "  ", "ingredients": [], "directions": [] }))
        .await;
    assert_redirect(&response, "/recipe/new");
    assert!(app.repo.get_all_recipes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_do_not_see_edit_controls() {
    let app = TestApp::new();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;
    let id = create_bread(&app).await;

    let bob = app.second_client();
    signup(&bob, "Bob", "bob@example.com", "waffles").await;

    let body = bob.get(&format!("/recipe/details/{id}")).await.text();
    assert!(body.contains("Bread"));
    assert!(!body.contains(&format!("/recipe/delete/{id}")));
}

#[tokio::test]
async fn test_edit_replaces_children() {
    let app = TestApp::new();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;
    let id = create_bread(&app).await;

    let edit_page = app.server.get(&format!("/recipe/edit/{id}")).await;
    edit_page.assert_status_ok();
    assert!(edit_page.text().contains("data-recipe="));

    // The body id is ignored in favour of the path
    let response = app
        .server
        .post(&format!("/recipe/edit/{id}"))
        .json(&json!({
            "id": 12345,
            "title": "Flatbread",
            "ingredients": [
                { "id": 1, "name": "Flour", "amount": "1/2", "unit": "cup" },
                { "name": "Water", "amount": "1", "unit": "cup" }
            ],
            "directions": [{ "direction": "Knead" }, { "direction": "Bake" }]
        }))
        .await;
    assert_redirect(&response, "/");

    let recipe = app.repo.get_recipe_details(id).await.unwrap();
    assert_eq!(recipe.title, "Flatbread");
    let ingredients: Vec<_> = recipe
        .ingredients
        .iter()
        .map(|i| (i.name.as_str(), i.amount.as_str(), i.unit.as_str()))
        .collect();
    assert_eq!(ingredients, [("Flour", "1/2", "cup"), ("Water", "1", "cup")]);
    let directions: Vec<_> = recipe
        .directions
        .iter()
        .map(|d| d.direction.as_str())
        .collect();
    assert_eq!(directions, ["Knead", "Bake"]);

    assert!(app.server.get("/").await.text().contains("Recipe updated"));
}

#[tokio::test]
async fn test_delete_then_details_not_found() {
    let app = TestApp::new();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;
    let id = create_bread(&app).await;

    let response = app.server.post(&format!("/recipe/delete/{id}")).await;
    assert_redirect(&response, "/");
    assert!(app.server.get("/").await.text().contains("Recipe deleted"));

    assert!(matches!(
        app.repo.get_recipe_details(id).await,
        Err(RepositoryError::NotFound)
    ));
    assert_redirect(&app.server.get(&format!("/recipe/details/{id}")).await, "/");
}

#[tokio::test]
async fn test_malformed_json_is_500_with_empty_body() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/recipe/edit/1")
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_concurrent_creates_keep_ownership() {
    let app = TestApp::new();
    let bob = app.second_client();
    signup(&app.server, "Ada", "ada@example.com", "pancakes").await;
    signup(&bob, "Bob", "bob@example.com", "waffles").await;

    let (a1, b1, a2, b2) = tokio::join!(
        create_titled(&app.server, "Ada 1"),
        create_titled(&bob, "Bob 1"),
        create_titled(&app.server, "Ada 2"),
        create_titled(&bob, "Bob 2"),
    );
    for response in [a1, b1, a2, b2] {
        assert_redirect(&response, "/");
    }

    let recipes = app.repo.get_all_recipes().await.unwrap();
    assert_eq!(recipes.len(), 4);
    for recipe in recipes {
        let expected = if recipe.title.starts_with("Ada") { "Ada" } else { "Bob" };
        assert_eq!(recipe.user.name, expected, "{} has the wrong owner", recipe.title);
    }
}
