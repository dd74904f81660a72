//! Askama page structs and the render functions registered in the cache.

use askama::Template;

use super::{HOME, LOGIN, NEW_RECIPE, RECIPE_DETAILS, RECIPE_EDIT, RenderError, SIGNUP};
use crate::filters;
use crate::models::{CredentialValues, PageData, Recipe, RecipeView, TemplateData};

#[derive(Template)]
#[template(path = "home.page.html")]
struct HomePage<'a> {
    td: &'a TemplateData,
    recipes: &'a [Recipe],
}

#[derive(Template)]
#[template(path = "login.page.html")]
struct LoginPage<'a> {
    td: &'a TemplateData,
    form: &'a CredentialValues,
}

#[derive(Template)]
#[template(path = "signup.page.html")]
struct SignupPage<'a> {
    td: &'a TemplateData,
    form: &'a CredentialValues,
}

#[derive(Template)]
#[template(path = "recipe-details.page.html")]
struct RecipeDetailsPage<'a> {
    td: &'a TemplateData,
    recipe: &'a Recipe,
    recipe_json: &'a str,
}

#[derive(Template)]
#[template(path = "recipe-edit.page.html")]
struct RecipeEditPage<'a> {
    td: &'a TemplateData,
    recipe: &'a Recipe,
    recipe_json: &'a str,
}

#[derive(Template)]
#[template(path = "new-recipe.page.html")]
struct NewRecipePage<'a> {
    td: &'a TemplateData,
}

static EMPTY_FORM: CredentialValues = CredentialValues {
    name: String::new(),
    email: String::new(),
};

fn credentials<'a>(
    td: &'a TemplateData,
    page: &'static str,
) -> Result<&'a CredentialValues, RenderError> {
    match &td.data {
        PageData::Credentials(form) => Ok(form),
        PageData::Empty => Ok(&EMPTY_FORM),
        _ => Err(RenderError::PayloadMismatch(page)),
    }
}

fn recipe_view<'a>(
    td: &'a TemplateData,
    page: &'static str,
) -> Result<&'a RecipeView, RenderError> {
    match &td.data {
        PageData::Recipe(view) => Ok(&**view),
        _ => Err(RenderError::PayloadMismatch(page)),
    }
}

pub fn home(td: &TemplateData) -> Result<String, RenderError> {
    let recipes: &[Recipe] = match &td.data {
        PageData::Recipes(recipes) => recipes.as_slice(),
        PageData::Empty => &[],
        _ => return Err(RenderError::PayloadMismatch(HOME)),
    };
    Ok(HomePage { td, recipes }.render()?)
}

pub fn login(td: &TemplateData) -> Result<String, RenderError> {
    let form = credentials(td, LOGIN)?;
    Ok(LoginPage { td, form }.render()?)
}

pub fn signup(td: &TemplateData) -> Result<String, RenderError> {
    let form = credentials(td, SIGNUP)?;
    Ok(SignupPage { td, form }.render()?)
}

pub fn recipe_details(td: &TemplateData) -> Result<String, RenderError> {
    let view = recipe_view(td, RECIPE_DETAILS)?;
    Ok(RecipeDetailsPage {
        td,
        recipe: &view.recipe,
        recipe_json: &view.recipe_json,
    }
    .render()?)
}

pub fn recipe_edit(td: &TemplateData) -> Result<String, RenderError> {
    let view = recipe_view(td, RECIPE_EDIT)?;
    Ok(RecipeEditPage {
        td,
        recipe: &view.recipe,
        recipe_json: &view.recipe_json,
    }
    .render()?)
}

pub fn new_recipe(td: &TemplateData) -> Result<String, RenderError> {
    Ok(NewRecipePage { td }.render()?)
}
