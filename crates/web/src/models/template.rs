//! Per-request view model handed to the renderer.

use super::recipe::Recipe;
use super::session::CurrentUser;
use crate::forms::FormErrors;

/// Values echoed back into the login and signup forms after a failed submit.
///
/// Passwords are never echoed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialValues {
    pub name: String,
    pub email: String,
}

/// A recipe plus its editor payload serialized for the page script.
#[derive(Debug, Clone)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub recipe_json: String,
}

/// The page-specific part of [`TemplateData`].
#[derive(Debug, Clone, Default)]
pub enum PageData {
    #[default]
    Empty,
    Recipes(Vec<Recipe>),
    Recipe(Box<RecipeView>),
    Credentials(CredentialValues),
}

/// Everything a page template can read.
///
/// Handlers fill `data`, `errors` and `is_author`; the renderer fills the
/// session-derived fields just before rendering.
#[derive(Debug, Clone, Default)]
pub struct TemplateData {
    pub data: PageData,
    pub errors: FormErrors,
    pub flash: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub current_user: Option<CurrentUser>,
    pub is_authenticated: bool,
    pub is_author: bool,
}

impl TemplateData {
    #[must_use]
    pub fn new(data: PageData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Attach field errors from a failed form submit.
    #[must_use]
    pub fn with_errors(mut self, errors: FormErrors) -> Self {
        self.errors = errors;
        self
    }
}
