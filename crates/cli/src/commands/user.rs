//! User management commands.

use recipe_box_core::{Email, UserId};
use recipe_box_web::db::{PgRepository, Repository};
use recipe_box_web::password::{self, MIN_PASSWORD_LENGTH};
use thiserror::Error;

/// Errors from validating command arguments.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),
}

/// Check arguments with the same rules as the signup form.
fn validate(name: &str, email: &str, password: &str) -> Result<Email, UserError> {
    if name.trim().is_empty() {
        return Err(UserError::EmptyName);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Email::parse(email).map_err(|_| UserError::InvalidEmail(email.to_owned()))
}

/// Create a user that can log in immediately.
///
/// Returns the new user's id.
pub async fn create(
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let email = validate(name, email, password)?;
    let hash = password::hash_password(password)?;

    let repo = PgRepository::new(super::connect().await?);

    tracing::info!("Creating user: {}", email);
    let user = repo.insert_user(name.trim(), &email, &hash).await?;

    tracing::info!("User created successfully! ID: {}, Email: {}", user.id, user.email);
    Ok(user.id)
}
