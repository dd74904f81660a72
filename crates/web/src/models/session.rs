//! Session-related types.
//!
//! Types stored in the session for authentication state and one-shot messages.

use serde::{Deserialize, Serialize};

use recipe_box_core::{Email, UserId};

use super::user::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Display name shown in the navigation bar.
    pub name: String,
    /// User's email address. Compared against recipe owners for the author flag.
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const USER: &str = "user";

    /// Key for the one-shot success message.
    pub const FLASH: &str = "flash";

    /// Key for the one-shot error message.
    pub const ERROR: &str = "error";

    /// Key for the one-shot warning message.
    pub const WARNING: &str = "warning";
}
