use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, UserId, Username};

/// Canonical user record. Credentials are kept out of this struct so it can
/// be handed to templates safely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub created_at: NaiveDateTime,
}

/// Minimal author reference embedded in posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub username: Username,
}

impl From<&User> for Author {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Data required to insert a new [`User`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Editable identity fields of a user's own profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
}
