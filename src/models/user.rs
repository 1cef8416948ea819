use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};
use crate::domain::user::{NewUser as DomainNewUser, ProfileUpdate, User as DomainUser};

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Changeset applied when a user edits their own profile.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UserProfileChangeset {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            username: Username::new(user.username)?,
            email: EmailAddress::new(user.email)?,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            username: user.username.into_inner(),
            email: user.email.into_inner(),
            first_name: user.first_name,
            last_name: user.last_name,
            password_hash: user.password_hash,
            created_at: user.created_at,
        }
    }
}

impl From<ProfileUpdate> for UserProfileChangeset {
    fn from(update: ProfileUpdate) -> Self {
        Self {
            username: update.username.into_inner(),
            email: update.email.into_inner(),
            first_name: update.first_name,
            last_name: update.last_name,
        }
    }
}
