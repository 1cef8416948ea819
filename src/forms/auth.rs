use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Destination to return to after a successful login.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone)]
pub struct SignupFormPayload {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Error)]
pub enum AuthFormError {
    #[error("Form validation failed: {0}")]
    Validation(String),
    #[error("Form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AuthFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AuthFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = AuthFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
        })
    }
}

impl TryFrom<SignupForm> for SignupFormPayload {
    type Error = AuthFormError;

    fn try_from(value: SignupForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            email: EmailAddress::new(value.email)?,
            password: value.password,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_requires_a_minimum_password_length() {
        let form = SignupForm {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "short".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(SignupFormPayload::try_from(form).is_err());
    }
}
