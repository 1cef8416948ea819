use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{EmailAddress, TypeConstraintError, Username};
use crate::domain::user::ProfileUpdate;

#[derive(Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Error)]
pub enum ProfileFormError {
    #[error("Profile form validation failed: {0}")]
    Validation(String),
    #[error("Profile form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ProfileFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProfileFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ProfileForm> for ProfileUpdate {
    type Error = ProfileFormError;

    fn try_from(value: ProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            email: EmailAddress::new(value.email)?,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
        })
    }
}
