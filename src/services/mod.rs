pub mod auth;
pub mod comments;
pub mod errors;
pub mod main;
pub mod posts;
pub mod profile;

pub use errors::{ServiceError, ServiceResult};

use crate::auth::AuthenticatedUser;
use crate::domain::types::UserId;

/// Resolve the acting user's id from session claims.
pub(crate) fn acting_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    UserId::new(user.id).map_err(|e| {
        log::error!("Invalid user id in session claims: {e}");
        ServiceError::Internal
    })
}

/// Authorization check shared by every mutating operation: only the author
/// of a resource may change it.
pub(crate) fn ensure_author(owner: UserId, acting: UserId) -> ServiceResult<()> {
    if owner == acting {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
