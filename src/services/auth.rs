use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;

use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginFormPayload, SignupFormPayload};
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

const BAD_CREDENTIALS: &str = "Invalid username or password.";

/// Register a new account. The password is stored as an Argon2 hash.
pub fn signup<R>(payload: SignupFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserWriter,
{
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })?
        .to_string();

    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_user(&new_user) {
        Ok(user) => Ok(user),
        Err(e) if e.is_unique_violation() => Err(ServiceError::Form(
            "That username is already taken.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to create user: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Verify credentials and return the matching user. Unknown usernames and
/// wrong passwords produce the same message.
pub fn signin<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<User>
where
    R: UserReader,
{
    let (user, stored_hash) = match repo.get_user_with_password(payload.username.as_str()) {
        Ok(Some(found)) => found,
        Ok(None) => return Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Failed to look up user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let parsed = PasswordHash::new(&stored_hash).map_err(|e| {
        log::error!("Stored password hash is malformed: {e}");
        ServiceError::Internal
    })?;

    match Argon2::default().verify_password(payload.password.as_bytes(), &parsed) {
        Ok(()) => Ok(user),
        Err(_) => Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EmailAddress, Username};
    use crate::repository::test::TestRepository;

    fn signup_payload(username: &str, password: &str) -> SignupFormPayload {
        SignupFormPayload {
            username: Username::new(username).unwrap(),
            email: EmailAddress::new(format!("{username}@example.com")).unwrap(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    fn login_payload(username: &str, password: &str) -> LoginFormPayload {
        LoginFormPayload {
            username: Username::new(username).unwrap(),
            password: password.to_string(),
        }
    }

    #[test]
    fn signup_then_signin_roundtrip() {
        let repo = TestRepository::new();
        let created = signup(signup_payload("alice", "correct horse"), &repo).unwrap();

        let user = signin(login_payload("alice", "correct horse"), &repo).unwrap();
        assert_eq!(user.id, created.id);
    }

    #[test]
    fn wrong_password_is_rejected_with_a_generic_message() {
        let repo = TestRepository::new();
        signup(signup_payload("alice", "correct horse"), &repo).unwrap();

        let err = signin(login_payload("alice", "wrong"), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Form(BAD_CREDENTIALS.to_string()));
    }

    #[test]
    fn unknown_username_gets_the_same_message_as_a_wrong_password() {
        let repo = TestRepository::new();
        let err = signin(login_payload("ghost", "whatever"), &repo).unwrap_err();
        assert_eq!(err, ServiceError::Form(BAD_CREDENTIALS.to_string()));
    }

    #[test]
    fn password_is_not_stored_in_clear_text() {
        let repo = TestRepository::new();
        signup(signup_payload("alice", "correct horse"), &repo).unwrap();

        let (_, hash) = repo.get_user_with_password("alice").unwrap().unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn duplicate_username_is_reported_as_taken() {
        let repo = TestRepository::new();
        signup(signup_payload("alice", "correct horse"), &repo).unwrap();

        let err = signup(signup_payload("alice", "another pass"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }
}
