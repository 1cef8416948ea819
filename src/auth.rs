//! Requester identity, backed by an actix-identity cookie session.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::error::ResponseError;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, dev::Payload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::user::User;

/// Identity claims of the current requester, stored as JSON in the session
/// cookie. Handlers that take this extractor require authentication; public
/// handlers take `Option<AuthenticatedUser>` instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl AuthenticatedUser {
    /// Attach these claims to the session, signing the requester in.
    pub fn login(&self, request: &HttpRequest) -> Result<(), actix_web::Error> {
        let claims =
            serde_json::to_string(self).map_err(actix_web::error::ErrorInternalServerError)?;
        Identity::login(&request.extensions(), claims)?;
        Ok(())
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

/// Raised when a protected handler is hit without a valid session. Renders
/// as a redirect to the login page rather than a bare 401, carrying the
/// requested path so login can send the user back.
#[derive(Debug, Error)]
#[error("authentication required")]
pub struct LoginRequired {
    next: String,
}

impl LoginRequired {
    fn for_request(req: &HttpRequest) -> Self {
        let next = match req.query_string() {
            "" => req.path().to_string(),
            query => format!("{}?{query}", req.path()),
        };
        Self { next }
    }

    fn login_url(&self) -> String {
        format!("/auth/login?next={}", urlencoding::encode(&self.next))
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, self.login_url()))
            .finish()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Identity::from_request(req, payload)
            .into_inner()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|raw| serde_json::from_str(&raw).ok());

        ready(claims.ok_or_else(|| LoginRequired::for_request(req).into()))
    }
}
