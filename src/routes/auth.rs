use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, LoginFormPayload, SignupForm, SignupFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{signin as signin_service, signup as signup_service};

#[derive(Deserialize)]
pub struct NextParams {
    next: Option<String>,
}

/// Only same-site paths are followed after login; anything else falls back
/// to the index so the `next` parameter cannot redirect off-site.
fn local_redirect_target(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Login URL that keeps the intended destination across a failed attempt.
fn login_url(next: &str) -> String {
    if next == "/" {
        "/auth/login".to_string()
    } else {
        format!("/auth/login?next={}", urlencoding::encode(next))
    }
}

#[get("/auth/login")]
pub async fn login_form(
    user: Option<AuthenticatedUser>,
    params: web::Query<NextParams>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let mut context = base_context(&flash_messages, None, "login");
    let next = local_redirect_target(params.next.as_deref());
    if next != "/" {
        context.insert("next", &next);
    }
    render_template(&tera, "auth/login.html", &context)
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    form: web::Form<LoginForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let form = form.into_inner();
    let next = local_redirect_target(form.next.as_deref());
    let payload = match LoginFormPayload::try_from(form) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&login_url(&next));
        }
    };
    match signin_service(payload, repo.get_ref()) {
        Ok(user) => {
            let claims = AuthenticatedUser::from(&user);
            if let Err(e) = claims.login(&request) {
                log::error!("Failed to establish session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect(&next)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&login_url(&next))
        }
        Err(err) => {
            log::error!("Failed to sign user in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/auth/signup")]
pub async fn signup_form(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "signup");
    render_template(&tera, "auth/signup.html", &context)
}

#[post("/auth/signup")]
pub async fn signup(
    request: HttpRequest,
    form: web::Form<SignupForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match SignupFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/auth/signup");
        }
    };
    match signup_service(payload, repo.get_ref()) {
        Ok(user) => {
            // Sign the fresh account in right away.
            let claims = AuthenticatedUser::from(&user);
            if let Err(e) = claims.login(&request) {
                log::error!("Failed to establish session: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Welcome!").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/auth/signup")
        }
        Err(err) => {
            log::error!("Failed to sign user up: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
