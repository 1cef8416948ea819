use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::user::ProfileUpdate;
use crate::forms::profile::ProfileForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::profile::{
    show_profile as show_profile_service, update_profile as update_profile_service,
};

#[derive(Deserialize)]
struct PageQueryParams {
    page: Option<usize>,
}

#[get("/profile/{username}")]
pub async fn show_profile(
    username: web::Path<String>,
    params: web::Query<PageQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match show_profile_service(&username, page, user.as_ref(), repo.get_ref()) {
        Ok((profile, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "profile");
            context.insert("profile", &profile);
            context.insert("page", &posts);
            render_template(&tera, "profile/index.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile/edit")]
pub async fn edit_profile_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, Some(&user), "profile_edit");
    render_template(&tera, "profile/edit.html", &context)
}

#[post("/profile/edit")]
pub async fn update_profile(
    request: HttpRequest,
    form: web::Form<ProfileForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let update = match ProfileUpdate::try_from(form.into_inner()) {
        Ok(update) => update,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/profile/edit");
        }
    };
    match update_profile_service(update, &user, repo.get_ref()) {
        Ok(updated) => {
            // Refresh the session claims so the new username shows up right away.
            let claims = AuthenticatedUser::from(&updated);
            if let Err(e) = claims.login(&request) {
                log::error!("Failed to refresh session claims: {e}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Profile updated.").send();
            redirect(&format!("/profile/{}", updated.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/profile/edit")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
