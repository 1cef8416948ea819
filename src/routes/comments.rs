use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::{CommentId, PostId};
use crate::forms::comments::{CommentForm, CommentFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::comments::{
    add_comment as add_comment_service, delete_comment as delete_comment_service,
    show_own_comment as show_own_comment_service, update_comment as update_comment_service,
};

fn parse_comment_path(post_id: i32, comment_id: i32) -> Option<(PostId, CommentId)> {
    Some((PostId::new(post_id).ok()?, CommentId::new(comment_id).ok()?))
}

#[post("/posts/{post_id}/comment")]
pub async fn add_comment(
    post_id: web::Path<i32>,
    form: web::Form<CommentForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let payload = match CommentFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("/posts/{post_id}"));
        }
    };
    match add_comment_service(post_id, payload, &user, repo.get_ref()) {
        Ok(_) => redirect(&format!("/posts/{post_id}")),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}"))
        }
        Err(err) => {
            log::error!("Failed to add comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/edit_comment/{comment_id}")]
pub async fn edit_comment_form(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Some((post_id, comment_id)) = parse_comment_path(raw_post_id, raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };
    match show_own_comment_service(post_id, comment_id, &user, repo.get_ref()) {
        Ok(comment) => {
            let mut context = base_context(&flash_messages, Some(&user), "comment_form");
            context.insert("comment", &comment);
            context.insert("post_id", &post_id);
            render_template(&tera, "comments/form.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to load comment for editing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/edit_comment/{comment_id}")]
pub async fn update_comment(
    path: web::Path<(i32, i32)>,
    form: web::Form<CommentForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Some((post_id, comment_id)) = parse_comment_path(raw_post_id, raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };
    let payload = match CommentFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("/posts/{post_id}/edit_comment/{comment_id}"));
        }
    };
    match update_comment_service(post_id, comment_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Comment updated.").send();
            redirect(&format!("/posts/{post_id}"))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}/edit_comment/{comment_id}"))
        }
        Err(err) => {
            log::error!("Failed to update comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/delete_comment/{comment_id}")]
pub async fn delete_comment_form(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Some((post_id, comment_id)) = parse_comment_path(raw_post_id, raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };
    match show_own_comment_service(post_id, comment_id, &user, repo.get_ref()) {
        Ok(comment) => {
            let mut context = base_context(&flash_messages, Some(&user), "comment_delete");
            context.insert("comment", &comment);
            context.insert("post_id", &post_id);
            render_template(&tera, "comments/confirm_delete.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to load comment for deletion: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/delete_comment/{comment_id}")]
pub async fn delete_comment(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (raw_post_id, raw_comment_id) = path.into_inner();
    let Some((post_id, comment_id)) = parse_comment_path(raw_post_id, raw_comment_id) else {
        return HttpResponse::NotFound().finish();
    };
    match delete_comment_service(post_id, comment_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Comment deleted.").send();
            redirect(&format!("/posts/{post_id}"))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to delete comment: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
