use std::path::Path;

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::types::PostId;
use crate::forms::posts::PostForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::posts::{
    create_post as create_post_service, delete_post as delete_post_service,
    post_form_options as post_form_options_service, show_own_post as show_own_post_service,
    show_post as show_post_service, update_post as update_post_service,
};

#[get("/posts/{post_id}")]
pub async fn show_post(
    post_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    match show_post_service(post_id, user.as_ref(), repo.get_ref()) {
        Ok((post, comments)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "post");
            context.insert("post", &post);
            context.insert("comments", &comments);
            render_template(&tera, "posts/detail.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to render post detail: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/create")]
pub async fn create_post_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match post_form_options_service(repo.get_ref()) {
        Ok((categories, locations)) => {
            let mut context = base_context(&flash_messages, Some(&user), "post_form");
            context.insert("categories", &categories);
            context.insert("locations", &locations);
            render_template(&tera, "posts/form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render post form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/create")]
pub async fn create_post(
    MultipartForm(form): MultipartForm<PostForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let payload = match form.into_payload(Path::new(&server_config.media_root)) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/posts/create");
        }
    };
    match create_post_service(payload, &user, repo.get_ref()) {
        Ok(_) => {
            FlashMessage::success("Post created.").send();
            redirect(&format!("/profile/{}", user.username))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/posts/create")
        }
        Err(err) => {
            log::error!("Failed to create post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/edit")]
pub async fn edit_post_form(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let post = match show_own_post_service(post_id, &user, repo.get_ref()) {
        Ok(post) => post,
        Err(ServiceError::NotFound) => return HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => return HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to load post for editing: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    match post_form_options_service(repo.get_ref()) {
        Ok((categories, locations)) => {
            let mut context = base_context(&flash_messages, Some(&user), "post_form");
            context.insert("post", &post);
            context.insert("categories", &categories);
            context.insert("locations", &locations);
            render_template(&tera, "posts/form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render post edit form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/edit")]
pub async fn update_post(
    post_id: web::Path<i32>,
    MultipartForm(form): MultipartForm<PostForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    let payload = match form.into_payload(Path::new(&server_config.media_root)) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(&format!("/posts/{post_id}/edit"));
        }
    };
    match update_post_service(post_id, payload, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post updated.").send();
            redirect(&format!("/posts/{post_id}"))
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/posts/{post_id}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/posts/{post_id}/delete")]
pub async fn delete_post_form(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    match show_own_post_service(post_id, &user, repo.get_ref()) {
        Ok(post) => {
            let mut context = base_context(&flash_messages, Some(&user), "post_delete");
            context.insert("post", &post);
            render_template(&tera, "posts/confirm_delete.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to load post for deletion: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/posts/{post_id}/delete")]
pub async fn delete_post(
    post_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let Ok(post_id) = PostId::new(post_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };
    match delete_post_service(post_id, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Post deleted.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(err) => {
            log::error!("Failed to delete post: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
