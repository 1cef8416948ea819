use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::main::show_index as show_index_service;
use crate::services::posts::show_category as show_category_service;

#[derive(Deserialize)]
struct PageQueryParams {
    page: Option<usize>,
}

#[get("/")]
pub async fn index(
    params: web::Query<PageQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match show_index_service(page, repo.get_ref()) {
        Ok(posts) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("page", &posts);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{slug}")]
pub async fn show_category(
    slug: web::Path<String>,
    params: web::Query<PageQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match show_category_service(&slug, page, repo.get_ref()) {
        Ok((category, posts)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "category");
            context.insert("category", &category);
            context.insert("page", &posts);
            render_template(&tera, "category/index.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
