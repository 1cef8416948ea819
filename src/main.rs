use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_flash_messages::storage::CookieMessageStore;
use env_logger::Env;
use tera::Tera;

use quillpad::db::establish_connection_pool;
use quillpad::models::config::ServerConfig;
use quillpad::repository::DieselRepository;
use quillpad::routes::auth::{login, login_form, logout, signup, signup_form};
use quillpad::routes::comments::{
    add_comment, delete_comment, delete_comment_form, edit_comment_form, update_comment,
};
use quillpad::routes::main::{index, show_category};
use quillpad::routes::posts::{
    create_post, create_post_form, delete_post, delete_post_form, edit_post_form, show_post,
    update_post,
};
use quillpad::routes::profile::{edit_profile_form, show_profile, update_profile};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;

    let pool = establish_connection_pool(&server_config.database_url)
        .map_err(|e| std::io::Error::other(format!("failed to create database pool: {e}")))?;
    let repo = DieselRepository::new(pool);

    let tera = Tera::new("templates/**/*.html")
        .map_err(|e| std::io::Error::other(format!("failed to load templates: {e}")))?;

    let secret_key = Key::derive_from(server_config.secret_key.as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = server_config.bind_address.clone();
    log::info!("Starting server at http://{bind_address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .wrap(IdentityMiddleware::default())
            .wrap(message_framework.clone())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .service(index)
            .service(show_category)
            .service(login_form)
            .service(login)
            .service(signup_form)
            .service(signup)
            .service(logout)
            // Literal segments must be registered before their sibling
            // parameterized routes.
            .service(edit_profile_form)
            .service(update_profile)
            .service(show_profile)
            .service(create_post_form)
            .service(create_post)
            .service(show_post)
            .service(edit_post_form)
            .service(update_post)
            .service(delete_post_form)
            .service(delete_post)
            .service(add_comment)
            .service(edit_comment_form)
            .service(update_comment)
            .service(delete_comment_form)
            .service(delete_comment)
            .service(Files::new("/static", "./static"))
            .service(Files::new("/media", server_config.media_root.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
