//! Core library for the Quillpad blogging service.
//!
//! This crate exposes the domain model, Diesel persistence layer, form
//! handling, HTTP routes and service layers used by the Quillpad web
//! application.

pub mod auth;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Number of posts shown per page on every listing view.
pub const POSTS_PER_PAGE: usize = 10;
