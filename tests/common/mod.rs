//! Helpers for integration tests.

use chrono::Utc;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::NamedTempFile;

use quillpad::db::{DbPool, establish_connection_pool};
use quillpad::domain::category::{Category, NewCategory};
use quillpad::domain::post::NewPost;
use quillpad::domain::types::{
    CategoryDescription, CategoryTitle, EmailAddress, PostBody, PostTitle, Slug, Username,
};
use quillpad::domain::user::{NewUser, User};
use quillpad::repository::{CategoryWriter, DieselRepository, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn create_user(repo: &DieselRepository, username: &str) -> User {
    repo.create_user(&NewUser {
        username: Username::new(username).expect("valid username"),
        email: EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "$argon2id$fake".to_string(),
        created_at: Utc::now().naive_utc(),
    })
    .expect("should create user")
}

pub fn create_category(repo: &DieselRepository, slug: &str, is_published: bool) -> Category {
    repo.create_category(&NewCategory {
        title: CategoryTitle::new(slug.to_uppercase()).expect("valid title"),
        description: CategoryDescription::new("A category").expect("valid description"),
        slug: Slug::new(slug).expect("valid slug"),
        is_published,
        created_at: Utc::now().naive_utc(),
    })
    .expect("should create category")
}

pub fn new_post(author: &User, slug: &str) -> NewPost {
    let now = Utc::now().naive_utc();
    NewPost {
        title: PostTitle::new("A post").expect("valid title"),
        text: PostBody::new("Some text").expect("valid body"),
        slug: Slug::new(slug).expect("valid slug"),
        pub_date: now,
        is_published: true,
        author_id: author.id,
        category_id: None,
        location_id: None,
        image: None,
        created_at: now,
    }
}
