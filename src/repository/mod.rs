use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory};
use crate::domain::comment::{Comment, NewComment};
use crate::domain::location::{Location, NewLocation};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{
    CategoryId, CommentBody, CommentId, LocationId, PostId, UserId,
};
use crate::domain::user::{NewUser, ProfileUpdate, User};
use crate::pagination::Pagination;

pub mod category;
pub mod comment;
pub mod errors;
pub mod location;
pub mod post;
pub mod user;

use errors::RepositoryResult;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    /// Restrict to posts by this author.
    pub author_id: Option<UserId>,
    /// Restrict to posts in this category.
    pub category_id: Option<CategoryId>,
    /// When set, apply the public visibility filter as of this instant:
    /// published posts with a published (or absent) category and
    /// `pub_date <= visible_at`.
    pub visible_at: Option<NaiveDateTime>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn visible_at(mut self, now: NaiveDateTime) -> Self {
        self.visible_at = Some(now);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for user entities.
pub trait UserReader {
    /// Retrieve a user by their identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    /// Retrieve a user by their unique username.
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// Retrieve a user together with their stored password hash.
    fn get_user_with_password(&self, username: &str)
    -> RepositoryResult<Option<(User, String)>>;
}

/// Write operations for user entities.
pub trait UserWriter {
    /// Persist a new user and return the stored record.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User>;
    /// Apply a profile update atomically and return the updated record.
    fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> RepositoryResult<User>;
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// Retrieve a category by its unique slug.
    fn get_category_by_slug(&self, slug: &str) -> RepositoryResult<Option<Category>>;
    /// List all categories ordered by title.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations for category entities. Creation happens through admin
/// tooling; deletion nullifies the category reference on dependent posts.
pub trait CategoryWriter {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<usize>;
}

/// Read-only operations for location entities.
pub trait LocationReader {
    /// List all locations ordered by name.
    fn list_locations(&self) -> RepositoryResult<Vec<Location>>;
}

/// Write operations for location entities.
pub trait LocationWriter {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location>;
}

/// Read-only operations for post entities. Posts come back with their
/// author, optional category/location and the comment count aggregate.
pub trait PostReader {
    /// List posts matching the supplied query, ordered by `pub_date`
    /// descending. Returns the unpaginated total alongside the page items.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)>;
    /// Retrieve a post by its identifier.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
}

/// Write operations for post entities.
pub trait PostWriter {
    /// Persist a new post and return the stored record.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Apply field changes to a post.
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize>;
    /// Delete a post. Dependent comments are retained with their post
    /// reference nulled.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for comment entities.
pub trait CommentReader {
    /// List the comments of a post ordered by creation time ascending.
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>>;
    /// Retrieve a comment by the composite (post, comment) key. Returns
    /// `None` when the comment does not belong to that post.
    fn get_comment_by_id(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> RepositoryResult<Option<Comment>>;
}

/// Write operations for comment entities.
pub trait CommentWriter {
    /// Persist a new comment and return the stored record.
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment>;
    /// Replace a comment's text. The creation timestamp is immutable.
    fn update_comment(&self, id: CommentId, text: &CommentBody) -> RepositoryResult<usize>;
    /// Delete a comment.
    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize>;
}
