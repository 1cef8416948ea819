use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentBody, CommentId, PostId, UserId};
use crate::domain::user::Author;

/// Canonical comment record. `post_id` is `None` once the parent post has
/// been deleted; the comment itself is retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: CommentBody,
    pub created_at: NaiveDateTime,
    pub author: Author,
    pub post_id: Option<PostId>,
}

/// Data required to insert a new [`Comment`].
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: CommentBody,
    pub author_id: UserId,
    pub post_id: PostId,
    pub created_at: NaiveDateTime,
}
