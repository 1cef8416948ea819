use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::comment::{Comment as DomainComment, NewComment as DomainNewComment};
use crate::domain::types::{CommentBody, TypeConstraintError, Username};
use crate::domain::user::Author;
use crate::models::user::User as DbUser;

/// Diesel model representing the `comments` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::comments)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub post_id: Option<i32>,
}

/// Insertable form of [`Comment`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub post_id: Option<i32>,
}

impl TryFrom<(Comment, DbUser)> for DomainComment {
    type Error = TypeConstraintError;

    fn try_from((comment, author): (Comment, DbUser)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: comment.id.try_into()?,
            text: CommentBody::new(comment.text)?,
            created_at: comment.created_at,
            author: Author {
                id: author.id.try_into()?,
                username: Username::new(author.username)?,
            },
            post_id: comment.post_id.map(TryInto::try_into).transpose()?,
        })
    }
}

impl From<DomainNewComment> for NewComment {
    fn from(comment: DomainNewComment) -> Self {
        Self {
            text: comment.text.into_inner(),
            created_at: comment.created_at,
            author_id: comment.author_id.get(),
            post_id: Some(comment.post_id.get()),
        }
    }
}
