use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::post::{
    NewPost as DomainNewPost, Post as DomainPost, PostCategory, PostLocation,
    PostUpdate as DomainPostUpdate,
};
use crate::domain::types::{
    CategoryTitle, LocationName, PostBody, PostTitle, Slug, TypeConstraintError, Username,
};
use crate::domain::user::Author;
use crate::models::category::Category as DbCategory;
use crate::models::location::Location as DbLocation;
use crate::models::user::User as DbUser;

/// Diesel model representing the `posts` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

/// Insertable form of [`Post`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

/// Changeset applied when the author edits a post. `treat_none_as_null` is
/// required so clearing the category/location actually writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts, treat_none_as_null = true)]
pub struct PostChangeset {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

/// Row set a post listing query produces: the post joined with its author
/// and optional category/location, plus the comment count aggregate.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: Post,
    pub author: DbUser,
    pub category: Option<DbCategory>,
    pub location: Option<DbLocation>,
    pub comment_count: i64,
}

impl TryFrom<PostRecord> for DomainPost {
    type Error = TypeConstraintError;

    fn try_from(record: PostRecord) -> Result<Self, Self::Error> {
        let category = record
            .category
            .map(|c| {
                Ok::<_, TypeConstraintError>(PostCategory {
                    id: c.id.try_into()?,
                    title: CategoryTitle::new(c.title)?,
                    slug: Slug::new(c.slug)?,
                    is_published: c.is_published,
                })
            })
            .transpose()?;
        let location = record
            .location
            .map(|l| {
                Ok::<_, TypeConstraintError>(PostLocation {
                    id: l.id.try_into()?,
                    name: LocationName::new(l.name)?,
                    is_published: l.is_published,
                })
            })
            .transpose()?;

        Ok(Self {
            id: record.post.id.try_into()?,
            title: PostTitle::new(record.post.title)?,
            text: PostBody::new(record.post.text)?,
            slug: Slug::new(record.post.slug)?,
            pub_date: record.post.pub_date,
            is_published: record.post.is_published,
            created_at: record.post.created_at,
            author: Author {
                id: record.author.id.try_into()?,
                username: Username::new(record.author.username)?,
            },
            category,
            location,
            image: record.post.image,
            comment_count: record.comment_count,
        })
    }
}

impl From<DomainNewPost> for NewPost {
    fn from(post: DomainNewPost) -> Self {
        Self {
            title: post.title.into_inner(),
            text: post.text.into_inner(),
            slug: post.slug.into_inner(),
            pub_date: post.pub_date,
            is_published: post.is_published,
            created_at: post.created_at,
            author_id: post.author_id.get(),
            location_id: post.location_id.map(|id| id.get()),
            category_id: post.category_id.map(|id| id.get()),
            image: post.image,
        }
    }
}

impl From<DomainPostUpdate> for PostChangeset {
    fn from(update: DomainPostUpdate) -> Self {
        Self {
            title: update.title.into_inner(),
            text: update.text.into_inner(),
            slug: update.slug.into_inner(),
            pub_date: update.pub_date,
            is_published: update.is_published,
            location_id: update.location_id.map(|id| id.get()),
            category_id: update.category_id.map(|id| id.get()),
            image: update.image,
        }
    }
}
