use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, CategoryTitle, LocationId, LocationName, PostBody, PostId, PostTitle, Slug, UserId,
};
use crate::domain::user::Author;

/// Category fields a post listing needs: enough to render a link and to
/// evaluate the visibility predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCategory {
    pub id: CategoryId,
    pub title: CategoryTitle,
    pub slug: Slug,
    pub is_published: bool,
}

/// Location fields embedded in a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLocation {
    pub id: LocationId,
    pub name: LocationName,
    pub is_published: bool,
}

/// Canonical post record with its author, optional category/location and the
/// query-time comment count aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub text: PostBody,
    pub slug: Slug,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author: Author,
    pub category: Option<PostCategory>,
    pub location: Option<PostLocation>,
    pub image: Option<String>,
    /// Number of comments currently referencing this post. Computed as an
    /// aggregate at query time, never stored.
    pub comment_count: i64,
}

impl Post {
    /// Whether the post may appear on public listings at `now`.
    ///
    /// A post with a deleted category (`category == None`) satisfies the
    /// published-category condition vacuously. The `pub_date` comparison is
    /// inclusive: a post dated exactly `now` is visible.
    pub fn is_publicly_visible(&self, now: NaiveDateTime) -> bool {
        self.is_published
            && self.category.as_ref().is_none_or(|c| c.is_published)
            && self.pub_date <= now
    }

    /// Whether the post may be shown on its detail page to `viewer`. Authors
    /// may always preview their own unpublished or future-dated posts.
    pub fn is_visible_to(&self, viewer: Option<UserId>, now: NaiveDateTime) -> bool {
        self.is_publicly_visible(now) || viewer == Some(self.author.id)
    }
}

/// Data required to insert a new [`Post`].
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: PostTitle,
    pub text: PostBody,
    pub slug: Slug,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub author_id: UserId,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub image: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Field changes applied when the author edits a post. `created_at` and the
/// author are immutable.
#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: PostTitle,
    pub text: PostBody,
    pub slug: Slug,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub category_id: Option<CategoryId>,
    pub location_id: Option<LocationId>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Username;
    use chrono::{DateTime, Duration};

    fn now() -> NaiveDateTime {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc()
    }

    fn sample_post() -> Post {
        Post {
            id: PostId::new(1).unwrap(),
            title: PostTitle::new("Hi").unwrap(),
            text: PostBody::new("Body").unwrap(),
            slug: Slug::new("hi").unwrap(),
            pub_date: now() - Duration::days(1),
            is_published: true,
            created_at: now() - Duration::days(1),
            author: Author {
                id: UserId::new(1).unwrap(),
                username: Username::new("alice").unwrap(),
            },
            category: Some(PostCategory {
                id: CategoryId::new(1).unwrap(),
                title: CategoryTitle::new("News").unwrap(),
                slug: Slug::new("news").unwrap(),
                is_published: true,
            }),
            location: None,
            image: None,
            comment_count: 0,
        }
    }

    #[test]
    fn published_past_post_is_publicly_visible() {
        assert!(sample_post().is_publicly_visible(now()));
    }

    #[test]
    fn pub_date_equal_to_now_is_visible() {
        let mut post = sample_post();
        post.pub_date = now();
        assert!(post.is_publicly_visible(now()));
    }

    #[test]
    fn future_dated_post_is_hidden_from_public() {
        let mut post = sample_post();
        post.pub_date = now() + Duration::days(1);
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn unpublished_category_hides_the_post() {
        let mut post = sample_post();
        post.category.as_mut().unwrap().is_published = false;
        assert!(!post.is_publicly_visible(now()));
    }

    #[test]
    fn deleted_category_satisfies_the_condition_vacuously() {
        let mut post = sample_post();
        post.category = None;
        assert!(post.is_publicly_visible(now()));
    }

    #[test]
    fn author_previews_hidden_posts() {
        let mut post = sample_post();
        post.is_published = false;
        let author = Some(post.author.id);
        let other = Some(UserId::new(2).unwrap());
        assert!(post.is_visible_to(author, now()));
        assert!(!post.is_visible_to(other, now()));
        assert!(!post.is_visible_to(None, now()));
    }
}
