use chrono::Utc;

use crate::POSTS_PER_PAGE;
use crate::domain::post::Post;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{PostListQuery, PostReader};

use super::{ServiceError, ServiceResult};

/// Core business logic for the index page: publicly visible posts ordered by
/// publication date descending, annotated with comment counts.
pub fn show_index<R>(page: usize, repo: &R) -> ServiceResult<Paginated<Post>>
where
    R: PostReader,
{
    let now = Utc::now().naive_utc();
    let query = PostListQuery::new()
        .visible_at(now)
        .paginate(page, POSTS_PER_PAGE);

    match repo.list_posts(query) {
        Ok((total, posts)) => Ok(Paginated::new(
            posts,
            total,
            Pagination {
                page,
                per_page: POSTS_PER_PAGE,
            },
        )),
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::post::{Post, PostCategory};
    use crate::domain::types::{
        CategoryDescription, CategoryId, CategoryTitle, PostBody, PostId, PostTitle, Slug, UserId,
        Username,
    };
    use crate::domain::user::Author;
    use crate::repository::test::TestRepository;
    use chrono::{Duration, NaiveDateTime};

    fn news_category() -> Category {
        Category {
            id: CategoryId::new(1).unwrap(),
            title: CategoryTitle::new("News").unwrap(),
            description: CategoryDescription::new("All the news").unwrap(),
            slug: Slug::new("news").unwrap(),
            is_published: true,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn post_by_alice(id: i32, pub_date: NaiveDateTime, category: Option<&Category>) -> Post {
        Post {
            id: PostId::new(id).unwrap(),
            title: PostTitle::new("Hi").unwrap(),
            text: PostBody::new("Body").unwrap(),
            slug: Slug::new("hi").unwrap(),
            pub_date,
            is_published: true,
            created_at: pub_date,
            author: Author {
                id: UserId::new(1).unwrap(),
                username: Username::new("alice").unwrap(),
            },
            category: category.map(|c| PostCategory {
                id: c.id,
                title: c.title.clone(),
                slug: c.slug.clone(),
                is_published: c.is_published,
            }),
            location: None,
            image: None,
            comment_count: 0,
        }
    }

    #[test]
    fn yesterday_dated_published_post_appears_on_the_index() {
        let category = news_category();
        let yesterday = Utc::now().naive_utc() - Duration::days(1);
        let repo = TestRepository::new()
            .with_categories(vec![category.clone()])
            .with_posts(vec![post_by_alice(1, yesterday, Some(&category))]);

        let page = show_index(1, &repo).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, PostId::new(1).unwrap());
        assert_eq!(page.items[0].comment_count, 0);
    }

    #[test]
    fn future_dated_post_is_absent_from_the_index() {
        let tomorrow = Utc::now().naive_utc() + Duration::days(1);
        let repo = TestRepository::new().with_posts(vec![post_by_alice(1, tomorrow, None)]);

        let page = show_index(1, &repo).unwrap();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn post_in_unpublished_category_is_hidden() {
        let mut category = news_category();
        category.is_published = false;
        let yesterday = Utc::now().naive_utc() - Duration::days(1);
        let repo = TestRepository::new()
            .with_categories(vec![category.clone()])
            .with_posts(vec![post_by_alice(1, yesterday, Some(&category))]);

        let page = show_index(1, &repo).unwrap();
        assert_eq!(page.total, 0);
    }

    #[test]
    fn page_past_the_end_shows_the_last_page() {
        let now = Utc::now().naive_utc();
        let repo = TestRepository::new().with_posts(vec![
            post_by_alice(1, now - Duration::days(3), None),
            post_by_alice(2, now - Duration::days(1), None),
            post_by_alice(3, now - Duration::days(2), None),
        ]);

        let page = show_index(999, &repo).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 3);
    }

    #[test]
    fn index_orders_by_pub_date_descending() {
        let now = Utc::now().naive_utc();
        let repo = TestRepository::new().with_posts(vec![
            post_by_alice(1, now - Duration::days(3), None),
            post_by_alice(2, now - Duration::days(1), None),
            post_by_alice(3, now - Duration::days(2), None),
        ]);

        let page = show_index(1, &repo).unwrap();
        let ids: Vec<i32> = page.items.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
