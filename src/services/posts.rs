use chrono::Utc;

use crate::POSTS_PER_PAGE;
use crate::auth::AuthenticatedUser;
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::location::Location;
use crate::domain::post::Post;
use crate::domain::types::PostId;
use crate::forms::posts::PostFormPayload;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{
    CategoryReader, CommentReader, LocationReader, PostListQuery, PostReader, PostWriter,
};

use super::{ServiceError, ServiceResult, acting_user_id, ensure_author};

/// Post detail page: the post plus its comments ordered by creation time.
/// Hidden posts resolve as not-found for everyone but their author.
pub fn show_post<R>(
    post_id: PostId,
    viewer: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<(Post, Vec<Comment>)>
where
    R: PostReader + CommentReader,
{
    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let viewer_id = viewer.and_then(|u| acting_user_id(u).ok());
    if !post.is_visible_to(viewer_id, Utc::now().naive_utc()) {
        return Err(ServiceError::NotFound);
    }

    match repo.list_comments(post.id) {
        Ok(comments) => Ok((post, comments)),
        Err(e) => {
            log::error!("Failed to list comments: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Category listing: 404 unless the category exists and is itself published.
pub fn show_category<R>(
    slug: &str,
    page: usize,
    repo: &R,
) -> ServiceResult<(Category, Paginated<Post>)>
where
    R: CategoryReader + PostReader,
{
    let category = match repo.get_category_by_slug(slug) {
        Ok(Some(category)) => category,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            return Err(ServiceError::Internal);
        }
    };
    if !category.is_published {
        return Err(ServiceError::NotFound);
    }

    let query = PostListQuery::new()
        .in_category(category.id)
        .visible_at(Utc::now().naive_utc())
        .paginate(page, POSTS_PER_PAGE);

    match repo.list_posts(query) {
        Ok((total, posts)) => Ok((
            category,
            Paginated::new(
                posts,
                total,
                Pagination {
                    page,
                    per_page: POSTS_PER_PAGE,
                },
            ),
        )),
        Err(e) => {
            log::error!("Failed to list posts in category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Category and location choices for the post form selects.
pub fn post_form_options<R>(repo: &R) -> ServiceResult<(Vec<Category>, Vec<Location>)>
where
    R: CategoryReader + LocationReader,
{
    let categories = match repo.list_categories() {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Err(ServiceError::Internal);
        }
    };
    let locations = match repo.list_locations() {
        Ok(locations) => locations,
        Err(e) => {
            log::error!("Failed to list locations: {e}");
            return Err(ServiceError::Internal);
        }
    };
    Ok((categories, locations))
}

pub fn create_post<R>(
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostWriter,
{
    let author_id = acting_user_id(user)?;

    match repo.create_post(&payload.into_new_post(author_id)) {
        Ok(post) => Ok(post),
        Err(e) => {
            log::error!("Failed to create post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a post for its edit or delete-confirmation form, enforcing the
/// author-only rule up front.
pub fn show_own_post<R>(
    post_id: PostId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Post>
where
    R: PostReader,
{
    let acting = acting_user_id(user)?;

    let post = match repo.get_post_by_id(post_id) {
        Ok(Some(post)) => post,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    };
    ensure_author(post.author.id, acting)?;
    Ok(post)
}

pub fn update_post<R>(
    post_id: PostId,
    payload: PostFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let post = show_own_post(post_id, user, repo)?;

    // An edit without a new upload keeps the stored image.
    let mut update = payload.into_post_update();
    if update.image.is_none() {
        update.image = post.image.clone();
    }

    match repo.update_post(post.id, &update) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_post<R>(post_id: PostId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let post = show_own_post(post_id, user, repo)?;

    match repo.delete_post(post.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::post::PostCategory;
    use crate::domain::types::{
        CategoryDescription, CategoryId, CategoryTitle, EmailAddress, PostBody, PostTitle, Slug,
        UserId, Username,
    };
    use crate::domain::user::{Author, User};
    use crate::repository::test::TestRepository;
    use chrono::Duration;

    fn sample_user(id: i32, username: &str) -> User {
        User {
            id: UserId::new(id).unwrap(),
            username: Username::new(username).unwrap(),
            email: EmailAddress::new(format!("{username}@example.com")).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: Utc::now().naive_utc(),
        }
    }

    fn news_category(is_published: bool) -> Category {
        Category {
            id: CategoryId::new(1).unwrap(),
            title: CategoryTitle::new("News").unwrap(),
            description: CategoryDescription::new("All the news").unwrap(),
            slug: Slug::new("news").unwrap(),
            is_published,
            created_at: Utc::now().naive_utc(),
        }
    }

    fn post_by(author: &User, id: i32, days_ago: i64, is_published: bool) -> Post {
        let pub_date = Utc::now().naive_utc() - Duration::days(days_ago);
        Post {
            id: PostId::new(id).unwrap(),
            title: PostTitle::new("Hi").unwrap(),
            text: PostBody::new("Body").unwrap(),
            slug: Slug::new("hi").unwrap(),
            pub_date,
            is_published,
            created_at: pub_date,
            author: Author::from(author),
            category: None,
            location: None,
            image: None,
            comment_count: 0,
        }
    }

    fn sample_payload() -> PostFormPayload {
        PostFormPayload {
            title: PostTitle::new("Edited").unwrap(),
            text: PostBody::new("Edited body").unwrap(),
            slug: Slug::new("edited").unwrap(),
            pub_date: Utc::now().naive_utc() - Duration::days(1),
            is_published: true,
            category_id: None,
            location_id: None,
            image: None,
        }
    }

    #[test]
    fn future_post_is_visible_to_its_author_only() {
        let alice = sample_user(1, "alice");
        let bob = sample_user(2, "bob");
        let mut post = post_by(&alice, 1, 0, true);
        post.pub_date = Utc::now().naive_utc() + Duration::days(1);
        let repo = TestRepository::new()
            .with_users(vec![alice.clone(), bob.clone()])
            .with_posts(vec![post]);

        let alice_claims = AuthenticatedUser::from(&alice);
        let bob_claims = AuthenticatedUser::from(&bob);

        assert!(show_post(PostId::new(1).unwrap(), Some(&alice_claims), &repo).is_ok());
        assert_eq!(
            show_post(PostId::new(1).unwrap(), Some(&bob_claims), &repo).unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            show_post(PostId::new(1).unwrap(), None, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn missing_post_detail_is_not_found() {
        let repo = TestRepository::new();
        assert_eq!(
            show_post(PostId::new(99).unwrap(), None, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn unpublished_category_page_is_not_found() {
        let repo = TestRepository::new().with_categories(vec![news_category(false)]);
        assert_eq!(
            show_category("news", 1, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn category_page_lists_visible_posts() {
        let alice = sample_user(1, "alice");
        let category = news_category(true);
        let mut post = post_by(&alice, 1, 1, true);
        post.category = Some(PostCategory {
            id: category.id,
            title: category.title.clone(),
            slug: category.slug.clone(),
            is_published: true,
        });
        let repo = TestRepository::new()
            .with_categories(vec![category])
            .with_posts(vec![post]);

        let (category, page) = show_category("news", 1, &repo).unwrap();
        assert_eq!(category.slug, "news");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].comment_count, 0);
    }

    #[test]
    fn create_post_assigns_the_requester_as_author() {
        let alice = sample_user(1, "alice");
        let repo = TestRepository::new().with_users(vec![alice.clone()]);
        let claims = AuthenticatedUser::from(&alice);

        let post = create_post(sample_payload(), &claims, &repo).unwrap();
        assert_eq!(post.author.id, alice.id);
    }

    #[test]
    fn non_author_cannot_update_a_post() {
        let alice = sample_user(1, "alice");
        let bob = sample_user(2, "bob");
        let post = post_by(&alice, 1, 1, true);
        let repo = TestRepository::new()
            .with_users(vec![alice, bob.clone()])
            .with_posts(vec![post]);
        let bob_claims = AuthenticatedUser::from(&bob);

        let err = update_post(PostId::new(1).unwrap(), sample_payload(), &bob_claims, &repo)
            .unwrap_err();
        assert_eq!(err, ServiceError::Unauthorized);

        // State must be unchanged after the denied attempt.
        let unchanged = repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(unchanged.title, "Hi");
    }

    #[test]
    fn non_author_cannot_delete_a_post() {
        let alice = sample_user(1, "alice");
        let bob = sample_user(2, "bob");
        let post = post_by(&alice, 1, 1, true);
        let repo = TestRepository::new()
            .with_users(vec![alice, bob.clone()])
            .with_posts(vec![post]);
        let bob_claims = AuthenticatedUser::from(&bob);

        assert_eq!(
            delete_post(PostId::new(1).unwrap(), &bob_claims, &repo).unwrap_err(),
            ServiceError::Unauthorized
        );
        assert!(repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().is_some());
    }

    #[test]
    fn update_without_a_new_image_keeps_the_stored_one() {
        let alice = sample_user(1, "alice");
        let mut post = post_by(&alice, 1, 1, true);
        post.image = Some("/media/post_images/cat-1.png".to_string());
        let repo = TestRepository::new()
            .with_users(vec![alice.clone()])
            .with_posts(vec![post]);
        let claims = AuthenticatedUser::from(&alice);

        update_post(PostId::new(1).unwrap(), sample_payload(), &claims, &repo).unwrap();
        let updated = repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(updated.title, "Edited");
        assert_eq!(
            updated.image.as_deref(),
            Some("/media/post_images/cat-1.png")
        );

        let mut replacement = sample_payload();
        replacement.image = Some("/media/post_images/dog-2.png".to_string());
        update_post(PostId::new(1).unwrap(), replacement, &claims, &repo).unwrap();
        let updated = repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(
            updated.image.as_deref(),
            Some("/media/post_images/dog-2.png")
        );
    }

    #[test]
    fn author_can_update_their_post() {
        let alice = sample_user(1, "alice");
        let post = post_by(&alice, 1, 1, true);
        let repo = TestRepository::new()
            .with_users(vec![alice.clone()])
            .with_posts(vec![post]);
        let claims = AuthenticatedUser::from(&alice);

        update_post(PostId::new(1).unwrap(), sample_payload(), &claims, &repo).unwrap();
        let updated = repo.get_post_by_id(PostId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(updated.title, "Edited");
    }
}
