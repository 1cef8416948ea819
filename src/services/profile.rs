use chrono::Utc;

use crate::POSTS_PER_PAGE;
use crate::auth::AuthenticatedUser;
use crate::domain::post::Post;
use crate::domain::user::{ProfileUpdate, User};
use crate::pagination::{Paginated, Pagination};
use crate::repository::{PostListQuery, PostReader, UserReader, UserWriter};

use super::{ServiceError, ServiceResult, acting_user_id};

/// Profile page: the user's posts, newest first. The owner sees everything
/// they wrote; everyone else gets the public visibility filter.
pub fn show_profile<R>(
    username: &str,
    page: usize,
    viewer: Option<&AuthenticatedUser>,
    repo: &R,
) -> ServiceResult<(User, Paginated<Post>)>
where
    R: UserReader + PostReader,
{
    let profile = match repo.get_user_by_username(username) {
        Ok(Some(user)) => user,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let is_owner = viewer.is_some_and(|u| u.id == profile.id.get());
    let mut query = PostListQuery::new()
        .by_author(profile.id)
        .paginate(page, POSTS_PER_PAGE);
    if !is_owner {
        query = query.visible_at(Utc::now().naive_utc());
    }

    match repo.list_posts(query) {
        Ok((total, posts)) => Ok((
            profile,
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
            log::error!("Failed to list posts by author: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Apply the user's own profile changes and return the updated record so the
/// caller can refresh the session claims.
pub fn update_profile<R>(
    update: ProfileUpdate,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<User>
where
    R: UserWriter,
{
    let id = acting_user_id(user)?;

    match repo.update_profile(id, &update) {
        Ok(user) => Ok(user),
        Err(e) if e.is_unique_violation() => Err(ServiceError::Form(
            "That username is already taken.".to_string(),
        )),
        Err(e) => {
            log::error!("Failed to update profile: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        EmailAddress, PostBody, PostId, PostTitle, Slug, UserId, Username,
    };
    use crate::domain::user::Author;
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

    fn post_by(author: &User, id: i32, is_published: bool) -> Post {
        let pub_date = Utc::now().naive_utc() - Duration::days(1);
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

    #[test]
    fn unknown_username_is_not_found() {
        let repo = TestRepository::new();
        assert_eq!(
            show_profile("ghost", 1, None, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn owner_sees_their_unpublished_posts() {
        let alice = sample_user(1, "alice");
        let repo = TestRepository::new()
            .with_users(vec![alice.clone()])
            .with_posts(vec![post_by(&alice, 1, true), post_by(&alice, 2, false)]);
        let claims = AuthenticatedUser::from(&alice);

        let (_, page) = show_profile("alice", 1, Some(&claims), &repo).unwrap();
        assert_eq!(page.total, 2);
    }

    #[test]
    fn visitors_see_only_visible_posts() {
        let alice = sample_user(1, "alice");
        let bob = sample_user(2, "bob");
        let repo = TestRepository::new()
            .with_users(vec![alice.clone(), bob.clone()])
            .with_posts(vec![post_by(&alice, 1, true), post_by(&alice, 2, false)]);
        let bob_claims = AuthenticatedUser::from(&bob);

        let (_, page) = show_profile("alice", 1, Some(&bob_claims), &repo).unwrap();
        assert_eq!(page.total, 1);

        let (_, page) = show_profile("alice", 1, None, &repo).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn profile_update_changes_the_stored_user() {
        let alice = sample_user(1, "alice");
        let repo = TestRepository::new().with_users(vec![alice.clone()]);
        let claims = AuthenticatedUser::from(&alice);

        let update = ProfileUpdate {
            username: Username::new("alice2").unwrap(),
            email: EmailAddress::new("alice2@example.com").unwrap(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
        };
        let updated = update_profile(update, &claims, &repo).unwrap();
        assert_eq!(updated.username, "alice2");
        assert_eq!(updated.first_name, "Alice");
    }
}
