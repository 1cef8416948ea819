use crate::auth::AuthenticatedUser;
use crate::domain::comment::Comment;
use crate::domain::types::{CommentId, PostId};
use crate::forms::comments::CommentFormPayload;
use crate::repository::{CommentReader, CommentWriter, PostReader};

use super::{ServiceError, ServiceResult, acting_user_id, ensure_author};

pub fn add_comment<R>(
    post_id: PostId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: PostReader + CommentWriter,
{
    let author_id = acting_user_id(user)?;

    // The parent must exist; its visibility is not re-checked here.
    match repo.get_post_by_id(post_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.create_comment(&payload.into_new_comment(author_id, post_id)) {
        Ok(comment) => Ok(comment),
        Err(e) => {
            log::error!("Failed to create comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a comment for its edit or delete-confirmation form. The composite
/// (post, comment) key must match and the requester must be the author.
pub fn show_own_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Comment>
where
    R: CommentReader,
{
    let acting = acting_user_id(user)?;

    let comment = match repo.get_comment_by_id(post_id, comment_id) {
        Ok(Some(comment)) => comment,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get comment: {e}");
            return Err(ServiceError::Internal);
        }
    };
    ensure_author(comment.author.id, acting)?;
    Ok(comment)
}

pub fn update_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    payload: CommentFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let comment = show_own_comment(post_id, comment_id, user, repo)?;

    match repo.update_comment(comment.id, &payload.text) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to update comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_comment<R>(
    post_id: PostId,
    comment_id: CommentId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<()>
where
    R: CommentReader + CommentWriter,
{
    let comment = show_own_comment(post_id, comment_id, user, repo)?;

    match repo.delete_comment(comment.id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete comment: {e}");
            Err(ServiceError::Internal)
        }
    }
}
