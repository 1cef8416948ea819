use diesel::prelude::*;

use crate::domain::comment::{Comment, NewComment};
use crate::domain::types::{CommentBody, CommentId, PostId};
use crate::models::comment::{Comment as DbComment, NewComment as DbNewComment};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CommentReader, CommentWriter, DieselRepository};

impl CommentReader for DieselRepository {
    fn list_comments(&self, post_id: PostId) -> RepositoryResult<Vec<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let comments = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(Some(post_id.get())))
            .order(comments::created_at.asc())
            .load::<(DbComment, DbUser)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Comment>, _>>()?;

        Ok(comments)
    }

    fn get_comment_by_id(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> RepositoryResult<Option<Comment>> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;

        let comment = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(comment_id.get()))
            .filter(comments::post_id.eq(Some(post_id.get())))
            .first::<(DbComment, DbUser)>(&mut conn)
            .optional()?;

        Ok(comment.map(TryInto::try_into).transpose()?)
    }
}

impl CommentWriter for DieselRepository {
    fn create_comment(&self, comment: &NewComment) -> RepositoryResult<Comment> {
        use crate::schema::{comments, users};

        let mut conn = self.conn()?;
        let db_comment: DbNewComment = comment.clone().into();

        let created = diesel::insert_into(comments::table)
            .values(db_comment)
            .get_result::<DbComment>(&mut conn)?;

        let author = users::table
            .filter(users::id.eq(created.author_id))
            .first::<DbUser>(&mut conn)?;

        Ok((created, author).try_into()?)
    }

    fn update_comment(&self, id: CommentId, text: &CommentBody) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected = diesel::update(comments::table.filter(comments::id.eq(id.get())))
            .set(comments::text.eq(text.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_comment(&self, id: CommentId) -> RepositoryResult<usize> {
        use crate::schema::comments;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(comments::table.filter(comments::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
