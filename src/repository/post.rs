use std::collections::HashMap;

use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::PostId;
use crate::models::category::Category as DbCategory;
use crate::models::location::Location as DbLocation;
use crate::models::post::{NewPost as DbNewPost, Post as DbPost, PostChangeset, PostRecord};
use crate::models::user::User as DbUser;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostWriter};

type PostRow = (DbPost, DbUser, Option<DbCategory>, Option<DbLocation>);

/// Comment count aggregate for the given post ids, computed at query time.
fn comment_counts(
    conn: &mut DbConnection,
    post_ids: &[i32],
) -> RepositoryResult<HashMap<i32, i64>> {
    use crate::schema::comments;

    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = comments::table
        .filter(comments::post_id.eq_any(post_ids.iter().map(|id| Some(*id))))
        .group_by(comments::post_id)
        .select((comments::post_id, diesel::dsl::count_star()))
        .load::<(Option<i32>, i64)>(conn)?;

    Ok(rows
        .into_iter()
        .filter_map(|(post_id, count)| post_id.map(|id| (id, count)))
        .collect())
}

fn into_domain(rows: Vec<PostRow>, counts: &HashMap<i32, i64>) -> RepositoryResult<Vec<Post>> {
    rows.into_iter()
        .map(|(post, author, category, location)| {
            let comment_count = counts.get(&post.id).copied().unwrap_or(0);
            let record = PostRecord {
                post,
                author,
                category,
                location,
                comment_count,
            };
            Ok(record.try_into()?)
        })
        .collect()
}

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::{categories, locations, posts, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut q = posts::table
                .inner_join(users::table)
                .left_join(categories::table)
                .left_join(locations::table)
                .into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(author_id) = query.author_id {
                q = q.filter(posts::author_id.eq(author_id.get()));
            }
            if let Some(category_id) = query.category_id {
                q = q.filter(posts::category_id.eq(Some(category_id.get())));
            }
            if let Some(now) = query.visible_at {
                q = q
                    .filter(posts::is_published.eq(true))
                    .filter(posts::pub_date.le(now))
                    .filter(
                        posts::category_id
                            .is_null()
                            .or(categories::is_published.eq(true)),
                    );
            }
            q
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .select((
                posts::all_columns,
                users::all_columns,
                categories::all_columns.nullable(),
                locations::all_columns.nullable(),
            ))
            .order(posts::pub_date.desc());
        if let Some(pagination) = &query.pagination {
            // Out-of-range page requests resolve to the last page, matching
            // the page number `Paginated` reports.
            let per_page = pagination.per_page.max(1);
            let total_pages = total.div_ceil(per_page).max(1);
            let page = pagination.page.clamp(1, total_pages);
            items = items
                .offset(((page - 1) * per_page) as i64)
                .limit(per_page as i64);
        }

        let rows = items.load::<PostRow>(&mut conn)?;

        let ids: Vec<i32> = rows.iter().map(|(post, ..)| post.id).collect();
        let counts = comment_counts(&mut conn, &ids)?;

        Ok((total, into_domain(rows, &counts)?))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::{categories, locations, posts, users};

        let mut conn = self.conn()?;

        let row = posts::table
            .inner_join(users::table)
            .left_join(categories::table)
            .left_join(locations::table)
            .filter(posts::id.eq(id.get()))
            .select((
                posts::all_columns,
                users::all_columns,
                categories::all_columns.nullable(),
                locations::all_columns.nullable(),
            ))
            .first::<PostRow>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let counts = comment_counts(&mut conn, &[row.0.id])?;
        Ok(into_domain(vec![row], &counts)?.pop())
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let db_post: DbNewPost = post.clone().into();

        let created = diesel::insert_into(posts::table)
            .values(db_post)
            .get_result::<DbPost>(&mut conn)?;

        drop(conn);
        // Reload through the join so the returned post carries its author
        // and category the same way listings do.
        match self.get_post_by_id(PostId::new(created.id)?)? {
            Some(post) => Ok(post),
            None => Err(diesel::result::Error::NotFound.into()),
        }
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;
        let changeset: PostChangeset = update.clone().into();

        let affected = diesel::update(posts::table.filter(posts::id.eq(id.get())))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::{comments, posts};

        let mut conn = self.conn()?;

        // Comments are retained; only their post reference is nulled.
        let affected = conn.transaction(|conn| {
            diesel::update(comments::table.filter(comments::post_id.eq(Some(id.get()))))
                .set(comments::post_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(posts::table.filter(posts::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
