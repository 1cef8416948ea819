use diesel::prelude::*;

use crate::domain::types::UserId;
use crate::domain::user::{NewUser, ProfileUpdate, User};
use crate::models::user::{
    NewUser as DbNewUser, User as DbUser, UserProfileChangeset,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(TryInto::try_into).transpose()?)
    }

    fn get_user_with_password(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<(User, String)>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let Some(user) = user else {
            return Ok(None);
        };
        let password_hash = user.password_hash.clone();
        Ok(Some((user.try_into()?, password_hash)))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let created = diesel::insert_into(users::table)
            .values(db_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_profile(&self, id: UserId, update: &ProfileUpdate) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let changeset: UserProfileChangeset = update.clone().into();

        // Single transaction: either all identity fields commit or none do.
        let updated = conn.transaction(|conn| {
            diesel::update(users::table.filter(users::id.eq(id.get())))
                .set(changeset)
                .get_result::<DbUser>(conn)
        })?;

        Ok(updated.try_into()?)
    }
}
