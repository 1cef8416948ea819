use diesel::prelude::*;

use crate::domain::location::{Location, NewLocation};
use crate::models::location::{Location as DbLocation, NewLocation as DbNewLocation};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, LocationReader, LocationWriter};

impl LocationReader for DieselRepository {
    fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        use crate::schema::locations;

        let mut conn = self.conn()?;

        let locations = locations::table
            .order(locations::name.asc())
            .load::<DbLocation>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Location>, _>>()?;

        Ok(locations)
    }
}

impl LocationWriter for DieselRepository {
    fn create_location(&self, location: &NewLocation) -> RepositoryResult<Location> {
        use crate::schema::locations;

        let mut conn = self.conn()?;
        let db_location: DbNewLocation = location.clone().into();

        let created = diesel::insert_into(locations::table)
            .values(db_location)
            .get_result::<DbLocation>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
