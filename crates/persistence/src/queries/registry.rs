// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Station and patrol user queries.

use crate::data_models::{PatrolUserRow, StationRow};
use crate::diesel_schema::{patrol_users, stations};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Looks up a station by id.
pub fn get_station(
    conn: &mut _,
    station_id: i64,
) -> Result<Option<StationRow>, PersistenceError> {
    stations::table
        .filter(stations::station_id.eq(station_id))
        .first::<StationRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_station: {e}")))
}

}

backend_fn! {

/// Looks up a patrol user by id.
pub fn get_patrol_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Option<PatrolUserRow>, PersistenceError> {
    patrol_users::table
        .filter(patrol_users::user_id.eq(user_id))
        .first::<PatrolUserRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_patrol_user: {e}")))
}

}
