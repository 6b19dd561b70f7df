// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Station and patrol user administration mutations.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewPatrolUser, NewStation};
use crate::diesel_schema::{patrol_users, stations};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use vigil_domain::{PatrolUser, Station};

backend_fn! {

/// Inserts a station and returns its assigned ID.
pub fn create_station(
    conn: &mut _,
    station: &Station,
) -> Result<i64, PersistenceError> {
    let record = NewStation {
        name: station.name.clone(),
        is_active: i32::from(station.is_active),
    };
    diesel::insert_into(stations::table)
        .values(&record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}

backend_fn! {

/// Inserts a patrol user and returns their assigned ID.
pub fn create_patrol_user(
    conn: &mut _,
    user: &PatrolUser,
) -> Result<i64, PersistenceError> {
    let record = NewPatrolUser {
        name: user.name.clone(),
        badge_number: user.badge_number.clone(),
        station_id: user.station_id,
        is_active: i32::from(user.is_active),
    };
    diesel::insert_into(patrol_users::table)
        .values(&record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}
