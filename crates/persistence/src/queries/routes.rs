// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route queries.

use crate::data_models::RouteRow;
use crate::diesel_schema::{route_checkpoints, routes};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Looks up a route row by id, active or not.
pub fn get_route(
    conn: &mut _,
    route_id: i64,
) -> Result<Option<RouteRow>, PersistenceError> {
    routes::table
        .filter(routes::route_id.eq(route_id))
        .first::<RouteRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_route: {e}")))
}

}

backend_fn! {

/// Returns a route's checkpoint ids in route order.
pub fn get_route_checkpoint_ids(
    conn: &mut _,
    route_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    route_checkpoints::table
        .filter(route_checkpoints::route_id.eq(route_id))
        .order(route_checkpoints::position.asc())
        .select(route_checkpoints::checkpoint_id)
        .load::<i64>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("get_route_checkpoint_ids: {e}"))
        })
}

}

backend_fn! {

/// Lists active routes for a station.
pub fn list_active_routes_for_station(
    conn: &mut _,
    station_id: i64,
) -> Result<Vec<RouteRow>, PersistenceError> {
    routes::table
        .filter(routes::station_id.eq(station_id))
        .filter(routes::is_active.eq(1))
        .order(routes::route_id.asc())
        .load::<RouteRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_active_routes_for_station: {e}"))
        })
}

}
