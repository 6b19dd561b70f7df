// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route administration mutations.
//!
//! A route is a route row plus its ordered membership rows in
//! `route_checkpoints`; both are written inside one transaction so a
//! route is never observable with half its checkpoint list.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewRoute, NewRouteCheckpoint, format_timestamp};
use crate::diesel_schema::{route_checkpoints, routes};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use vigil_domain::Route;

/// Builds ordered membership records for a route.
fn membership_records(route_id: i64, checkpoint_ids: &[i64]) -> Vec<NewRouteCheckpoint> {
    checkpoint_ids
        .iter()
        .enumerate()
        .map(|(index, &checkpoint_id)| NewRouteCheckpoint {
            route_id,
            checkpoint_id,
            position: i32::try_from(index).unwrap_or(i32::MAX),
        })
        .collect()
}

backend_fn! {

/// Inserts a route and its ordered checkpoint membership, returning the
/// route's assigned ID.
pub fn create_route(
    conn: &mut _,
    route: &Route,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let record = NewRoute {
            name: route.name.clone(),
            station_id: route.station_id,
            priority: route.priority.map(|p| p.as_str().to_string()),
            estimated_duration_minutes: route
                .estimated_duration_minutes
                .map(i32::from),
            is_active: i32::from(route.is_active),
            created_at: format_timestamp(OffsetDateTime::now_utc())?,
        };
        diesel::insert_into(routes::table)
            .values(&record)
            .execute(conn)?;
        let route_id: i64 = conn.get_last_insert_rowid()?;

        let memberships: Vec<NewRouteCheckpoint> =
            membership_records(route_id, &route.checkpoint_ids);
        diesel::insert_into(route_checkpoints::table)
            .values(&memberships)
            .execute(conn)?;

        Ok(route_id)
    })
}

}

backend_fn! {

/// Updates a route's fields and replaces its checkpoint membership.
pub fn update_route(
    conn: &mut _,
    route_id: i64,
    route: &Route,
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let affected: usize =
            diesel::update(routes::table.filter(routes::route_id.eq(route_id)))
                .set((
                    routes::name.eq(route.name.clone()),
                    routes::priority.eq(route.priority.map(|p| p.as_str().to_string())),
                    routes::estimated_duration_minutes
                        .eq(route.estimated_duration_minutes.map(i32::from)),
                    routes::is_active.eq(i32::from(route.is_active)),
                ))
                .execute(conn)?;
        if affected == 0 {
            return Err(PersistenceError::NotFound(format!("Route {route_id}")));
        }

        diesel::delete(
            route_checkpoints::table.filter(route_checkpoints::route_id.eq(route_id)),
        )
        .execute(conn)?;

        let memberships: Vec<NewRouteCheckpoint> =
            membership_records(route_id, &route.checkpoint_ids);
        diesel::insert_into(route_checkpoints::table)
            .values(&memberships)
            .execute(conn)?;

        Ok(())
    })
}

}

backend_fn! {

/// Flips a route's active flag off (soft delete).
pub fn deactivate_route(
    conn: &mut _,
    route_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize =
        diesel::update(routes::table.filter(routes::route_id.eq(route_id)))
            .set(routes::is_active.eq(0))
            .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::NotFound(format!("Route {route_id}")));
    }
    Ok(())
}

}
