// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Route assignment queries.
//!
//! The active-duty filters here mirror the partial unique indexes on the
//! assignment table: status in (assigned, in_progress) and not
//! soft-deleted.

use crate::data_models::AssignmentRow;
use crate::diesel_schema::{assignment_checkpoints, route_assignments};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

/// The active-duty status strings.
const ACTIVE_DUTY: [&str; 2] = ["assigned", "in_progress"];

backend_fn! {

/// Looks up an assignment row by id.
pub fn get_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Option<AssignmentRow>, PersistenceError> {
    route_assignments::table
        .filter(route_assignments::assignment_id.eq(assignment_id))
        .first::<AssignmentRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_assignment: {e}")))
}

}

backend_fn! {

/// Returns an assignment's completed checkpoint ids in arrival order.
pub fn get_completed_checkpoint_ids(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    assignment_checkpoints::table
        .filter(assignment_checkpoints::assignment_id.eq(assignment_id))
        .order((
            assignment_checkpoints::scanned_at.asc(),
            assignment_checkpoints::id.asc(),
        ))
        .select(assignment_checkpoints::checkpoint_id)
        .load::<i64>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("get_completed_checkpoint_ids: {e}"))
        })
}

}

backend_fn! {

/// Finds the active-duty assignment currently covering a route, if any.
pub fn find_active_assignment_for_route(
    conn: &mut _,
    route_id: i64,
) -> Result<Option<AssignmentRow>, PersistenceError> {
    route_assignments::table
        .filter(route_assignments::route_id.eq(route_id))
        .filter(route_assignments::status.eq_any(ACTIVE_DUTY))
        .filter(route_assignments::is_active.eq(1))
        .first::<AssignmentRow>(conn)
        .optional()
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("find_active_assignment_for_route: {e}"))
        })
}

}

backend_fn! {

/// Lists a user's active-duty assignments.
pub fn list_active_assignments_for_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Vec<AssignmentRow>, PersistenceError> {
    route_assignments::table
        .filter(route_assignments::user_id.eq(user_id))
        .filter(route_assignments::status.eq_any(ACTIVE_DUTY))
        .filter(route_assignments::is_active.eq(1))
        .order(route_assignments::assignment_id.asc())
        .load::<AssignmentRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_active_assignments_for_user: {e}"))
        })
}

}

backend_fn! {

/// Lists all of a user's non-deleted assignments, newest first.
pub fn list_assignments_for_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Vec<AssignmentRow>, PersistenceError> {
    route_assignments::table
        .filter(route_assignments::user_id.eq(user_id))
        .filter(route_assignments::is_active.eq(1))
        .order(route_assignments::assignment_id.desc())
        .load::<AssignmentRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("list_assignments_for_user: {e}"))
        })
}

}
