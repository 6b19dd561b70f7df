// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment creation and lifecycle mutations.
//!
//! Assignment creation is the contested path: the insert runs inside a
//! transaction, and the schema's active-assignment uniqueness constraints
//! reject any insert that races past the in-process arbitration. The
//! rejection surfaces as a typed conflict error, never as two successful
//! assignments for one route.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewAssignment, format_timestamp};
use crate::diesel_schema::route_assignments;
use crate::error::PersistenceError;
use crate::mutations::audit::audit_event_record;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::{debug, info};
use vigil::TransitionResult;
use vigil_domain::RouteAssignment;

/// The ids assigned when an assignment creation is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistAssignmentResult {
    /// The new assignment's id.
    pub assignment_id: i64,
    /// The audit event's id.
    pub event_id: i64,
}

/// Builds the insertable assignment record.
fn assignment_record(assignment: &RouteAssignment) -> Result<NewAssignment, PersistenceError> {
    let end_date: Option<String> = match assignment.end_date {
        Some(value) => Some(format_timestamp(value)?),
        None => None,
    };
    Ok(NewAssignment {
        user_id: assignment.user_id,
        route_id: assignment.route_id,
        station_id: assignment.station_id,
        status: assignment.status.as_str().to_string(),
        start_date: format_timestamp(assignment.start_date)?,
        end_date,
        notes: assignment.notes.clone(),
        is_active: i32::from(assignment.is_active),
    })
}

backend_fn! {

/// Inserts a new assignment and its audit event in one transaction.
///
/// A uniqueness violation on the active-assignment constraints maps to
/// `PersistenceError::ActiveAssignmentExists`; the transaction leaves no
/// partial state behind.
pub fn create_assignment(
    conn: &mut _,
    result: &TransitionResult,
) -> Result<PersistAssignmentResult, PersistenceError> {
    conn.transaction::<PersistAssignmentResult, PersistenceError, _>(|conn| {
        let record: NewAssignment = assignment_record(&result.assignment)?;

        let inserted = diesel::insert_into(route_assignments::table)
            .values(&record)
            .execute(conn);
        if let Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) =
            inserted
        {
            return Err(PersistenceError::ActiveAssignmentExists {
                route_id: result.assignment.route_id,
            });
        }
        inserted?;

        let assignment_id: i64 = conn.get_last_insert_rowid()?;
        debug!(assignment_id, "Inserted assignment");

        let event = audit_event_record(
            &result.audit_event,
            Some(assignment_id),
            OffsetDateTime::now_utc(),
        )?;
        diesel::insert_into(crate::diesel_schema::audit_events::table)
            .values(&event)
            .execute(conn)?;
        let event_id: i64 = conn.get_last_insert_rowid()?;

        info!(assignment_id, event_id, "Persisted assignment creation");
        Ok(PersistAssignmentResult {
            assignment_id,
            event_id,
        })
    })
}

}

backend_fn! {

/// Updates an assignment's lifecycle fields and persists the audit event
/// in one transaction, returning the event ID.
///
/// Used for start, complete, cancel, and soft-delete transitions; the
/// completed-checkpoint append path goes through `record_scan` instead.
pub fn update_assignment(
    conn: &mut _,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let assignment_id: i64 = result
            .assignment
            .assignment_id
            .ok_or_else(|| PersistenceError::Other(String::from(
                "Cannot update an unpersisted assignment",
            )))?;

        let end_date: Option<String> = match result.assignment.end_date {
            Some(value) => Some(format_timestamp(value)?),
            None => None,
        };

        let affected: usize = diesel::update(
            route_assignments::table
                .filter(route_assignments::assignment_id.eq(assignment_id)),
        )
        .set((
            route_assignments::status.eq(result.assignment.status.as_str()),
            route_assignments::start_date
                .eq(format_timestamp(result.assignment.start_date)?),
            route_assignments::end_date.eq(end_date),
            route_assignments::notes.eq(result.assignment.notes.clone()),
            route_assignments::is_active.eq(i32::from(result.assignment.is_active)),
        ))
        .execute(conn)?;
        if affected == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Assignment {assignment_id}"
            )));
        }

        let event = audit_event_record(
            &result.audit_event,
            Some(assignment_id),
            OffsetDateTime::now_utc(),
        )?;
        diesel::insert_into(crate::diesel_schema::audit_events::table)
            .values(&event)
            .execute(conn)?;
        let event_id: i64 = conn.get_last_insert_rowid()?;

        info!(assignment_id, event_id, "Persisted assignment transition");
        Ok(event_id)
    })
}

}
