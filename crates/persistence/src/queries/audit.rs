// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use crate::data_models::{
    ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use vigil_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

/// Rebuilds a domain audit event from its stored row.
///
/// # Errors
///
/// Returns an error if any JSON column fails to deserialize.
pub(crate) fn row_to_audit_event(row: &AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause: CauseData = serde_json::from_str(&row.cause_json)?;
    let action: ActionData = serde_json::from_str(&row.action_json)?;
    let before: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    Ok(AuditEvent::new(
        Actor::new(actor.id, actor.actor_type),
        Cause::new(cause.id, cause.description),
        Action::new(action.name, action.details),
        StateSnapshot::new(before.data),
        StateSnapshot::new(after.data),
        row.route_id,
        row.assignment_id,
    ))
}

backend_fn! {

/// Retrieves an audit event by ID.
pub fn get_audit_event(
    conn: &mut _,
    event_id: i64,
) -> Result<AuditEventRow, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .first::<AuditEventRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_audit_event: {e}")))?
        .ok_or(PersistenceError::EventNotFound(event_id))
}

}

backend_fn! {

/// Lists audit events for an assignment in event order.
pub fn list_audit_events_for_assignment(
    conn: &mut _,
    assignment_id: i64,
) -> Result<Vec<AuditEventRow>, PersistenceError> {
    audit_events::table
        .filter(audit_events::assignment_id.eq(assignment_id))
        .order(audit_events::event_id.asc())
        .load::<AuditEventRow>(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!(
                "list_audit_events_for_assignment: {e}"
            ))
        })
}

}
