// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.
//!
//! Every successful mutation persists exactly one audit event. The event's
//! structured parts (actor, cause, action, snapshots) are stored as JSON
//! columns alongside the route/assignment scope ids.

use crate::backend::PersistenceBackend;
use crate::data_models::{
    ActionData, ActorData, CauseData, NewAuditEvent, StateSnapshotData, format_timestamp,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use vigil_audit::AuditEvent;

/// Builds the insertable audit event record.
///
/// The assignment scope can be overridden for events created before the
/// assignment id was known (assignment creation persists the row first and
/// then scopes the event to the fresh id).
///
/// # Errors
///
/// Returns an error if JSON serialization or timestamp formatting fails.
pub(crate) fn audit_event_record(
    event: &AuditEvent,
    assignment_id_override: Option<i64>,
    now: OffsetDateTime,
) -> Result<NewAuditEvent, PersistenceError> {
    let actor_json: String = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_snapshot_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_snapshot_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    Ok(NewAuditEvent {
        route_id: event.route_id,
        assignment_id: assignment_id_override.or(event.assignment_id),
        actor_json,
        cause_json,
        action_json,
        before_snapshot_json,
        after_snapshot_json,
        created_at: format_timestamp(now)?,
    })
}

backend_fn! {

/// Persists an audit event and returns its assigned event ID.
pub fn persist_audit_event(
    conn: &mut _,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let record: NewAuditEvent =
        audit_event_record(event, None, OffsetDateTime::now_utc())?;
    diesel::insert_into(audit_events::table)
        .values(&record)
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

}
