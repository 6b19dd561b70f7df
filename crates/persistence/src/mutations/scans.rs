// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional scan recording.
//!
//! Recording a verified scan is one atomic unit: the completion append,
//! the scan audit row, its media rows, and the guarded assignment update
//! either all land or none do. The `UNIQUE(assignment_id, checkpoint_id)`
//! constraint on the completion table means two concurrent scans of the
//! same checkpoint cannot both succeed, and appends of different
//! checkpoints are independent rows that cannot lose updates.

use crate::backend::PersistenceBackend;
use crate::data_models::{NewAssignmentCheckpoint, NewScan, NewScanMedia, format_timestamp};
use crate::diesel_schema::{assignment_checkpoints, checkpoint_scans, route_assignments, scan_media};
use crate::error::PersistenceError;
use crate::mutations::audit::audit_event_record;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{MysqlConnection, SqliteConnection};
use time::OffsetDateTime;
use tracing::{debug, info};
use vigil::TransitionResult;
use vigil_domain::CheckpointScan;

/// The ids assigned when a scan is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistScanResult {
    /// The scan row's id.
    pub scan_id: i64,
    /// The audit event's id.
    pub event_id: i64,
}

/// Builds the media rows for a scan.
fn media_records(scan_id: i64, scan: &CheckpointScan) -> Vec<NewScanMedia> {
    let typed = [
        ("image", &scan.media.images),
        ("video", &scan.media.videos),
        ("audio", &scan.media.audios),
    ];
    typed
        .into_iter()
        .flat_map(|(media_type, uris)| {
            uris.iter().map(move |uri| NewScanMedia {
                scan_id,
                media_type: media_type.to_string(),
                uri: uri.clone(),
            })
        })
        .collect()
}

backend_fn! {

/// Persists a verified scan and its assignment transition atomically.
///
/// Inside one transaction:
///
/// 1. Appends the completion row (`DuplicateCompletion` on a concurrent
///    duplicate; nothing else is written).
/// 2. Appends the scan audit row and its media rows.
/// 3. Applies the assignment update guarded on `status = 'in_progress'`
///    (`UnexpectedAssignmentStatus` if the assignment moved underneath).
/// 4. Persists the audit event.
pub fn record_scan(
    conn: &mut _,
    scan: &CheckpointScan,
    result: &TransitionResult,
) -> Result<PersistScanResult, PersistenceError> {
    conn.transaction::<PersistScanResult, PersistenceError, _>(|conn| {
        let assignment_id: i64 = scan.assignment_id;
        let scanned_at: String = format_timestamp(scan.scanned_at)?;

        // 1. Completion append; the unique constraint is the concurrent
        //    double-scan backstop.
        let completion = NewAssignmentCheckpoint {
            assignment_id,
            checkpoint_id: scan.checkpoint_id,
            scanned_at: scanned_at.clone(),
        };
        let appended = diesel::insert_into(assignment_checkpoints::table)
            .values(&completion)
            .execute(conn);
        if let Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) =
            appended
        {
            return Err(PersistenceError::DuplicateCompletion {
                assignment_id,
                checkpoint_id: scan.checkpoint_id,
            });
        }
        appended?;

        // 2. Scan audit row and media rows.
        let scan_record = NewScan {
            assignment_id,
            user_id: scan.user_id,
            checkpoint_id: scan.checkpoint_id,
            route_id: scan.route_id,
            scanned_at,
            position: scan.position.to_storage_string(),
            distance_m: scan.distance_m,
            is_valid: i32::from(scan.is_valid),
            notes: scan.notes.clone(),
            metadata_json: serde_json::to_string(&scan.metadata)?,
        };
        diesel::insert_into(checkpoint_scans::table)
            .values(&scan_record)
            .execute(conn)?;
        let scan_id: i64 = conn.get_last_insert_rowid()?;

        let media: Vec<NewScanMedia> = media_records(scan_id, scan);
        if !media.is_empty() {
            diesel::insert_into(scan_media::table)
                .values(&media)
                .execute(conn)?;
        }
        debug!(scan_id, media_count = media.len(), "Inserted scan row");

        // 3. Guarded assignment update: only an in-progress assignment
        //    may advance.
        let end_date: Option<String> = match result.assignment.end_date {
            Some(value) => Some(format_timestamp(value)?),
            None => None,
        };
        let affected: usize = diesel::update(
            route_assignments::table
                .filter(route_assignments::assignment_id.eq(assignment_id))
                .filter(route_assignments::status.eq("in_progress")),
        )
        .set((
            route_assignments::status.eq(result.assignment.status.as_str()),
            route_assignments::end_date.eq(end_date),
        ))
        .execute(conn)?;
        if affected == 0 {
            return Err(PersistenceError::UnexpectedAssignmentStatus { assignment_id });
        }

        // 4. Audit event.
        let event = audit_event_record(
            &result.audit_event,
            Some(assignment_id),
            OffsetDateTime::now_utc(),
        )?;
        diesel::insert_into(crate::diesel_schema::audit_events::table)
            .values(&event)
            .execute(conn)?;
        let event_id: i64 = conn.get_last_insert_rowid()?;

        info!(
            scan_id,
            event_id,
            assignment_id,
            checkpoint_id = scan.checkpoint_id,
            "Persisted checkpoint scan"
        );
        Ok(PersistScanResult { scan_id, event_id })
    })
}

}
