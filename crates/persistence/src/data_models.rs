// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and serializable mirrors of audit types.
//!
//! Rows map 1:1 onto the Diesel schema; conversion functions rebuild the
//! domain types, going back through the validated constructors (e.g. the
//! `"lat,lng"` position string is re-parsed into `Coordinates`).

use crate::diesel_schema::{
    assignment_checkpoints, audit_events, checkpoint_scans, checkpoints, patrol_users,
    route_assignments, route_checkpoints, routes, scan_media, stations,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use vigil_domain::{
    AssignmentStatus, Checkpoint, CheckpointScan, Coordinates, PatrolUser, Route, RouteAssignment,
    RoutePriority, ScanMedia, Station,
};

/// Formats a timestamp as RFC 3339 for storage.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid timestamp: {e}")))
}

/// Parses an RFC 3339 timestamp from storage.
pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid timestamp: {e}")))
}

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct StationRow {
    pub station_id: i64,
    pub name: String,
    pub is_active: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = stations)]
pub struct NewStation {
    pub name: String,
    pub is_active: i32,
}

#[derive(Debug, Clone, Queryable)]
pub struct PatrolUserRow {
    pub user_id: i64,
    pub name: String,
    pub badge_number: Option<String>,
    pub station_id: i64,
    pub is_active: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patrol_users)]
pub struct NewPatrolUser {
    pub name: String,
    pub badge_number: Option<String>,
    pub station_id: i64,
    pub is_active: i32,
}

#[derive(Debug, Clone, Queryable)]
pub struct CheckpointRow {
    pub checkpoint_id: i64,
    pub name: String,
    pub position: String,
    pub scan_radius_m: f64,
    pub station_id: i64,
    pub is_active: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = checkpoints)]
pub struct NewCheckpoint {
    pub name: String,
    pub position: String,
    pub scan_radius_m: f64,
    pub station_id: i64,
    pub is_active: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct RouteRow {
    pub route_id: i64,
    pub name: String,
    pub station_id: i64,
    pub priority: Option<String>,
    pub estimated_duration_minutes: Option<i32>,
    pub is_active: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = routes)]
pub struct NewRoute {
    pub name: String,
    pub station_id: i64,
    pub priority: Option<String>,
    pub estimated_duration_minutes: Option<i32>,
    pub is_active: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = route_checkpoints)]
pub struct NewRouteCheckpoint {
    pub route_id: i64,
    pub checkpoint_id: i64,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub user_id: i64,
    pub route_id: i64,
    pub station_id: i64,
    pub status: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub is_active: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = route_assignments)]
pub struct NewAssignment {
    pub user_id: i64,
    pub route_id: i64,
    pub station_id: i64,
    pub status: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub is_active: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assignment_checkpoints)]
pub struct NewAssignmentCheckpoint {
    pub assignment_id: i64,
    pub checkpoint_id: i64,
    pub scanned_at: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct ScanRow {
    pub scan_id: i64,
    pub assignment_id: i64,
    pub user_id: i64,
    pub checkpoint_id: i64,
    pub route_id: i64,
    pub scanned_at: String,
    pub position: String,
    pub distance_m: f64,
    pub is_valid: i32,
    pub notes: Option<String>,
    pub metadata_json: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = checkpoint_scans)]
pub struct NewScan {
    pub assignment_id: i64,
    pub user_id: i64,
    pub checkpoint_id: i64,
    pub route_id: i64,
    pub scanned_at: String,
    pub position: String,
    pub distance_m: f64,
    pub is_valid: i32,
    pub notes: Option<String>,
    pub metadata_json: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct ScanMediaRow {
    pub id: i64,
    pub scan_id: i64,
    pub media_type: String,
    pub uri: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scan_media)]
pub struct NewScanMedia {
    pub scan_id: i64,
    pub media_type: String,
    pub uri: String,
}

#[derive(Debug, Clone, Queryable)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub route_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent {
    pub route_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}

impl StationRow {
    /// Rebuilds the domain `Station`.
    pub fn into_domain(self) -> Station {
        Station {
            station_id: Some(self.station_id),
            name: self.name,
            is_active: self.is_active != 0,
        }
    }
}

impl PatrolUserRow {
    /// Rebuilds the domain `PatrolUser`.
    pub fn into_domain(self) -> PatrolUser {
        PatrolUser {
            user_id: Some(self.user_id),
            name: self.name,
            badge_number: self.badge_number,
            station_id: self.station_id,
            is_active: self.is_active != 0,
        }
    }
}

impl CheckpointRow {
    /// Rebuilds the domain `Checkpoint`, re-parsing the position string.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored position does not parse as a valid
    /// coordinate pair.
    pub fn into_domain(self) -> Result<Checkpoint, PersistenceError> {
        let position: Coordinates = Coordinates::parse_storage(&self.position)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        Ok(Checkpoint {
            checkpoint_id: Some(self.checkpoint_id),
            name: self.name,
            position,
            scan_radius_m: self.scan_radius_m,
            station_id: self.station_id,
            is_active: self.is_active != 0,
        })
    }
}

impl RouteRow {
    /// Rebuilds the domain `Route` given its ordered checkpoint ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored priority or duration is invalid.
    pub fn into_domain(self, checkpoint_ids: Vec<i64>) -> Result<Route, PersistenceError> {
        let priority: Option<RoutePriority> = match self.priority.as_deref() {
            Some(value) => Some(
                RoutePriority::parse(value)
                    .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            ),
            None => None,
        };
        let estimated_duration_minutes: Option<u16> = match self.estimated_duration_minutes {
            Some(minutes) => Some(u16::try_from(minutes).map_err(|_| {
                PersistenceError::SerializationError(format!(
                    "Invalid estimated duration: {minutes}"
                ))
            })?),
            None => None,
        };
        Ok(Route {
            route_id: Some(self.route_id),
            name: self.name,
            checkpoint_ids,
            station_id: self.station_id,
            priority,
            estimated_duration_minutes,
            is_active: self.is_active != 0,
        })
    }
}

impl AssignmentRow {
    /// Rebuilds the domain `RouteAssignment` given its completed
    /// checkpoint ids in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status or a timestamp is invalid.
    pub fn into_domain(
        self,
        completed_checkpoints: Vec<i64>,
    ) -> Result<RouteAssignment, PersistenceError> {
        let status: AssignmentStatus = self
            .status
            .parse()
            .map_err(|e: vigil_domain::DomainError| {
                PersistenceError::SerializationError(e.to_string())
            })?;
        let start_date: OffsetDateTime = parse_timestamp(&self.start_date)?;
        let end_date: Option<OffsetDateTime> = match self.end_date.as_deref() {
            Some(value) => Some(parse_timestamp(value)?),
            None => None,
        };
        Ok(RouteAssignment {
            assignment_id: Some(self.assignment_id),
            user_id: self.user_id,
            route_id: self.route_id,
            station_id: self.station_id,
            status,
            start_date,
            end_date,
            completed_checkpoints,
            notes: self.notes,
            is_active: self.is_active != 0,
        })
    }
}

impl ScanRow {
    /// Rebuilds the domain `CheckpointScan` given its media rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored position, timestamp, or metadata is
    /// invalid.
    pub fn into_domain(
        self,
        media_rows: &[ScanMediaRow],
    ) -> Result<CheckpointScan, PersistenceError> {
        let position: Coordinates = Coordinates::parse_storage(&self.position)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let scanned_at: OffsetDateTime = parse_timestamp(&self.scanned_at)?;
        let metadata: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&self.metadata_json)?;

        let mut media: ScanMedia = ScanMedia::empty();
        for row in media_rows {
            match row.media_type.as_str() {
                "image" => media.images.push(row.uri.clone()),
                "video" => media.videos.push(row.uri.clone()),
                "audio" => media.audios.push(row.uri.clone()),
                other => {
                    return Err(PersistenceError::SerializationError(format!(
                        "Unknown media type: {other}"
                    )));
                }
            }
        }

        Ok(CheckpointScan {
            scan_id: Some(self.scan_id),
            user_id: self.user_id,
            checkpoint_id: self.checkpoint_id,
            route_id: self.route_id,
            assignment_id: self.assignment_id,
            scanned_at,
            position,
            distance_m: self.distance_m,
            is_valid: self.is_valid != 0,
            notes: self.notes,
            media,
            metadata,
        })
    }
}
