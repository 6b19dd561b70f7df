// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response DTOs.
//!
//! These are distinct from domain types and represent the API contract;
//! the HTTP layer serializes them directly.

use serde::{Deserialize, Serialize};
use vigil::{AssignmentProgress, CheckpointState, NextAction};
use vigil_domain::{Checkpoint, PatrolUser, Route, RouteAssignment};

/// API request to create a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStationRequest {
    /// The station's display name.
    pub name: String,
}

/// API request to create a patrol user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePatrolUserRequest {
    /// The officer's display name.
    pub name: String,
    /// The officer's badge number.
    pub badge_number: Option<String>,
    /// The owning station.
    pub station_id: i64,
}

/// Patrol user details returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolUserResponse {
    /// The user id.
    pub user_id: i64,
    /// The officer's display name.
    pub name: String,
    /// The officer's badge number.
    pub badge_number: Option<String>,
    /// The owning station.
    pub station_id: i64,
    /// Whether the officer is active.
    pub is_active: bool,
}

impl PatrolUserResponse {
    /// Builds the response from a persisted patrol user.
    #[must_use]
    pub fn from_domain(user: &PatrolUser) -> Self {
        Self {
            user_id: user.user_id.unwrap_or_default(),
            name: user.name.clone(),
            badge_number: user.badge_number.clone(),
            station_id: user.station_id,
            is_active: user.is_active,
        }
    }
}

/// API request to create a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCheckpointRequest {
    /// The checkpoint's display name.
    pub name: String,
    /// Geofence center latitude in decimal degrees.
    pub latitude: f64,
    /// Geofence center longitude in decimal degrees.
    pub longitude: f64,
    /// Scan radius in meters; the policy default applies when omitted.
    pub scan_radius_m: Option<f64>,
    /// The owning station.
    pub station_id: i64,
}

/// API request to update a checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCheckpointRequest {
    /// The new display name, if changing.
    pub name: Option<String>,
    /// The new latitude, if moving the geofence center.
    pub latitude: Option<f64>,
    /// The new longitude, if moving the geofence center.
    pub longitude: Option<f64>,
    /// The new scan radius in meters, if changing.
    pub scan_radius_m: Option<f64>,
}

/// Checkpoint details returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointResponse {
    /// The checkpoint id.
    pub checkpoint_id: i64,
    /// The display name.
    pub name: String,
    /// Geofence center latitude.
    pub latitude: f64,
    /// Geofence center longitude.
    pub longitude: f64,
    /// Scan radius in meters.
    pub scan_radius_m: f64,
    /// The owning station.
    pub station_id: i64,
    /// Whether the checkpoint is active.
    pub is_active: bool,
}

impl CheckpointResponse {
    /// Builds the response from a persisted checkpoint.
    #[must_use]
    pub fn from_domain(checkpoint: &Checkpoint) -> Self {
        Self {
            checkpoint_id: checkpoint.checkpoint_id.unwrap_or_default(),
            name: checkpoint.name.clone(),
            latitude: checkpoint.position.latitude(),
            longitude: checkpoint.position.longitude(),
            scan_radius_m: checkpoint.scan_radius_m,
            station_id: checkpoint.station_id,
            is_active: checkpoint.is_active,
        }
    }
}

/// API request to create a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteRequest {
    /// The route's display name.
    pub name: String,
    /// Ordered checkpoint ids (1-50, no duplicates, all active).
    pub checkpoint_ids: Vec<i64>,
    /// The owning station.
    pub station_id: i64,
    /// Optional priority tier (low/medium/high/urgent).
    pub priority: Option<String>,
    /// Optional estimated duration in minutes (0-1440).
    pub estimated_duration_minutes: Option<u16>,
}

/// API request to update a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRouteRequest {
    /// The new display name, if changing.
    pub name: Option<String>,
    /// The replacement checkpoint id list, if changing.
    pub checkpoint_ids: Option<Vec<i64>>,
    /// The new priority tier, if changing.
    pub priority: Option<String>,
    /// The new estimated duration, if changing.
    pub estimated_duration_minutes: Option<u16>,
}

/// Route details returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// The route id.
    pub route_id: i64,
    /// The display name.
    pub name: String,
    /// Ordered checkpoint ids.
    pub checkpoint_ids: Vec<i64>,
    /// The owning station.
    pub station_id: i64,
    /// The priority tier, if set.
    pub priority: Option<String>,
    /// The estimated duration in minutes, if set.
    pub estimated_duration_minutes: Option<u16>,
    /// Whether the route is active.
    pub is_active: bool,
}

impl RouteResponse {
    /// Builds the response from a persisted route.
    #[must_use]
    pub fn from_domain(route: &Route) -> Self {
        Self {
            route_id: route.route_id.unwrap_or_default(),
            name: route.name.clone(),
            checkpoint_ids: route.checkpoint_ids.clone(),
            station_id: route.station_id,
            priority: route.priority.map(|p| p.as_str().to_string()),
            estimated_duration_minutes: route.estimated_duration_minutes,
            is_active: route.is_active,
        }
    }
}

/// API request to assign a route to an officer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRouteRequest {
    /// The officer receiving the assignment.
    pub user_id: i64,
    /// The route to patrol.
    pub route_id: i64,
    /// The station scope of the assignment.
    pub station_id: i64,
}

/// API request to start an assigned route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRouteRequest {
    /// The assignment to start.
    pub assignment_id: i64,
    /// Optional notes recorded at start time.
    pub notes: Option<String>,
}

/// The kind of a scan-attached media object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A photo.
    Image,
    /// A video clip.
    Video,
    /// An audio note.
    Audio,
}

/// One media object attached to a scan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUpload {
    /// The kind of media.
    pub kind: MediaKind,
    /// The declared content type (e.g., `image/jpeg`).
    pub content_type: String,
    /// The raw bytes.
    pub data: Vec<u8>,
}

/// API request to record a checkpoint scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCheckpointRequest {
    /// The scanning officer.
    pub user_id: i64,
    /// The raw QR payload string.
    pub qr_payload: String,
    /// Reported position latitude in decimal degrees.
    pub latitude: f64,
    /// Reported position longitude in decimal degrees.
    pub longitude: f64,
    /// The assignment this scan progresses.
    pub assignment_id: i64,
    /// The route the caller believes the assignment covers.
    pub route_id: i64,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Attached media objects.
    #[serde(default)]
    pub media: Vec<MediaUpload>,
    /// Arbitrary auxiliary data from the scanning device.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// API request to complete an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteRouteRequest {
    /// The assignment to complete.
    pub assignment_id: i64,
    /// Whether to complete despite unscanned checkpoints.
    #[serde(default)]
    pub force: bool,
    /// Optional completion notes.
    pub notes: Option<String>,
}

/// API request to cancel an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelAssignmentRequest {
    /// The assignment to cancel.
    pub assignment_id: i64,
    /// Optional cancellation reason.
    pub reason: Option<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// One checkpoint's display state within a progress response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointProgressEntry {
    /// The checkpoint id.
    pub checkpoint_id: i64,
    /// 1-based position in route order.
    pub position: usize,
    /// `completed`, `next`, or `pending`.
    pub state: String,
}

/// Aggregated progress for one assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// The assignment's current status.
    pub status: String,
    /// Total checkpoints on the route.
    pub total: usize,
    /// Checkpoints completed so far.
    pub completed: usize,
    /// Completion percentage (0-100).
    pub percentage: f64,
    /// Unscanned checkpoint ids in route order.
    pub remaining: Vec<i64>,
    /// The first unscanned checkpoint in route order, if any.
    pub next_checkpoint_id: Option<i64>,
    /// Per-checkpoint display states in route order.
    pub checkpoints: Vec<CheckpointProgressEntry>,
    /// The recommended next action.
    pub next_action: String,
}

impl ProgressResponse {
    /// Builds the response from computed progress.
    #[must_use]
    pub fn from_progress(progress: &AssignmentProgress) -> Self {
        let next_action: &str = match progress.next_action {
            NextAction::StartRoute => "start_route",
            NextAction::ScanNextCheckpoint => "scan_next_checkpoint",
            NextAction::CompleteRoute => "complete_route",
            NextAction::None => "none",
        };
        Self {
            status: progress.status.as_str().to_string(),
            total: progress.total,
            completed: progress.completed,
            percentage: progress.percentage,
            remaining: progress.remaining.clone(),
            next_checkpoint_id: progress.next_checkpoint_id,
            checkpoints: progress
                .checkpoints
                .iter()
                .map(|entry| CheckpointProgressEntry {
                    checkpoint_id: entry.checkpoint_id,
                    position: entry.position,
                    state: match entry.state {
                        CheckpointState::Completed => String::from("completed"),
                        CheckpointState::Next => String::from("next"),
                        CheckpointState::Pending => String::from("pending"),
                    },
                })
                .collect(),
            next_action: next_action.to_string(),
        }
    }
}

/// Assignment details plus derived progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResponse {
    /// The assignment id.
    pub assignment_id: i64,
    /// The assigned officer.
    pub user_id: i64,
    /// The route being patrolled.
    pub route_id: i64,
    /// The station scope.
    pub station_id: i64,
    /// The assignment's lifecycle status.
    pub status: String,
    /// Accumulated notes.
    pub notes: Option<String>,
    /// Derived progress against the route definition.
    pub progress: ProgressResponse,
    /// The audit event recorded for the operation, when one was produced.
    pub event_id: Option<i64>,
}

impl AssignmentResponse {
    /// Builds the response from a persisted assignment and its route.
    #[must_use]
    pub fn from_domain(
        assignment: &RouteAssignment,
        route: &Route,
        event_id: Option<i64>,
    ) -> Self {
        let progress = vigil::assignment_progress(assignment, route);
        Self {
            assignment_id: assignment.assignment_id.unwrap_or_default(),
            user_id: assignment.user_id,
            route_id: assignment.route_id,
            station_id: assignment.station_id,
            status: assignment.status.as_str().to_string(),
            notes: assignment.notes.clone(),
            progress: ProgressResponse::from_progress(&progress),
            event_id,
        }
    }
}

/// API response for a recorded checkpoint scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanCheckpointResponse {
    /// The scan row's id.
    pub scan_id: i64,
    /// The verified checkpoint.
    pub checkpoint_id: i64,
    /// Measured distance from the checkpoint center in meters.
    pub distance_m: f64,
    /// Stored media URIs, in upload order.
    pub media_uris: Vec<String>,
    /// The assignment after the scan, with progress.
    pub assignment: AssignmentResponse,
}
