// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Checkpoint scan verification.
//!
//! A scan proves an officer's presence at a checkpoint: the QR payload
//! identifies the checkpoint and the reported GPS position must fall
//! inside its geofence. Verification is a pure, ordered precondition
//! chain; every failure is terminal for the request and nothing is
//! written before all checks pass. Side effects (media upload, the scan
//! row, the completion append) are orchestrated by the API layer after
//! verification succeeds.

use crate::error::CoreError;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use vigil_domain::{
    AssignmentStatus, Checkpoint, CheckpointScan, Coordinates, DomainError, QrPayload, Route,
    RouteAssignment, ScanMedia, haversine_distance_m,
};

/// A scan request as received from the officer's device.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
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
    /// Media URIs already persisted through blob storage.
    pub media: ScanMedia,
    /// Arbitrary auxiliary data supplied by the scanning device.
    pub metadata: Map<String, Value>,
}

/// The collaborator lookups a scan verification needs.
///
/// The caller resolves these against the stores after decoding the QR
/// payload; `verify_scan` re-runs the full ordered chain against this
/// snapshot so the checks stay pure and their precedence is testable.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanContext {
    /// The checkpoint referenced by the QR payload, if it resolved to an
    /// active checkpoint.
    pub checkpoint: Option<Checkpoint>,
    /// The referenced assignment, if it resolved.
    pub assignment: Option<RouteAssignment>,
    /// The assignment's route, if it resolved.
    pub route: Option<Route>,
}

/// A verified scan, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedScan {
    /// The scan audit row to append (validity already established).
    pub scan: CheckpointScan,
    /// The verified checkpoint id.
    pub checkpoint_id: i64,
    /// The measured distance from the checkpoint center in meters.
    pub distance_m: f64,
    /// Whether this completion will cover the route's full checkpoint
    /// set, auto-completing the assignment.
    pub completes_route: bool,
}

/// Verifies a scan against the checkpoint geofence and the assignment's
/// remaining checkpoints.
///
/// The checks run in a fixed order and fail fast:
///
/// 1. The reported position must be a valid coordinate pair
///    (`InvalidPosition`).
/// 2. The QR payload must decode as a checkpoint reference
///    (`MalformedQrCode`).
/// 3. The referenced checkpoint must exist and be active
///    (`CheckpointNotFound`).
/// 4. The measured Haversine distance must be within the checkpoint's
///    scan radius (`OutOfRange`, reporting distance and radius — the
///    officer must physically move closer and resubmit).
/// 5. The assignment must exist, belong to the scanning user, be active,
///    and be in progress (`NoActiveAssignment`).
/// 6. The assignment's route must exist (`RouteNotFound`).
/// 7. The checkpoint must be part of the route (`CheckpointNotInRoute`).
/// 8. The checkpoint must not already be completed (`AlreadyScanned`).
///
/// # Arguments
///
/// * `request` - The scan request
/// * `ctx` - The resolved collaborator lookups
/// * `now` - The scan timestamp
///
/// # Errors
///
/// Returns the first failing check's domain error, wrapped in
/// `CoreError::DomainViolation`.
pub fn verify_scan(
    request: &ScanRequest,
    ctx: &ScanContext,
    now: OffsetDateTime,
) -> Result<VerifiedScan, CoreError> {
    // 1. Reported position must parse as a valid coordinate pair
    let position: Coordinates =
        Coordinates::from_user_position(request.latitude, request.longitude)?;

    // 2. QR payload must decode as a checkpoint reference
    let payload: QrPayload = QrPayload::decode(&request.qr_payload)?;

    // 3. Referenced checkpoint must exist and be active
    let checkpoint: &Checkpoint = ctx
        .checkpoint
        .as_ref()
        .filter(|checkpoint| {
            checkpoint.is_active && checkpoint.checkpoint_id == Some(payload.checkpoint_id)
        })
        .ok_or(DomainError::CheckpointNotFound(payload.checkpoint_id))?;

    // 4. Position must be inside the geofence
    let distance_m: f64 = haversine_distance_m(position, checkpoint.position);
    if distance_m > checkpoint.scan_radius_m {
        return Err(CoreError::DomainViolation(DomainError::OutOfRange {
            checkpoint_id: payload.checkpoint_id,
            distance_m,
            allowed_radius_m: checkpoint.scan_radius_m,
        }));
    }

    // 5. Assignment must be this user's active, in-progress assignment
    let assignment: &RouteAssignment = ctx
        .assignment
        .as_ref()
        .filter(|assignment| {
            assignment.user_id == request.user_id
                && assignment.is_active
                && assignment.status == AssignmentStatus::InProgress
        })
        .ok_or(DomainError::NoActiveAssignment {
            assignment_id: request.assignment_id,
        })?;

    // 6. The assignment's route must exist
    let route: &Route = ctx
        .route
        .as_ref()
        .filter(|route| route.route_id == Some(assignment.route_id))
        .ok_or(DomainError::RouteNotFound(request.route_id))?;

    // 7. The checkpoint must be part of the route
    if !route.contains_checkpoint(payload.checkpoint_id) {
        return Err(CoreError::DomainViolation(
            DomainError::CheckpointNotInRoute {
                checkpoint_id: payload.checkpoint_id,
                route_id: assignment.route_id,
            },
        ));
    }

    // 8. The checkpoint must not already be completed
    if assignment.has_completed(payload.checkpoint_id) {
        return Err(CoreError::DomainViolation(DomainError::AlreadyScanned {
            checkpoint_id: payload.checkpoint_id,
            assignment_id: request.assignment_id,
        }));
    }

    let completes_route: bool = route
        .checkpoint_ids
        .iter()
        .all(|&id| id == payload.checkpoint_id || assignment.has_completed(id));

    let scan: CheckpointScan = CheckpointScan {
        scan_id: None,
        user_id: request.user_id,
        checkpoint_id: payload.checkpoint_id,
        route_id: assignment.route_id,
        assignment_id: request.assignment_id,
        scanned_at: now,
        position,
        distance_m,
        is_valid: true,
        notes: request.notes.clone(),
        media: request.media.clone(),
        metadata: request.metadata.clone(),
    };

    Ok(VerifiedScan {
        scan,
        checkpoint_id: payload.checkpoint_id,
        distance_m,
        completes_route,
    })
}
