// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Each handler verifies authorization, translates the request into
//! domain types, runs the pure core logic against a snapshot loaded from
//! persistence, persists the result, and translates errors to the API
//! contract. Mutating handlers expect the caller to hold exclusive access
//! to the persistence adapter for the whole call, so the loaded snapshot
//! and the persisted result see one consistent world; the storage
//! constraints back that up against anything racing outside the process.

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::media::{MediaContext, MediaStorage};
use crate::request_response::{
    AssignRouteRequest, AssignmentResponse, CancelAssignmentRequest, CheckpointResponse,
    CompleteRouteRequest, CreateCheckpointRequest, CreatePatrolUserRequest, CreateRouteRequest,
    CreateStationRequest, MediaKind, PatrolUserResponse, ProgressResponse, RouteResponse,
    ScanCheckpointRequest, ScanCheckpointResponse, StartRouteRequest, UpdateCheckpointRequest,
    UpdateRouteRequest,
};
use crate::{AuthenticatedActor, AuthorizationService};
use std::collections::HashSet;
use time::OffsetDateTime;
use tracing::info;
use vigil::{
    AssignRouteContext, AssignmentPolicy, AssignmentState, Command, ScanContext, ScanRequest,
    TransitionResult, VerifiedScan, apply, apply_assign_route, assignment_progress, verify_scan,
};
use vigil_audit::{Action, AuditEvent, Cause, StateSnapshot};
use vigil_domain::{
    Checkpoint, Coordinates, DomainError, PatrolUser, QrPayload, Route, RouteAssignment,
    RoutePriority, ScanMedia, Station, validate_checkpoints_active, validate_estimated_duration,
    validate_route_checkpoints,
};
use vigil_persistence::{PersistAssignmentResult, Persistence, PersistenceError};

/// Builds an administrative audit event (no assignment scope).
fn admin_event(
    actor: &AuthenticatedActor,
    cause: Cause,
    action: &str,
    details: String,
    before: String,
    after: String,
) -> AuditEvent {
    AuditEvent::new(
        actor.to_audit_actor(),
        cause,
        Action::new(action.to_string(), Some(details)),
        StateSnapshot::new(before),
        StateSnapshot::new(after),
        None,
        None,
    )
}

/// Loads an assignment and its route for a lifecycle operation.
fn load_assignment_state(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<AssignmentState, ApiError> {
    let assignment: RouteAssignment = persistence
        .get_assignment(assignment_id)
        .map_err(translate_persistence_error)?
        .filter(|assignment| assignment.is_active)
        .ok_or_else(|| {
            translate_domain_error(DomainError::AssignmentNotFound(assignment_id))
        })?;
    let route: Route = persistence
        .get_route(assignment.route_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::RouteNotFound(assignment.route_id)))?;
    Ok(AssignmentState { assignment, route })
}

// ============================================================================
// Stations & Patrol Users
// ============================================================================

/// Creates a station.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the name is invalid,
/// or persistence fails.
pub fn create_station(
    persistence: &mut Persistence,
    request: CreateStationRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_administration(actor, "create_station")?;

    let station: Station = Station::new(request.name).map_err(translate_domain_error)?;
    let station_id: i64 = persistence
        .create_station(&station)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "CreateStation",
        format!("Created station {station_id}"),
        String::from("station=none"),
        format!("station={station_id}"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(station_id, "Created station");
    Ok(station_id)
}

/// Creates a patrol user.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the station does not
/// exist, the name is invalid, or persistence fails.
pub fn create_patrol_user(
    persistence: &mut Persistence,
    request: CreatePatrolUserRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<i64, ApiError> {
    AuthorizationService::authorize_administration(actor, "create_patrol_user")?;

    persistence
        .get_station(request.station_id)
        .map_err(translate_persistence_error)?
        .filter(|station| station.is_active)
        .ok_or_else(|| translate_domain_error(DomainError::StationNotFound(request.station_id)))?;

    let user: PatrolUser =
        PatrolUser::new(request.name, request.badge_number, request.station_id)
            .map_err(translate_domain_error)?;
    let user_id: i64 = persistence
        .create_patrol_user(&user)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "CreatePatrolUser",
        format!("Created patrol user {user_id}"),
        String::from("user=none"),
        format!("user={user_id}"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(user_id, "Created patrol user");
    Ok(user_id)
}

/// Retrieves a patrol user by id.
///
/// # Errors
///
/// Returns an error if the user does not exist or the query fails.
pub fn get_patrol_user(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<PatrolUserResponse, ApiError> {
    let user: PatrolUser = persistence
        .get_patrol_user(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::UserNotFound(user_id)))?;
    Ok(PatrolUserResponse::from_domain(&user))
}

// ============================================================================
// Checkpoints
// ============================================================================

/// Creates a checkpoint, applying the policy default scan radius when the
/// request omits one.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the station does not
/// exist, the coordinates or radius are invalid, or persistence fails.
pub fn create_checkpoint(
    persistence: &mut Persistence,
    policy: &AssignmentPolicy,
    request: CreateCheckpointRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<CheckpointResponse, ApiError> {
    AuthorizationService::authorize_administration(actor, "create_checkpoint")?;

    persistence
        .get_station(request.station_id)
        .map_err(translate_persistence_error)?
        .filter(|station| station.is_active)
        .ok_or_else(|| translate_domain_error(DomainError::StationNotFound(request.station_id)))?;

    let position: Coordinates =
        Coordinates::new(request.latitude, request.longitude).map_err(translate_domain_error)?;
    let scan_radius_m: f64 = request.scan_radius_m.unwrap_or(policy.default_scan_radius_m);
    let mut checkpoint: Checkpoint =
        Checkpoint::new(request.name, position, scan_radius_m, request.station_id)
            .map_err(translate_domain_error)?;

    let checkpoint_id: i64 = persistence
        .create_checkpoint(&checkpoint)
        .map_err(translate_persistence_error)?;
    checkpoint.checkpoint_id = Some(checkpoint_id);

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "CreateCheckpoint",
        format!("Created checkpoint {checkpoint_id} ({scan_radius_m}m radius)"),
        String::from("checkpoint=none"),
        format!("checkpoint={checkpoint_id},active=true"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(checkpoint_id, "Created checkpoint");
    Ok(CheckpointResponse::from_domain(&checkpoint))
}

/// Updates a checkpoint's editable fields.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the checkpoint does not
/// exist, a new value is invalid, or persistence fails.
pub fn update_checkpoint(
    persistence: &mut Persistence,
    checkpoint_id: i64,
    request: UpdateCheckpointRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<CheckpointResponse, ApiError> {
    AuthorizationService::authorize_administration(actor, "update_checkpoint")?;

    let mut checkpoint: Checkpoint = persistence
        .get_checkpoint(checkpoint_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::CheckpointNotFound(checkpoint_id)))?;

    if let Some(name) = request.name {
        checkpoint.name = name;
    }
    if request.latitude.is_some() || request.longitude.is_some() {
        let latitude: f64 = request.latitude.unwrap_or_else(|| checkpoint.position.latitude());
        let longitude: f64 = request
            .longitude
            .unwrap_or_else(|| checkpoint.position.longitude());
        checkpoint.position =
            Coordinates::new(latitude, longitude).map_err(translate_domain_error)?;
    }
    if let Some(scan_radius_m) = request.scan_radius_m {
        vigil_domain::validate_scan_radius(scan_radius_m).map_err(translate_domain_error)?;
        checkpoint.scan_radius_m = scan_radius_m;
    }
    if checkpoint.name.trim().is_empty() {
        return Err(translate_domain_error(DomainError::InvalidName(
            String::from("Checkpoint name cannot be empty"),
        )));
    }

    persistence
        .update_checkpoint(checkpoint_id, &checkpoint)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "UpdateCheckpoint",
        format!("Updated checkpoint {checkpoint_id}"),
        format!("checkpoint={checkpoint_id}"),
        format!("checkpoint={checkpoint_id},updated=true"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(CheckpointResponse::from_domain(&checkpoint))
}

/// Soft-deletes a checkpoint. Routes referencing it keep their membership.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the checkpoint does not
/// exist, or persistence fails.
pub fn deactivate_checkpoint(
    persistence: &mut Persistence,
    checkpoint_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_administration(actor, "deactivate_checkpoint")?;

    persistence
        .deactivate_checkpoint(checkpoint_id)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "DeactivateCheckpoint",
        format!("Deactivated checkpoint {checkpoint_id}"),
        format!("checkpoint={checkpoint_id},active=true"),
        format!("checkpoint={checkpoint_id},active=false"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(checkpoint_id, "Deactivated checkpoint");
    Ok(())
}

/// Retrieves a checkpoint by id.
///
/// # Errors
///
/// Returns an error if the checkpoint does not exist or the query fails.
pub fn get_checkpoint(
    persistence: &mut Persistence,
    checkpoint_id: i64,
) -> Result<CheckpointResponse, ApiError> {
    let checkpoint: Checkpoint = persistence
        .get_checkpoint(checkpoint_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::CheckpointNotFound(checkpoint_id)))?;
    Ok(CheckpointResponse::from_domain(&checkpoint))
}

/// Returns the QR payload string for a checkpoint, for printing.
///
/// Image rendering is an external concern; this is the transportable
/// string the codec will accept back at scan time.
///
/// # Errors
///
/// Returns an error if the checkpoint does not exist or encoding fails.
pub fn checkpoint_qr_payload(
    persistence: &mut Persistence,
    checkpoint_id: i64,
) -> Result<String, ApiError> {
    let checkpoint: Checkpoint = persistence
        .get_checkpoint(checkpoint_id)
        .map_err(translate_persistence_error)?
        .filter(|checkpoint| checkpoint.is_active)
        .ok_or_else(|| translate_domain_error(DomainError::CheckpointNotFound(checkpoint_id)))?;
    let payload: QrPayload =
        QrPayload::for_checkpoint(&checkpoint).map_err(translate_domain_error)?;
    payload.encode().map_err(translate_domain_error)
}

// ============================================================================
// Routes
// ============================================================================

/// Validates a route request's checkpoint list against the store.
fn validate_route_definition(
    persistence: &mut Persistence,
    checkpoint_ids: &[i64],
) -> Result<(), ApiError> {
    validate_route_checkpoints(checkpoint_ids).map_err(translate_domain_error)?;
    let active: HashSet<i64> = persistence
        .get_active_checkpoint_ids(checkpoint_ids)
        .map_err(translate_persistence_error)?
        .into_iter()
        .collect();
    validate_checkpoints_active(checkpoint_ids, &active).map_err(translate_domain_error)
}

/// Parses an optional priority string.
fn parse_priority(priority: Option<&str>) -> Result<Option<RoutePriority>, ApiError> {
    priority
        .map(RoutePriority::parse)
        .transpose()
        .map_err(translate_domain_error)
}

/// Creates a route over active checkpoints.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the checkpoint list is
/// invalid (empty, too long, duplicated, or referencing a missing or
/// inactive checkpoint), or persistence fails.
pub fn create_route(
    persistence: &mut Persistence,
    request: CreateRouteRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RouteResponse, ApiError> {
    AuthorizationService::authorize_administration(actor, "create_route")?;

    persistence
        .get_station(request.station_id)
        .map_err(translate_persistence_error)?
        .filter(|station| station.is_active)
        .ok_or_else(|| translate_domain_error(DomainError::StationNotFound(request.station_id)))?;

    if request.name.trim().is_empty() {
        return Err(translate_domain_error(DomainError::InvalidName(
            String::from("Route name cannot be empty"),
        )));
    }
    validate_route_definition(persistence, &request.checkpoint_ids)?;
    if let Some(minutes) = request.estimated_duration_minutes {
        validate_estimated_duration(minutes).map_err(translate_domain_error)?;
    }
    let priority: Option<RoutePriority> = parse_priority(request.priority.as_deref())?;

    let mut route: Route = Route {
        route_id: None,
        name: request.name,
        checkpoint_ids: request.checkpoint_ids,
        station_id: request.station_id,
        priority,
        estimated_duration_minutes: request.estimated_duration_minutes,
        is_active: true,
    };
    let route_id: i64 = persistence
        .create_route(&route)
        .map_err(translate_persistence_error)?;
    route.route_id = Some(route_id);

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "CreateRoute",
        format!(
            "Created route {route_id} with {} checkpoints",
            route.total_checkpoints()
        ),
        String::from("route=none"),
        format!("route={route_id},checkpoints={}", route.total_checkpoints()),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(route_id, "Created route");
    Ok(RouteResponse::from_domain(&route))
}

/// Updates a route; a replacement checkpoint list is re-validated against
/// active checkpoints.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the route does not
/// exist, the new definition is invalid, or persistence fails.
pub fn update_route(
    persistence: &mut Persistence,
    route_id: i64,
    request: UpdateRouteRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<RouteResponse, ApiError> {
    AuthorizationService::authorize_administration(actor, "update_route")?;

    let mut route: Route = persistence
        .get_route(route_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::RouteNotFound(route_id)))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(translate_domain_error(DomainError::InvalidName(
                String::from("Route name cannot be empty"),
            )));
        }
        route.name = name;
    }
    if let Some(checkpoint_ids) = request.checkpoint_ids {
        validate_route_definition(persistence, &checkpoint_ids)?;
        route.checkpoint_ids = checkpoint_ids;
    }
    if let Some(priority) = request.priority.as_deref() {
        route.priority = Some(RoutePriority::parse(priority).map_err(translate_domain_error)?);
    }
    if let Some(minutes) = request.estimated_duration_minutes {
        validate_estimated_duration(minutes).map_err(translate_domain_error)?;
        route.estimated_duration_minutes = Some(minutes);
    }

    persistence
        .update_route(route_id, &route)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "UpdateRoute",
        format!("Updated route {route_id}"),
        format!("route={route_id}"),
        format!("route={route_id},updated=true"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(RouteResponse::from_domain(&route))
}

/// Soft-deletes a route.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the route does not
/// exist, or persistence fails.
pub fn deactivate_route(
    persistence: &mut Persistence,
    route_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_administration(actor, "deactivate_route")?;

    persistence
        .deactivate_route(route_id)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = admin_event(
        actor,
        cause,
        "DeactivateRoute",
        format!("Deactivated route {route_id}"),
        format!("route={route_id},active=true"),
        format!("route={route_id},active=false"),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    info!(route_id, "Deactivated route");
    Ok(())
}

/// Retrieves a route by id.
///
/// # Errors
///
/// Returns an error if the route does not exist or the query fails.
pub fn get_route(persistence: &mut Persistence, route_id: i64) -> Result<RouteResponse, ApiError> {
    let route: Route = persistence
        .get_route(route_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::RouteNotFound(route_id)))?;
    Ok(RouteResponse::from_domain(&route))
}

// ============================================================================
// Assignments
// ============================================================================

/// Assigns a route to an officer.
///
/// The arbitration snapshot is loaded and the new assignment persisted
/// under the caller's exclusive access; the storage constraints convert
/// any remaining race into a typed conflict, which is translated back to
/// the same error the in-process check would have produced.
///
/// # Errors
///
/// Returns an error if the actor may not assign routes, any arbitration
/// rule rejects the request (unknown user/route, inactive route, route
/// already assigned, duplicate self-assignment, concurrent-assignment
/// limit), or persistence fails.
pub fn assign_route(
    persistence: &mut Persistence,
    policy: &AssignmentPolicy,
    request: AssignRouteRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::authorize_supervision(actor, "assign_route")?;

    let user: Option<PatrolUser> = persistence
        .get_patrol_user(request.user_id)
        .map_err(translate_persistence_error)?
        .filter(|user| user.is_active);
    let route: Option<Route> = persistence
        .get_route(request.route_id)
        .map_err(translate_persistence_error)?;
    let route_active_assignment: Option<RouteAssignment> = persistence
        .find_active_assignment_for_route(request.route_id)
        .map_err(translate_persistence_error)?;
    let user_active_assignments: Vec<RouteAssignment> = persistence
        .list_active_assignments_for_user(request.user_id)
        .map_err(translate_persistence_error)?;

    let ctx: AssignRouteContext = AssignRouteContext {
        user,
        route: route.clone(),
        route_active_assignment,
        user_active_assignments,
    };
    let command: Command = Command::AssignRoute {
        user_id: request.user_id,
        route_id: request.route_id,
        station_id: request.station_id,
    };
    let transition: TransitionResult = apply_assign_route(
        policy,
        &ctx,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let persisted: PersistAssignmentResult = match persistence.create_assignment(&transition) {
        Ok(persisted) => persisted,
        Err(PersistenceError::ActiveAssignmentExists { route_id }) => {
            // Lost a race outside this process; report the holder the
            // same way the in-process check would have.
            let conflict: Option<RouteAssignment> = persistence
                .find_active_assignment_for_route(route_id)
                .map_err(translate_persistence_error)?;
            return Err(conflict.map_or(
                ApiError::DomainRuleViolation {
                    rule: String::from("route_already_assigned"),
                    message: format!("Route {route_id} already has an active assignment"),
                },
                |holder| {
                    translate_domain_error(DomainError::RouteAlreadyAssigned {
                        route_id,
                        assignment_id: holder.assignment_id.unwrap_or_default(),
                        holder_user_id: holder.user_id,
                        status: holder.status,
                    })
                },
            ));
        }
        Err(other) => return Err(translate_persistence_error(other)),
    };

    let assignment: RouteAssignment = persistence
        .get_assignment(persisted.assignment_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!(
                "Assignment {} vanished after creation",
                persisted.assignment_id
            ),
        })?;
    let route: Route = route.ok_or_else(|| ApiError::Internal {
        message: String::from("Route snapshot missing after successful arbitration"),
    })?;

    info!(
        assignment_id = persisted.assignment_id,
        route_id = request.route_id,
        user_id = request.user_id,
        "Assigned route"
    );
    Ok(AssignmentResponse::from_domain(
        &assignment,
        &route,
        Some(persisted.event_id),
    ))
}

/// Starts an assigned route: the officer is physically beginning the
/// patrol.
///
/// # Errors
///
/// Returns an error if the assignment is not in the `assigned` status,
/// does not exist, or persistence fails.
pub fn start_route(
    persistence: &mut Persistence,
    request: StartRouteRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::authorize_patrol(actor, "start_route")?;

    let state: AssignmentState = load_assignment_state(persistence, request.assignment_id)?;
    let command: Command = Command::StartRoute {
        assignment_id: request.assignment_id,
        notes: request.notes,
    };
    let transition: TransitionResult = apply(
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let event_id: i64 = persistence
        .update_assignment(&transition)
        .map_err(translate_persistence_error)?;

    info!(assignment_id = request.assignment_id, "Started route");
    Ok(AssignmentResponse::from_domain(
        &transition.assignment,
        &state.route,
        Some(event_id),
    ))
}

/// Records a checkpoint scan.
///
/// The verification chain runs first (nothing is written on any
/// failure); attached media is then stored through the blob-storage
/// collaborator (a failure there aborts the scan with nothing written);
/// finally the scan row, completion append, and any auto-completion are
/// persisted in one transaction.
///
/// # Errors
///
/// Returns the first failing verification check's error,
/// `ApiError::MediaUploadFailed` if blob storage rejects an attachment,
/// or a persistence error.
#[allow(clippy::too_many_lines)]
pub fn scan_checkpoint(
    persistence: &mut Persistence,
    media_storage: &dyn MediaStorage,
    request: ScanCheckpointRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScanCheckpointResponse, ApiError> {
    AuthorizationService::authorize_patrol(actor, "scan_checkpoint")?;

    // The first two verification steps run before any store access, in
    // spec order: position bounds, then payload decode.
    Coordinates::from_user_position(request.latitude, request.longitude)
        .map_err(translate_domain_error)?;
    let payload: QrPayload =
        QrPayload::decode(&request.qr_payload).map_err(translate_domain_error)?;

    let checkpoint: Option<Checkpoint> = persistence
        .get_checkpoint(payload.checkpoint_id)
        .map_err(translate_persistence_error)?;
    let assignment: Option<RouteAssignment> = persistence
        .get_assignment(request.assignment_id)
        .map_err(translate_persistence_error)?;
    let route: Option<Route> = match &assignment {
        Some(assignment) => persistence
            .get_route(assignment.route_id)
            .map_err(translate_persistence_error)?,
        None => None,
    };

    let scan_request: ScanRequest = ScanRequest {
        user_id: request.user_id,
        qr_payload: request.qr_payload.clone(),
        latitude: request.latitude,
        longitude: request.longitude,
        assignment_id: request.assignment_id,
        route_id: request.route_id,
        notes: request.notes.clone(),
        media: ScanMedia::empty(),
        metadata: request.metadata.clone(),
    };
    let ctx: ScanContext = ScanContext {
        checkpoint,
        assignment: assignment.clone(),
        route: route.clone(),
    };
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let mut verified: VerifiedScan =
        verify_scan(&scan_request, &ctx, now).map_err(translate_core_error)?;

    // Media is persisted before any database write; a failure aborts the
    // whole scan.
    let media_context: MediaContext = MediaContext {
        user_id: request.user_id,
        assignment_id: request.assignment_id,
        checkpoint_id: verified.checkpoint_id,
    };
    let mut media: ScanMedia = ScanMedia::empty();
    let mut media_uris: Vec<String> = Vec::with_capacity(request.media.len());
    for upload in &request.media {
        let uri: String = media_storage
            .store(&upload.data, &upload.content_type, &media_context)
            .map_err(|e| ApiError::MediaUploadFailed {
                message: e.to_string(),
            })?;
        media_uris.push(uri.clone());
        match upload.kind {
            MediaKind::Image => media.images.push(uri),
            MediaKind::Video => media.videos.push(uri),
            MediaKind::Audio => media.audios.push(uri),
        }
    }
    verified.scan.media = media;

    // Hand off to the state machine: append the completion and
    // auto-complete on full coverage.
    let state: AssignmentState = AssignmentState {
        assignment: assignment.ok_or_else(|| ApiError::Internal {
            message: String::from("Assignment snapshot missing after verification"),
        })?,
        route: route.ok_or_else(|| ApiError::Internal {
            message: String::from("Route snapshot missing after verification"),
        })?,
    };
    let command: Command = Command::RecordCheckpointCompletion {
        assignment_id: request.assignment_id,
        checkpoint_id: verified.checkpoint_id,
    };
    let transition: TransitionResult = apply(
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    let persisted = persistence
        .record_scan(&verified.scan, &transition)
        .map_err(translate_persistence_error)?;

    info!(
        scan_id = persisted.scan_id,
        assignment_id = request.assignment_id,
        checkpoint_id = verified.checkpoint_id,
        distance_m = verified.distance_m,
        completes_route = verified.completes_route,
        "Recorded checkpoint scan"
    );
    Ok(ScanCheckpointResponse {
        scan_id: persisted.scan_id,
        checkpoint_id: verified.checkpoint_id,
        distance_m: verified.distance_m,
        media_uris,
        assignment: AssignmentResponse::from_domain(
            &transition.assignment,
            &state.route,
            Some(persisted.event_id),
        ),
    })
}

/// Completes an assignment, optionally overriding unscanned checkpoints.
///
/// # Errors
///
/// Returns an error if the actor may not force-complete (force requires
/// Supervisor or Admin), the assignment is already terminal, checkpoints
/// remain and force was not requested, or persistence fails.
pub fn complete_route(
    persistence: &mut Persistence,
    request: CompleteRouteRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentResponse, ApiError> {
    if request.force {
        AuthorizationService::authorize_supervision(actor, "force_complete_route")?;
    } else {
        AuthorizationService::authorize_patrol(actor, "complete_route")?;
    }

    let state: AssignmentState = load_assignment_state(persistence, request.assignment_id)?;
    let command: Command = Command::CompleteRoute {
        assignment_id: request.assignment_id,
        force: request.force,
        notes: request.notes,
    };
    let transition: TransitionResult = apply(
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let event_id: i64 = persistence
        .update_assignment(&transition)
        .map_err(translate_persistence_error)?;

    info!(
        assignment_id = request.assignment_id,
        force = request.force,
        "Completed route"
    );
    Ok(AssignmentResponse::from_domain(
        &transition.assignment,
        &state.route,
        Some(event_id),
    ))
}

/// Cancels an assignment.
///
/// # Errors
///
/// Returns an error if the actor may not cancel, the assignment is
/// already terminal, or persistence fails.
pub fn cancel_assignment(
    persistence: &mut Persistence,
    request: CancelAssignmentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AssignmentResponse, ApiError> {
    AuthorizationService::authorize_supervision(actor, "cancel_assignment")?;

    let state: AssignmentState = load_assignment_state(persistence, request.assignment_id)?;
    let command: Command = Command::CancelAssignment {
        assignment_id: request.assignment_id,
        reason: request.reason,
        notes: request.notes,
    };
    let transition: TransitionResult = apply(
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let event_id: i64 = persistence
        .update_assignment(&transition)
        .map_err(translate_persistence_error)?;

    info!(assignment_id = request.assignment_id, "Cancelled assignment");
    Ok(AssignmentResponse::from_domain(
        &transition.assignment,
        &state.route,
        Some(event_id),
    ))
}

/// Soft-deletes an assignment that is not in progress.
///
/// # Errors
///
/// Returns an error if the actor may not delete, the assignment is in
/// progress, or persistence fails.
pub fn delete_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_supervision(actor, "delete_assignment")?;

    let state: AssignmentState = load_assignment_state(persistence, assignment_id)?;
    let command: Command = Command::DeleteAssignment { assignment_id };
    let transition: TransitionResult = apply(
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    persistence
        .update_assignment(&transition)
        .map_err(translate_persistence_error)?;

    info!(assignment_id, "Deleted assignment");
    Ok(())
}

/// Retrieves an assignment with derived progress.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or the query fails.
pub fn get_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<AssignmentResponse, ApiError> {
    let state: AssignmentState = load_assignment_state(persistence, assignment_id)?;
    Ok(AssignmentResponse::from_domain(
        &state.assignment,
        &state.route,
        None,
    ))
}

/// Computes an assignment's derived progress.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or the query fails.
pub fn get_assignment_progress(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<ProgressResponse, ApiError> {
    let state: AssignmentState = load_assignment_state(persistence, assignment_id)?;
    let progress = assignment_progress(&state.assignment, &state.route);
    Ok(ProgressResponse::from_progress(&progress))
}

/// Lists an officer's non-deleted assignments with progress, newest
/// first.
///
/// # Errors
///
/// Returns an error if a lookup fails.
pub fn list_assignments_for_user(
    persistence: &mut Persistence,
    user_id: i64,
) -> Result<Vec<AssignmentResponse>, ApiError> {
    let assignments: Vec<RouteAssignment> = persistence
        .list_assignments_for_user(user_id)
        .map_err(translate_persistence_error)?;

    let mut responses: Vec<AssignmentResponse> = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let route: Route = persistence
            .get_route(assignment.route_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| {
                translate_domain_error(DomainError::RouteNotFound(assignment.route_id))
            })?;
        responses.push(AssignmentResponse::from_domain(&assignment, &route, None));
    }
    Ok(responses)
}
