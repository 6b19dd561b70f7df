// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use vigil::AssignmentPolicy;
use vigil_api::{
    ApiError, AssignRouteRequest, AssignmentResponse, AuthenticatedActor, CancelAssignmentRequest,
    CheckpointResponse, CompleteRouteRequest, CreateCheckpointRequest, CreatePatrolUserRequest,
    CreateRouteRequest, CreateStationRequest, InMemoryMediaStorage, PatrolUserResponse,
    ProgressResponse, Role, RouteResponse, ScanCheckpointRequest, ScanCheckpointResponse,
    StartRouteRequest, UpdateCheckpointRequest, UpdateRouteRequest, assign_route,
    cancel_assignment, checkpoint_qr_payload, complete_route, create_checkpoint,
    create_patrol_user, create_route, create_station, deactivate_checkpoint, deactivate_route,
    delete_assignment, get_assignment, get_assignment_progress, get_checkpoint, get_patrol_user,
    get_route, list_assignments_for_user, scan_checkpoint, start_route, update_checkpoint,
    update_route,
};
use vigil_audit::Cause;
use vigil_persistence::Persistence;

/// Vigil Server - HTTP server for the Vigil Patrol Management System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Maximum concurrent active assignments per officer
    #[arg(long, default_value_t = 5)]
    max_assignments: usize,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex held for the full span of
/// each mutating request: the arbitration snapshot and the persisted
/// result see one consistent world, with the database constraints as the
/// second line of defense.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// The blob-storage collaborator for scan media.
    media: Arc<InMemoryMediaStorage>,
    /// The assignment arbitration policy.
    policy: AssignmentPolicy,
}

/// Authentication and cause fields carried by every mutating request.
///
/// Token verification is an external concern; requests carry the already
/// verified actor identity and role plus the request cause for the audit
/// trail.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct Authenticated<T> {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor (admin/supervisor/officer).
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The operation payload.
    #[serde(flatten)]
    request: T,
}

/// Actor and cause fields for endpoints without a payload of their own.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorOnly {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor (admin/supervisor/officer).
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API response for write operations without a richer payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// The created resource's id, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
}

/// API response carrying a checkpoint's QR payload string.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QrPayloadResponse {
    /// The checkpoint id.
    checkpoint_id: i64,
    /// The transportable payload string a QR renderer would encode.
    qr_payload: String,
}

/// An error response with a transport status code.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::MediaUploadFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Infrastructure { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Parses the role string from a request.
fn parse_role(role: &str) -> Result<Role, HttpError> {
    Role::parse(role).map_err(|_| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Unknown actor role: {role}"),
    })
}

/// Builds the authenticated actor and cause from envelope fields.
fn actor_and_cause(
    actor_id: String,
    actor_role: &str,
    cause_id: String,
    cause_description: String,
) -> Result<(AuthenticatedActor, Cause), HttpError> {
    if actor_id.is_empty() {
        return Err(HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Actor ID cannot be empty"),
        });
    }
    let role: Role = parse_role(actor_role)?;
    Ok((
        AuthenticatedActor::new(actor_id, role),
        Cause::new(cause_id, cause_description),
    ))
}

// ============================================================================
// Station & user handlers
// ============================================================================

/// Handler for POST `/stations`.
async fn handle_create_station(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CreateStationRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let station_id: i64 = create_station(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Created station {station_id}")),
        id: Some(station_id),
    }))
}

/// Handler for POST `/users`.
async fn handle_create_patrol_user(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CreatePatrolUserRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let user_id: i64 = create_patrol_user(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Created patrol user {user_id}")),
        id: Some(user_id),
    }))
}

/// Handler for GET `/users/{user_id}`.
async fn handle_get_patrol_user(
    AxumState(state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<PatrolUserResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: PatrolUserResponse = get_patrol_user(&mut persistence, user_id)?;
    Ok(Json(response))
}

// ============================================================================
// Checkpoint handlers
// ============================================================================

/// Handler for POST `/checkpoints`.
async fn handle_create_checkpoint(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CreateCheckpointRequest>>,
) -> Result<Json<CheckpointResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: CheckpointResponse =
        create_checkpoint(&mut persistence, &state.policy, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for PUT `/checkpoints/{checkpoint_id}`.
async fn handle_update_checkpoint(
    AxumState(state): AxumState<AppState>,
    Path(checkpoint_id): Path<i64>,
    Json(req): Json<Authenticated<UpdateCheckpointRequest>>,
) -> Result<Json<CheckpointResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: CheckpointResponse =
        update_checkpoint(&mut persistence, checkpoint_id, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for DELETE `/checkpoints/{checkpoint_id}` (soft delete).
async fn handle_deactivate_checkpoint(
    AxumState(state): AxumState<AppState>,
    Path(checkpoint_id): Path<i64>,
    Json(req): Json<ActorOnly>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    deactivate_checkpoint(&mut persistence, checkpoint_id, &actor, cause)?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deactivated checkpoint {checkpoint_id}")),
        id: Some(checkpoint_id),
    }))
}

/// Handler for GET `/checkpoints/{checkpoint_id}`.
async fn handle_get_checkpoint(
    AxumState(state): AxumState<AppState>,
    Path(checkpoint_id): Path<i64>,
) -> Result<Json<CheckpointResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: CheckpointResponse = get_checkpoint(&mut persistence, checkpoint_id)?;
    Ok(Json(response))
}

/// Handler for GET `/checkpoints/{checkpoint_id}/qr`.
///
/// Returns the transportable QR payload string; image rendering is left
/// to the caller.
async fn handle_checkpoint_qr(
    AxumState(state): AxumState<AppState>,
    Path(checkpoint_id): Path<i64>,
) -> Result<Json<QrPayloadResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let qr_payload: String = checkpoint_qr_payload(&mut persistence, checkpoint_id)?;
    Ok(Json(QrPayloadResponse {
        checkpoint_id,
        qr_payload,
    }))
}

// ============================================================================
// Route handlers
// ============================================================================

/// Handler for POST `/routes`.
async fn handle_create_route(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CreateRouteRequest>>,
) -> Result<Json<RouteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: RouteResponse = create_route(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for PUT `/routes/{route_id}`.
async fn handle_update_route(
    AxumState(state): AxumState<AppState>,
    Path(route_id): Path<i64>,
    Json(req): Json<Authenticated<UpdateRouteRequest>>,
) -> Result<Json<RouteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: RouteResponse =
        update_route(&mut persistence, route_id, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for DELETE `/routes/{route_id}` (soft delete).
async fn handle_deactivate_route(
    AxumState(state): AxumState<AppState>,
    Path(route_id): Path<i64>,
    Json(req): Json<ActorOnly>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    deactivate_route(&mut persistence, route_id, &actor, cause)?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deactivated route {route_id}")),
        id: Some(route_id),
    }))
}

/// Handler for GET `/routes/{route_id}`.
async fn handle_get_route(
    AxumState(state): AxumState<AppState>,
    Path(route_id): Path<i64>,
) -> Result<Json<RouteResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: RouteResponse = get_route(&mut persistence, route_id)?;
    Ok(Json(response))
}

// ============================================================================
// Assignment handlers
// ============================================================================

/// Handler for POST `/assignments`.
async fn handle_assign_route(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<AssignRouteRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        user_id = req.request.user_id,
        route_id = req.request.route_id,
        "Handling assign_route request"
    );
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: AssignmentResponse =
        assign_route(&mut persistence, &state.policy, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/assignments/start`.
async fn handle_start_route(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<StartRouteRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: AssignmentResponse = start_route(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/assignments/scan`.
async fn handle_scan_checkpoint(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<ScanCheckpointRequest>>,
) -> Result<Json<ScanCheckpointResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        assignment_id = req.request.assignment_id,
        "Handling scan_checkpoint request"
    );
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: ScanCheckpointResponse = scan_checkpoint(
        &mut persistence,
        state.media.as_ref(),
        req.request,
        &actor,
        cause,
    )?;

    Ok(Json(response))
}

/// Handler for POST `/assignments/complete`.
async fn handle_complete_route(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CompleteRouteRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: AssignmentResponse =
        complete_route(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for POST `/assignments/cancel`.
async fn handle_cancel_assignment(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<Authenticated<CancelAssignmentRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    let response: AssignmentResponse =
        cancel_assignment(&mut persistence, req.request, &actor, cause)?;

    Ok(Json(response))
}

/// Handler for DELETE `/assignments/{assignment_id}` (soft delete).
async fn handle_delete_assignment(
    AxumState(state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<ActorOnly>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (actor, cause) = actor_and_cause(
        req.actor_id,
        &req.actor_role,
        req.cause_id,
        req.cause_description,
    )?;

    let mut persistence = state.persistence.lock().await;
    delete_assignment(&mut persistence, assignment_id, &actor, cause)?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Deleted assignment {assignment_id}")),
        id: Some(assignment_id),
    }))
}

/// Handler for GET `/assignments/{assignment_id}`.
async fn handle_get_assignment(
    AxumState(state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: AssignmentResponse = get_assignment(&mut persistence, assignment_id)?;
    Ok(Json(response))
}

/// Handler for GET `/assignments/{assignment_id}/progress`.
async fn handle_get_assignment_progress(
    AxumState(state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
) -> Result<Json<ProgressResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ProgressResponse = get_assignment_progress(&mut persistence, assignment_id)?;
    Ok(Json(response))
}

/// Handler for GET `/users/{user_id}/assignments`.
async fn handle_list_assignments_for_user(
    AxumState(state): AxumState<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<AssignmentResponse>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: Vec<AssignmentResponse> =
        list_assignments_for_user(&mut persistence, user_id)?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/stations", post(handle_create_station))
        .route("/users", post(handle_create_patrol_user))
        .route("/users/{user_id}", get(handle_get_patrol_user))
        .route("/users/{user_id}/assignments", get(handle_list_assignments_for_user))
        .route("/checkpoints", post(handle_create_checkpoint))
        .route("/checkpoints/{checkpoint_id}", put(handle_update_checkpoint))
        .route("/checkpoints/{checkpoint_id}", delete(handle_deactivate_checkpoint))
        .route("/checkpoints/{checkpoint_id}", get(handle_get_checkpoint))
        .route("/checkpoints/{checkpoint_id}/qr", get(handle_checkpoint_qr))
        .route("/routes", post(handle_create_route))
        .route("/routes/{route_id}", put(handle_update_route))
        .route("/routes/{route_id}", delete(handle_deactivate_route))
        .route("/routes/{route_id}", get(handle_get_route))
        .route("/assignments", post(handle_assign_route))
        .route("/assignments/start", post(handle_start_route))
        .route("/assignments/scan", post(handle_scan_checkpoint))
        .route("/assignments/complete", post(handle_complete_route))
        .route("/assignments/cancel", post(handle_cancel_assignment))
        .route("/assignments/{assignment_id}", delete(handle_delete_assignment))
        .route("/assignments/{assignment_id}", get(handle_get_assignment))
        .route(
            "/assignments/{assignment_id}/progress",
            get(handle_get_assignment_progress),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Vigil Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        media: Arc::new(InMemoryMediaStorage::new()),
        policy: AssignmentPolicy::new(args.max_assignments),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
