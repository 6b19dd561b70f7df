// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::AssignmentStatus;

/// Errors that can occur during domain validation.
///
/// Every variant carries the structured data a caller needs to decide
/// remediation (ids, counts, thresholds). These are expected results,
/// never crashes, and the core performs no retries on any of them.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A coordinate pair is outside valid bounds or not finite.
    InvalidCoordinate {
        /// The latitude value.
        latitude: f64,
        /// The longitude value.
        longitude: f64,
    },
    /// A user-reported position is outside valid bounds or not finite.
    InvalidPosition {
        /// The latitude value.
        latitude: f64,
        /// The longitude value.
        longitude: f64,
    },
    /// A QR payload could not be decoded as a checkpoint reference.
    MalformedQrCode {
        /// Description of the decode failure.
        reason: String,
    },
    /// Checkpoint does not exist or is not active.
    CheckpointNotFound(i64),
    /// A scan position is outside the checkpoint's geofence.
    OutOfRange {
        /// The checkpoint that was scanned.
        checkpoint_id: i64,
        /// The measured distance in meters.
        distance_m: f64,
        /// The checkpoint's configured scan radius in meters.
        allowed_radius_m: f64,
    },
    /// The referenced assignment does not exist, is not owned by the
    /// scanning user, is soft-deleted, or is not in progress.
    NoActiveAssignment {
        /// The assignment that was referenced.
        assignment_id: i64,
    },
    /// Assignment does not exist.
    AssignmentNotFound(i64),
    /// Route does not exist.
    RouteNotFound(i64),
    /// Route exists but is soft-deleted.
    RouteInactive(i64),
    /// The scanned checkpoint is not part of the assignment's route.
    CheckpointNotInRoute {
        /// The checkpoint that was scanned.
        checkpoint_id: i64,
        /// The route the assignment covers.
        route_id: i64,
    },
    /// The checkpoint has already been completed on this assignment.
    AlreadyScanned {
        /// The checkpoint that was scanned.
        checkpoint_id: i64,
        /// The assignment holding the completion.
        assignment_id: i64,
    },
    /// User does not exist.
    UserNotFound(i64),
    /// Station does not exist.
    StationNotFound(i64),
    /// Another active assignment already covers this route.
    RouteAlreadyAssigned {
        /// The contested route.
        route_id: i64,
        /// The conflicting assignment's id.
        assignment_id: i64,
        /// The officer holding the conflicting assignment.
        holder_user_id: i64,
        /// The conflicting assignment's status.
        status: AssignmentStatus,
    },
    /// This user already holds an active assignment for this route.
    DuplicateUserRouteAssignment {
        /// The requesting user.
        user_id: i64,
        /// The route.
        route_id: i64,
        /// The existing assignment's id.
        assignment_id: i64,
    },
    /// The user has reached the concurrent-assignment limit.
    MaxAssignmentsReached {
        /// The requesting user.
        user_id: i64,
        /// The user's current active assignment count.
        active_count: usize,
        /// The configured limit.
        limit: usize,
    },
    /// The requested operation is not valid from the assignment's
    /// current status.
    InvalidStateTransition {
        /// The assignment.
        assignment_id: i64,
        /// The assignment's current status.
        from: AssignmentStatus,
        /// The operation that was attempted.
        action: String,
    },
    /// The assignment is already completed.
    AlreadyCompleted {
        /// The assignment.
        assignment_id: i64,
    },
    /// The assignment has unscanned checkpoints and force-completion
    /// was not requested.
    IncompleteCheckpoints {
        /// The assignment.
        assignment_id: i64,
        /// Checkpoints completed so far.
        completed: usize,
        /// Total checkpoints on the route.
        total: usize,
        /// Checkpoints still unscanned.
        remaining: usize,
    },
    /// An in-progress assignment cannot be deleted (cancel it first).
    CannotDeleteInProgress {
        /// The assignment.
        assignment_id: i64,
    },
    /// A route must reference at least one checkpoint.
    EmptyRouteCheckpoints,
    /// A route references more checkpoints than allowed.
    TooManyRouteCheckpoints {
        /// The number of checkpoints supplied.
        count: usize,
        /// The maximum allowed.
        max: usize,
    },
    /// A route references the same checkpoint twice.
    DuplicateRouteCheckpoint {
        /// The duplicated checkpoint id.
        checkpoint_id: i64,
    },
    /// A route references a checkpoint that is missing or inactive.
    InactiveRouteCheckpoint {
        /// The offending checkpoint id.
        checkpoint_id: i64,
    },
    /// Scan radius must be a positive, finite number of meters.
    InvalidScanRadius {
        /// The invalid radius value.
        radius_m: f64,
    },
    /// Estimated duration is out of range.
    InvalidEstimatedDuration {
        /// The invalid duration in minutes.
        minutes: u16,
        /// The maximum allowed duration in minutes.
        max: u16,
    },
    /// Route priority string is not recognized.
    InvalidPriority(String),
    /// Assignment status string is not recognized.
    InvalidStatus(String),
    /// A name field is empty or invalid.
    InvalidName(String),
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinate {
                latitude,
                longitude,
            } => {
                write!(
                    f,
                    "Invalid coordinate ({latitude}, {longitude}): latitude must be in [-90, 90] and longitude in [-180, 180]"
                )
            }
            Self::InvalidPosition {
                latitude,
                longitude,
            } => {
                write!(
                    f,
                    "Invalid position ({latitude}, {longitude}): latitude must be in [-90, 90] and longitude in [-180, 180]"
                )
            }
            Self::MalformedQrCode { reason } => write!(f, "Malformed QR code: {reason}"),
            Self::CheckpointNotFound(id) => write!(f, "Checkpoint {id} not found"),
            Self::OutOfRange {
                checkpoint_id,
                distance_m,
                allowed_radius_m,
            } => {
                write!(
                    f,
                    "Position is {distance_m:.1}m from checkpoint {checkpoint_id}, outside the {allowed_radius_m:.1}m scan radius"
                )
            }
            Self::NoActiveAssignment { assignment_id } => {
                write!(
                    f,
                    "Assignment {assignment_id} is not an active in-progress assignment for this user"
                )
            }
            Self::AssignmentNotFound(id) => write!(f, "Assignment {id} not found"),
            Self::RouteNotFound(id) => write!(f, "Route {id} not found"),
            Self::RouteInactive(id) => write!(f, "Route {id} is inactive"),
            Self::CheckpointNotInRoute {
                checkpoint_id,
                route_id,
            } => {
                write!(
                    f,
                    "Checkpoint {checkpoint_id} is not part of route {route_id}"
                )
            }
            Self::AlreadyScanned {
                checkpoint_id,
                assignment_id,
            } => {
                write!(
                    f,
                    "Checkpoint {checkpoint_id} has already been scanned on assignment {assignment_id}"
                )
            }
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::StationNotFound(id) => write!(f, "Station {id} not found"),
            Self::RouteAlreadyAssigned {
                route_id,
                assignment_id,
                holder_user_id,
                status,
            } => {
                write!(
                    f,
                    "Route {route_id} is already assigned: assignment {assignment_id} held by user {holder_user_id} ({status})"
                )
            }
            Self::DuplicateUserRouteAssignment {
                user_id,
                route_id,
                assignment_id,
            } => {
                write!(
                    f,
                    "User {user_id} already holds assignment {assignment_id} for route {route_id}"
                )
            }
            Self::MaxAssignmentsReached {
                user_id,
                active_count,
                limit,
            } => {
                write!(
                    f,
                    "User {user_id} holds {active_count} active assignments; the limit is {limit}"
                )
            }
            Self::InvalidStateTransition {
                assignment_id,
                from,
                action,
            } => {
                write!(
                    f,
                    "Cannot {action} assignment {assignment_id} from status '{from}'"
                )
            }
            Self::AlreadyCompleted { assignment_id } => {
                write!(f, "Assignment {assignment_id} is already completed")
            }
            Self::IncompleteCheckpoints {
                assignment_id,
                completed,
                total,
                remaining,
            } => {
                write!(
                    f,
                    "Assignment {assignment_id} has {completed}/{total} checkpoints completed ({remaining} remaining); use force completion to override"
                )
            }
            Self::CannotDeleteInProgress { assignment_id } => {
                write!(
                    f,
                    "Assignment {assignment_id} is in progress and cannot be deleted; cancel it first"
                )
            }
            Self::EmptyRouteCheckpoints => {
                write!(f, "A route must reference at least one checkpoint")
            }
            Self::TooManyRouteCheckpoints { count, max } => {
                write!(
                    f,
                    "Route references {count} checkpoints; the maximum is {max}"
                )
            }
            Self::DuplicateRouteCheckpoint { checkpoint_id } => {
                write!(
                    f,
                    "Route references checkpoint {checkpoint_id} more than once"
                )
            }
            Self::InactiveRouteCheckpoint { checkpoint_id } => {
                write!(
                    f,
                    "Route references checkpoint {checkpoint_id}, which is missing or inactive"
                )
            }
            Self::InvalidScanRadius { radius_m } => {
                write!(
                    f,
                    "Invalid scan radius: {radius_m} (must be positive and finite)"
                )
            }
            Self::InvalidEstimatedDuration { minutes, max } => {
                write!(
                    f,
                    "Invalid estimated duration: {minutes} minutes (must be at most {max})"
                )
            }
            Self::InvalidPriority(msg) => write!(f, "Invalid route priority: {msg}"),
            Self::InvalidStatus(msg) => write!(f, "Invalid assignment status: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
