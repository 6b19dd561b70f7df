// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use vigil::CoreError;
use vigil_domain::DomainError;
use vigil_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Domain errors are translated explicitly and never leaked
/// directly; the translated message carries the structured data (ids,
/// distances, counts, thresholds) a caller needs to decide remediation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Attached media could not be persisted; the scan was aborted and
    /// nothing was written.
    MediaUploadFailed {
        /// A description of the storage failure.
        message: String,
    },
    /// A persistence or storage-layer transient failure. This is the only
    /// class eligible for caller-side retry.
    Infrastructure {
        /// A description of the infrastructure failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::MediaUploadFailed { message } => {
                write!(f, "Media upload failed: {message}")
            }
            Self::Infrastructure { message } => {
                write!(f, "Infrastructure error: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidCoordinate { .. } => ApiError::InvalidInput {
            field: String::from("coordinates"),
            message,
        },
        DomainError::InvalidPosition { .. } => ApiError::InvalidInput {
            field: String::from("position"),
            message,
        },
        DomainError::MalformedQrCode { .. } => ApiError::InvalidInput {
            field: String::from("qr_payload"),
            message,
        },
        DomainError::CheckpointNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Checkpoint"),
            message,
        },
        DomainError::OutOfRange { .. } => ApiError::DomainRuleViolation {
            rule: String::from("geofence_out_of_range"),
            message,
        },
        DomainError::NoActiveAssignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_active_assignment"),
            message,
        },
        DomainError::AssignmentNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Assignment"),
            message,
        },
        DomainError::RouteNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Route"),
            message,
        },
        DomainError::RouteInactive(_) => ApiError::DomainRuleViolation {
            rule: String::from("route_inactive"),
            message,
        },
        DomainError::CheckpointNotInRoute { .. } => ApiError::DomainRuleViolation {
            rule: String::from("checkpoint_not_in_route"),
            message,
        },
        DomainError::AlreadyScanned { .. } => ApiError::DomainRuleViolation {
            rule: String::from("already_scanned"),
            message,
        },
        DomainError::UserNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message,
        },
        DomainError::StationNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Station"),
            message,
        },
        DomainError::RouteAlreadyAssigned { .. } => ApiError::DomainRuleViolation {
            rule: String::from("route_already_assigned"),
            message,
        },
        DomainError::DuplicateUserRouteAssignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("duplicate_user_route_assignment"),
            message,
        },
        DomainError::MaxAssignmentsReached { .. } => ApiError::DomainRuleViolation {
            rule: String::from("max_assignments_reached"),
            message,
        },
        DomainError::InvalidStateTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("invalid_state_transition"),
            message,
        },
        DomainError::AlreadyCompleted { .. } => ApiError::DomainRuleViolation {
            rule: String::from("already_completed"),
            message,
        },
        DomainError::IncompleteCheckpoints { .. } => ApiError::DomainRuleViolation {
            rule: String::from("incomplete_checkpoints"),
            message,
        },
        DomainError::CannotDeleteInProgress { .. } => ApiError::DomainRuleViolation {
            rule: String::from("cannot_delete_in_progress"),
            message,
        },
        DomainError::EmptyRouteCheckpoints
        | DomainError::TooManyRouteCheckpoints { .. }
        | DomainError::DuplicateRouteCheckpoint { .. }
        | DomainError::InactiveRouteCheckpoint { .. } => ApiError::InvalidInput {
            field: String::from("checkpoint_ids"),
            message,
        },
        DomainError::InvalidScanRadius { .. } => ApiError::InvalidInput {
            field: String::from("scan_radius_m"),
            message,
        },
        DomainError::InvalidEstimatedDuration { .. } => ApiError::InvalidInput {
            field: String::from("estimated_duration_minutes"),
            message,
        },
        DomainError::InvalidPriority(_) => ApiError::InvalidInput {
            field: String::from("priority"),
            message,
        },
        DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Conflict rejections from the storage constraints keep their domain
/// meaning; everything else is an infrastructure failure, the only class
/// eligible for caller-side retry.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} does not exist"),
        },
        PersistenceError::ActiveAssignmentExists { route_id } => ApiError::DomainRuleViolation {
            rule: String::from("route_already_assigned"),
            message: format!("Route {route_id} already has an active assignment"),
        },
        PersistenceError::DuplicateCompletion {
            assignment_id,
            checkpoint_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("already_scanned"),
            message: format!(
                "Checkpoint {checkpoint_id} has already been scanned on assignment {assignment_id}"
            ),
        },
        PersistenceError::UnexpectedAssignmentStatus { assignment_id } => {
            ApiError::DomainRuleViolation {
                rule: String::from("no_active_assignment"),
                message: format!(
                    "Assignment {assignment_id} is no longer in progress"
                ),
            }
        }
        other => ApiError::Infrastructure {
            message: other.to_string(),
        },
    }
}
