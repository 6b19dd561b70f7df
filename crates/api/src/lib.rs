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

use vigil_audit::Actor;
use vigil_domain::DomainError;

mod error;
mod handlers;
mod media;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
pub use handlers::{
    assign_route, cancel_assignment, checkpoint_qr_payload, complete_route, create_checkpoint,
    create_patrol_user, create_route, create_station, deactivate_checkpoint, deactivate_route,
    delete_assignment, get_assignment, get_assignment_progress, get_checkpoint, get_patrol_user,
    get_route, list_assignments_for_user, scan_checkpoint, start_route, update_checkpoint,
    update_route,
};
pub use media::{
    InMemoryMediaStorage, MediaContext, MediaStorage, MediaStorageError, StoredMediaObject,
};
pub use request_response::{
    AssignRouteRequest, AssignmentResponse, CancelAssignmentRequest, CheckpointProgressEntry,
    CheckpointResponse, CompleteRouteRequest, CreateCheckpointRequest, CreatePatrolUserRequest,
    CreateRouteRequest, CreateStationRequest, MediaKind, MediaUpload, PatrolUserResponse,
    ProgressResponse, RouteResponse, ScanCheckpointRequest, ScanCheckpointResponse,
    StartRouteRequest, UpdateCheckpointRequest, UpdateRouteRequest,
};

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
/// Authentication itself (token issuance and verification) is an external
/// concern; the API layer receives an already-authenticated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: station administrators with structural authority.
    ///
    /// Admins may manage stations, patrol users, checkpoints, and routes,
    /// and may perform any assignment operation.
    Admin,
    /// Supervisor role: shift supervisors who direct patrols.
    ///
    /// Supervisors issue, cancel, force-complete, and delete assignments,
    /// and may perform any officer action.
    Supervisor,
    /// Officer role: patrol officers executing assigned routes.
    ///
    /// Officers start their routes, scan checkpoints, and complete
    /// naturally finished patrols.
    Officer,
}

impl Role {
    /// Parses a role from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a recognized role.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "officer" => Ok(Self::Officer),
            _ => Err(DomainError::InvalidName(format!("Unknown role: {s}"))),
        }
    }

    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Officer => "officer",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }
}

/// Role-gating for API operations.
///
/// Authorization is enforced before any command executes; an unauthorized
/// request never touches state.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(
        actor: &AuthenticatedActor,
        allowed: &[Role],
        action: &str,
        required_role: &str,
    ) -> Result<(), ApiError> {
        if allowed.contains(&actor.role) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized {
                action: action.to_string(),
                required_role: required_role.to_string(),
            })
        }
    }

    /// Station, user, checkpoint, and route administration requires Admin.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is not an Admin.
    pub fn authorize_administration(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        Self::require(actor, &[Role::Admin], action, "admin")
    }

    /// Assignment issuance and overrides require Supervisor or Admin.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the actor is an Officer.
    pub fn authorize_supervision(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        Self::require(actor, &[Role::Admin, Role::Supervisor], action, "supervisor")
    }

    /// Patrol execution (start, scan, natural completion) is open to any
    /// authenticated role.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible so the call sites read the
    /// same as the other checks.
    pub fn authorize_patrol(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        Self::require(
            actor,
            &[Role::Admin, Role::Supervisor, Role::Officer],
            action,
            "officer",
        )
    }
}
