// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{AssignRouteContext, AssignmentPolicy, AssignmentState, TransitionResult};
use time::OffsetDateTime;
use vigil_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use vigil_domain::{AssignmentStatus, DomainError, Route, RouteAssignment};

/// Appends a note line to an assignment's accumulated notes.
fn append_note(existing: Option<String>, note: &str) -> Option<String> {
    match existing {
        Some(mut text) => {
            text.push('\n');
            text.push_str(note);
            Some(text)
        }
        None => Some(note.to_string()),
    }
}

/// Returns whether the completed set covers every checkpoint on the route.
fn covers_route(route: &Route, completed: &[i64]) -> bool {
    route
        .checkpoint_ids
        .iter()
        .all(|checkpoint_id| completed.contains(checkpoint_id))
}

/// Applies an `AssignRoute` command, producing a new assignment and audit
/// event.
///
/// The four conflict checks and the create are evaluated against the
/// single consistent snapshot in `ctx`; the caller must load that snapshot
/// and persist the result within one critical section (the storage layer's
/// uniqueness constraints are the backstop for anything racing past it).
///
/// # Arguments
///
/// * `policy` - The assignment arbitration policy
/// * `ctx` - The consistent arbitration snapshot
/// * `command` - The `AssignRoute` command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The assignment timestamp
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new assignment and audit event
/// * `Err(CoreError)` if the command violates an arbitration rule
///
/// # Errors
///
/// Returns an error if:
/// - The user or route lookup missed
/// - The route is soft-deleted
/// - Another active assignment already covers the route
/// - The user already holds an active assignment for this route
/// - The user has reached the concurrent-assignment limit
pub fn apply_assign_route(
    policy: &AssignmentPolicy,
    ctx: &AssignRouteContext,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let Command::AssignRoute {
        user_id,
        route_id,
        station_id,
    } = command
    else {
        // Lifecycle commands on existing assignments use apply() instead
        return Err(CoreError::Internal(String::from(
            "apply_assign_route called with a non-assignment command",
        )));
    };

    // Validate the user lookup resolved to an active officer
    if ctx.user.is_none() {
        return Err(CoreError::DomainViolation(DomainError::UserNotFound(
            user_id,
        )));
    }

    // Validate the route exists and is active
    let Some(route) = &ctx.route else {
        return Err(CoreError::DomainViolation(DomainError::RouteNotFound(
            route_id,
        )));
    };
    if !route.is_active {
        return Err(CoreError::DomainViolation(DomainError::RouteInactive(
            route_id,
        )));
    }

    // One officer per route at a time; report the conflicting holder
    if let Some(conflict) = &ctx.route_active_assignment {
        if conflict.user_id == user_id {
            return Err(CoreError::DomainViolation(
                DomainError::DuplicateUserRouteAssignment {
                    user_id,
                    route_id,
                    assignment_id: conflict.assignment_id.unwrap_or_default(),
                },
            ));
        }
        return Err(CoreError::DomainViolation(
            DomainError::RouteAlreadyAssigned {
                route_id,
                assignment_id: conflict.assignment_id.unwrap_or_default(),
                holder_user_id: conflict.user_id,
                status: conflict.status,
            },
        ));
    }

    // No duplicate self-assignment through a stale route snapshot
    if let Some(existing) = ctx
        .user_active_assignments
        .iter()
        .find(|assignment| assignment.route_id == route_id)
    {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateUserRouteAssignment {
                user_id,
                route_id,
                assignment_id: existing.assignment_id.unwrap_or_default(),
            },
        ));
    }

    // Concurrent-assignment cap
    let active_count: usize = ctx.user_active_assignments.len();
    if active_count >= policy.max_active_assignments {
        return Err(CoreError::DomainViolation(
            DomainError::MaxAssignmentsReached {
                user_id,
                active_count,
                limit: policy.max_active_assignments,
            },
        ));
    }

    let assignment: RouteAssignment = RouteAssignment::new(user_id, route_id, station_id, now);

    let before: StateSnapshot = StateSnapshot::new(format!(
        "route={route_id},active_assignment=none,user_active={active_count}"
    ));
    let after: StateSnapshot = StateSnapshot::new(format!(
        "route={route_id},status=assigned,completed=0/{}",
        route.total_checkpoints()
    ));
    let action: Action = Action::new(
        String::from("AssignRoute"),
        Some(format!("Assigned route {route_id} to user {user_id}")),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, Some(route_id), None);

    Ok(TransitionResult {
        assignment,
        audit_event,
    })
}

/// Applies a lifecycle command to an existing assignment, producing the
/// updated assignment and audit event.
///
/// # Arguments
///
/// * `state` - The current assignment state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The transition timestamp
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the updated assignment and audit
///   event
/// * `Err(CoreError)` if the command is invalid from the current status
///
/// # Errors
///
/// Returns an error if the command violates the assignment lifecycle
/// rules (see each command's documentation).
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &AssignmentState,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::StartRoute {
            assignment_id,
            notes,
        } => {
            if state.assignment.status != AssignmentStatus::Assigned {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStateTransition {
                        assignment_id,
                        from: state.assignment.status,
                        action: String::from("start"),
                    },
                ));
            }

            let before: StateSnapshot = state.to_snapshot();

            let mut assignment: RouteAssignment = state.assignment.clone();
            assignment.status = AssignmentStatus::InProgress;
            // "Start" means physically beginning the patrol; the
            // administrative assignment time is overwritten on purpose.
            assignment.start_date = now;
            if let Some(note) = notes {
                assignment.notes = append_note(assignment.notes, &note);
            }

            let after: StateSnapshot = AssignmentState {
                assignment: assignment.clone(),
                route: state.route.clone(),
            }
            .to_snapshot();

            let action: Action = Action::new(
                String::from("StartRoute"),
                Some(format!("Started patrol for assignment {assignment_id}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Some(state.route.route_id.unwrap_or_default()),
                Some(assignment_id),
            );

            Ok(TransitionResult {
                assignment,
                audit_event,
            })
        }
        Command::RecordCheckpointCompletion {
            assignment_id,
            checkpoint_id,
        } => {
            if state.assignment.status != AssignmentStatus::InProgress {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStateTransition {
                        assignment_id,
                        from: state.assignment.status,
                        action: String::from("record a checkpoint completion on"),
                    },
                ));
            }

            let before: StateSnapshot = state.to_snapshot();

            let mut assignment: RouteAssignment = state.assignment.clone();
            assignment.completed_checkpoints.push(checkpoint_id);

            // Full traversal is a natural completion; no force flag needed
            let completed_route: bool =
                covers_route(&state.route, &assignment.completed_checkpoints);
            if completed_route {
                assignment.status = AssignmentStatus::Completed;
                assignment.end_date = Some(now);
            }

            let after: StateSnapshot = AssignmentState {
                assignment: assignment.clone(),
                route: state.route.clone(),
            }
            .to_snapshot();

            let details: String = if completed_route {
                format!(
                    "Completed checkpoint {checkpoint_id}; all checkpoints scanned, assignment completed"
                )
            } else {
                format!("Completed checkpoint {checkpoint_id}")
            };
            let action: Action = Action::new(String::from("RecordCheckpointCompletion"), Some(details));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Some(state.route.route_id.unwrap_or_default()),
                Some(assignment_id),
            );

            Ok(TransitionResult {
                assignment,
                audit_event,
            })
        }
        Command::CompleteRoute {
            assignment_id,
            force,
            notes,
        } => {
            if state.assignment.status == AssignmentStatus::Completed {
                return Err(CoreError::DomainViolation(DomainError::AlreadyCompleted {
                    assignment_id,
                }));
            }
            if state.assignment.status == AssignmentStatus::Cancelled {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStateTransition {
                        assignment_id,
                        from: state.assignment.status,
                        action: String::from("complete"),
                    },
                ));
            }

            let total: usize = state.route.total_checkpoints();
            let completed: usize = state.assignment.completed_checkpoints.len();
            let remaining: usize = total.saturating_sub(completed);
            if remaining > 0 && !force {
                return Err(CoreError::DomainViolation(
                    DomainError::IncompleteCheckpoints {
                        assignment_id,
                        completed,
                        total,
                        remaining,
                    },
                ));
            }

            let before: StateSnapshot = state.to_snapshot();

            let mut assignment: RouteAssignment = state.assignment.clone();
            assignment.status = AssignmentStatus::Completed;
            assignment.end_date = Some(now);
            if force {
                let note: String = format!(
                    "Force completed with {remaining} checkpoint(s) unscanned"
                );
                assignment.notes = append_note(assignment.notes, &note);
            }
            if let Some(note) = notes {
                assignment.notes = append_note(assignment.notes, &note);
            }

            let after: StateSnapshot = AssignmentState {
                assignment: assignment.clone(),
                route: state.route.clone(),
            }
            .to_snapshot();

            let details: String = if force {
                format!("Force completed assignment {assignment_id} ({completed}/{total})")
            } else {
                format!("Completed assignment {assignment_id}")
            };
            let action: Action = Action::new(String::from("CompleteRoute"), Some(details));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Some(state.route.route_id.unwrap_or_default()),
                Some(assignment_id),
            );

            Ok(TransitionResult {
                assignment,
                audit_event,
            })
        }
        Command::CancelAssignment {
            assignment_id,
            reason,
            notes,
        } => {
            if !state.assignment.status.is_active_duty() {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStateTransition {
                        assignment_id,
                        from: state.assignment.status,
                        action: String::from("cancel"),
                    },
                ));
            }

            let before: StateSnapshot = state.to_snapshot();

            let mut assignment: RouteAssignment = state.assignment.clone();
            assignment.status = AssignmentStatus::Cancelled;
            assignment.end_date = Some(now);
            if let Some(reason) = &reason {
                assignment.notes = append_note(assignment.notes, &format!("Cancelled: {reason}"));
            }
            if let Some(note) = notes {
                assignment.notes = append_note(assignment.notes, &note);
            }

            let after: StateSnapshot = AssignmentState {
                assignment: assignment.clone(),
                route: state.route.clone(),
            }
            .to_snapshot();

            let details: String = reason.map_or_else(
                || format!("Cancelled assignment {assignment_id}"),
                |r| format!("Cancelled assignment {assignment_id}: {r}"),
            );
            let action: Action = Action::new(String::from("CancelAssignment"), Some(details));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Some(state.route.route_id.unwrap_or_default()),
                Some(assignment_id),
            );

            Ok(TransitionResult {
                assignment,
                audit_event,
            })
        }
        Command::DeleteAssignment { assignment_id } => {
            if state.assignment.status == AssignmentStatus::InProgress {
                return Err(CoreError::DomainViolation(
                    DomainError::CannotDeleteInProgress { assignment_id },
                ));
            }

            let before: StateSnapshot = state.to_snapshot();

            let mut assignment: RouteAssignment = state.assignment.clone();
            assignment.is_active = false;

            let after: StateSnapshot = StateSnapshot::new(format!(
                "assignment={assignment_id},status={},deleted=true",
                assignment.status
            ));

            let action: Action = Action::new(
                String::from("DeleteAssignment"),
                Some(format!("Soft-deleted assignment {assignment_id}")),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                Some(state.route.route_id.unwrap_or_default()),
                Some(assignment_id),
            );

            Ok(TransitionResult {
                assignment,
                audit_event,
            })
        }
        Command::AssignRoute { .. } => {
            // Assignment creation uses apply_assign_route() instead
            Err(CoreError::Internal(String::from(
                "apply called with an AssignRoute command",
            )))
        }
    }
}
