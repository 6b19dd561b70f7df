// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for route assignment arbitration.

use crate::state::{AssignRouteContext, AssignmentPolicy};
use crate::{Command, CoreError, apply_assign_route};
use vigil_domain::{AssignmentStatus, DomainError, PatrolUser};

use super::helpers::{NOW, create_assignment, create_route, create_test_actor, create_test_cause};

fn create_user(user_id: i64) -> PatrolUser {
    let mut user = PatrolUser::new(format!("Officer {user_id}"), None, 1).unwrap();
    user.user_id = Some(user_id);
    user
}

fn assign_command(user_id: i64, route_id: i64) -> Command {
    Command::AssignRoute {
        user_id,
        route_id,
        station_id: 1,
    }
}

fn clean_context(user_id: i64, route_id: i64) -> AssignRouteContext {
    AssignRouteContext {
        user: Some(create_user(user_id)),
        route: Some(create_route(route_id, vec![10, 20, 30])),
        route_active_assignment: None,
        user_active_assignments: Vec::new(),
    }
}

#[test]
fn test_assign_route_succeeds_on_clean_context() {
    let policy = AssignmentPolicy::default();
    let ctx = clean_context(5, 9);

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    )
    .unwrap();

    assert_eq!(result.assignment.user_id, 5);
    assert_eq!(result.assignment.route_id, 9);
    assert_eq!(result.assignment.status, AssignmentStatus::Assigned);
    assert_eq!(result.assignment.start_date, NOW);
    assert!(result.assignment.completed_checkpoints.is_empty());
    assert_eq!(result.audit_event.action.name, "AssignRoute");
    assert_eq!(result.audit_event.route_id, Some(9));
}

#[test]
fn test_assign_route_fails_user_not_found() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.user = None;

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::UserNotFound(5))
    ));
}

#[test]
fn test_assign_route_fails_route_not_found() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.route = None;

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::RouteNotFound(9))
    ));
}

#[test]
fn test_assign_route_fails_route_inactive() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    if let Some(route) = &mut ctx.route {
        route.is_active = false;
    }

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::RouteInactive(9))
    ));
}

#[test]
fn test_assign_route_reports_conflicting_holder() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.route_active_assignment =
        Some(create_assignment(41, 8, 9, AssignmentStatus::InProgress));

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    match result.unwrap_err() {
        CoreError::DomainViolation(DomainError::RouteAlreadyAssigned {
            route_id,
            assignment_id,
            holder_user_id,
            status,
        }) => {
            assert_eq!(route_id, 9);
            assert_eq!(assignment_id, 41);
            assert_eq!(holder_user_id, 8);
            assert_eq!(status, AssignmentStatus::InProgress);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_assign_route_fails_duplicate_self_assignment() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    // The same user already holds the route's active assignment.
    ctx.route_active_assignment = Some(create_assignment(41, 5, 9, AssignmentStatus::Assigned));

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DuplicateUserRouteAssignment {
            user_id: 5,
            route_id: 9,
            assignment_id: 41,
        })
    ));
}

#[test]
fn test_assign_route_fails_at_limit() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.user_active_assignments = (0..5)
        .map(|i| create_assignment(100 + i, 5, 20 + i, AssignmentStatus::Assigned))
        .collect();

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::MaxAssignmentsReached {
            user_id: 5,
            active_count: 5,
            limit: 5,
        })
    ));
}

#[test]
fn test_assign_route_succeeds_below_limit() {
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.user_active_assignments = (0..4)
        .map(|i| create_assignment(100 + i, 5, 20 + i, AssignmentStatus::InProgress))
        .collect();

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(result.is_ok());
}

#[test]
fn test_assignment_limit_is_configurable() {
    // The limit is policy, not a literal: a limit of 1 rejects the second
    // assignment and a limit of 2 accepts it.
    let mut ctx = clean_context(5, 9);
    ctx.user_active_assignments =
        vec![create_assignment(100, 5, 30, AssignmentStatus::Assigned)];

    let strict = AssignmentPolicy::new(1);
    let result = apply_assign_route(
        &strict,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::MaxAssignmentsReached { limit: 1, .. })
    ));

    let relaxed = AssignmentPolicy::new(2);
    let result = apply_assign_route(
        &relaxed,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );
    assert!(result.is_ok());
}

#[test]
fn test_assign_route_fails_duplicate_through_user_assignments() {
    // The route snapshot can be stale while the user's own list already
    // shows an assignment for the route.
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.user_active_assignments =
        vec![create_assignment(77, 5, 9, AssignmentStatus::InProgress)];

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DuplicateUserRouteAssignment {
            assignment_id: 77,
            ..
        })
    ));
}

#[test]
fn test_cancelling_frees_a_slot() {
    // A user at the limit can be assigned again once one of the five is
    // no longer active-duty; the caller expresses that by excluding it
    // from the snapshot.
    let policy = AssignmentPolicy::default();
    let mut ctx = clean_context(5, 9);
    ctx.user_active_assignments = (0..4)
        .map(|i| create_assignment(100 + i, 5, 20 + i, AssignmentStatus::Assigned))
        .collect();

    let result = apply_assign_route(
        &policy,
        &ctx,
        assign_command(5, 9),
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(result.is_ok());
}

#[test]
fn test_assign_route_rejects_lifecycle_command() {
    let policy = AssignmentPolicy::default();
    let ctx = clean_context(5, 9);

    let result = apply_assign_route(
        &policy,
        &ctx,
        Command::DeleteAssignment { assignment_id: 1 },
        create_test_actor(),
        create_test_cause(),
        NOW,
    );

    assert!(matches!(result.unwrap_err(), CoreError::Internal(_)));
}
