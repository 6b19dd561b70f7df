// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the assignment lifecycle handlers.

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{
    AssignRouteRequest, CancelAssignmentRequest, CompleteRouteRequest, CreateRouteRequest,
    StartRouteRequest,
};
use vigil::AssignmentPolicy;

use super::helpers::{
    admin, assign_and_start, officer, setup, supervisor, test_cause, test_policy,
};

fn assign_request(world: &super::helpers::World) -> AssignRouteRequest {
    AssignRouteRequest {
        user_id: world.user_id,
        route_id: world.route_id,
        station_id: world.station_id,
    }
}

/// Creates an extra route over the world's checkpoints and returns its id.
fn extra_route(persistence: &mut vigil_persistence::Persistence, world: &super::helpers::World, name: &str) -> i64 {
    handlers::create_route(
        persistence,
        CreateRouteRequest {
            name: name.to_string(),
            checkpoint_ids: vec![world.checkpoint_ids[0]],
            station_id: world.station_id,
            priority: None,
            estimated_duration_minutes: None,
        },
        &admin(),
        test_cause(),
    )
    .unwrap()
    .route_id
}

#[test]
fn test_assign_route_returns_assignment_with_progress() {
    let (mut persistence, world) = setup();

    let response = handlers::assign_route(
        &mut persistence,
        &test_policy(),
        assign_request(&world),
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    assert_eq!(response.status, "assigned");
    assert_eq!(response.user_id, world.user_id);
    assert_eq!(response.progress.total, 3);
    assert_eq!(response.progress.completed, 0);
    assert_eq!(response.progress.next_action, "start_route");
    assert!(response.event_id.is_some());
}

#[test]
fn test_assign_route_rejects_officer() {
    let (mut persistence, world) = setup();

    let result = handlers::assign_route(
        &mut persistence,
        &test_policy(),
        assign_request(&world),
        &officer(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::Unauthorized { required_role, .. } if required_role == "supervisor"
    ));
}

#[test]
fn test_assign_route_reports_existing_holder() {
    let (mut persistence, world) = setup();

    handlers::assign_route(
        &mut persistence,
        &test_policy(),
        assign_request(&world),
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    // A different officer requesting the same route is turned away.
    let other_user: i64 = handlers::create_patrol_user(
        &mut persistence,
        crate::request_response::CreatePatrolUserRequest {
            name: String::from("Officer Chen"),
            badge_number: None,
            station_id: world.station_id,
        },
        &admin(),
        test_cause(),
    )
    .unwrap();

    let result = handlers::assign_route(
        &mut persistence,
        &test_policy(),
        AssignRouteRequest {
            user_id: other_user,
            route_id: world.route_id,
            station_id: world.station_id,
        },
        &supervisor(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "route_already_assigned"
    ));
}

#[test]
fn test_assign_route_rejects_duplicate_self_assignment() {
    let (mut persistence, world) = setup();

    handlers::assign_route(
        &mut persistence,
        &test_policy(),
        assign_request(&world),
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    let result = handlers::assign_route(
        &mut persistence,
        &test_policy(),
        assign_request(&world),
        &supervisor(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "duplicate_user_route_assignment"
    ));
}

#[test]
fn test_assignment_limit_and_freeing_a_slot() {
    let (mut persistence, world) = setup();
    let policy: AssignmentPolicy = test_policy();

    // Fill the officer's five slots across five routes.
    let mut assignment_ids: Vec<i64> = Vec::new();
    for index in 0..5 {
        let route_id: i64 = extra_route(&mut persistence, &world, &format!("Route {index}"));
        let response = handlers::assign_route(
            &mut persistence,
            &policy,
            AssignRouteRequest {
                user_id: world.user_id,
                route_id,
                station_id: world.station_id,
            },
            &supervisor(),
            test_cause(),
        )
        .unwrap();
        assignment_ids.push(response.assignment_id);
    }

    // The sixth is rejected at the limit.
    let result = handlers::assign_route(
        &mut persistence,
        &policy,
        assign_request(&world),
        &supervisor(),
        test_cause(),
    );
    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "max_assignments_reached"
    ));

    // Cancelling one frees a slot and the retry succeeds.
    handlers::cancel_assignment(
        &mut persistence,
        CancelAssignmentRequest {
            assignment_id: assignment_ids[0],
            reason: Some(String::from("Shift change")),
            notes: None,
        },
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    let retry = handlers::assign_route(
        &mut persistence,
        &policy,
        assign_request(&world),
        &supervisor(),
        test_cause(),
    );
    assert!(retry.is_ok());
}

#[test]
fn test_start_route_requires_assigned_status() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    // Starting twice is rejected.
    let result = handlers::start_route(
        &mut persistence,
        StartRouteRequest {
            assignment_id,
            notes: None,
        },
        &officer(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "invalid_state_transition"
    ));
}

#[test]
fn test_complete_route_requires_force_when_incomplete() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    let refused = handlers::complete_route(
        &mut persistence,
        CompleteRouteRequest {
            assignment_id,
            force: false,
            notes: None,
        },
        &officer(),
        test_cause(),
    );
    assert!(matches!(
        refused.unwrap_err(),
        ApiError::DomainRuleViolation { rule, message }
            if rule == "incomplete_checkpoints" && message.contains("3 remaining")
    ));

    let forced = handlers::complete_route(
        &mut persistence,
        CompleteRouteRequest {
            assignment_id,
            force: true,
            notes: Some(String::from("Storm rolled in")),
        },
        &supervisor(),
        test_cause(),
    )
    .unwrap();
    assert_eq!(forced.status, "completed");
    assert!(forced.notes.unwrap().contains("Force completed"));
}

#[test]
fn test_force_complete_requires_supervision() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    let result = handlers::complete_route(
        &mut persistence,
        CompleteRouteRequest {
            assignment_id,
            force: true,
            notes: None,
        },
        &officer(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::Unauthorized { .. }
    ));
}

#[test]
fn test_complete_route_rejects_already_completed() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    handlers::complete_route(
        &mut persistence,
        CompleteRouteRequest {
            assignment_id,
            force: true,
            notes: None,
        },
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    let result = handlers::complete_route(
        &mut persistence,
        CompleteRouteRequest {
            assignment_id,
            force: true,
            notes: None,
        },
        &supervisor(),
        test_cause(),
    );

    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "already_completed"
    ));
}

#[test]
fn test_cancel_twice_rejects_second_call() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    let request = CancelAssignmentRequest {
        assignment_id,
        reason: None,
        notes: None,
    };
    handlers::cancel_assignment(&mut persistence, request.clone(), &supervisor(), test_cause())
        .unwrap();

    let second = handlers::cancel_assignment(&mut persistence, request, &supervisor(), test_cause());

    assert!(matches!(
        second.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "invalid_state_transition"
    ));
}

#[test]
fn test_delete_rejects_in_progress_assignment() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    let result =
        handlers::delete_assignment(&mut persistence, assignment_id, &supervisor(), test_cause());
    assert!(matches!(
        result.unwrap_err(),
        ApiError::DomainRuleViolation { rule, .. } if rule == "cannot_delete_in_progress"
    ));

    // After cancelling, deletion succeeds and the assignment drops out of
    // the listings.
    handlers::cancel_assignment(
        &mut persistence,
        CancelAssignmentRequest {
            assignment_id,
            reason: None,
            notes: None,
        },
        &supervisor(),
        test_cause(),
    )
    .unwrap();
    handlers::delete_assignment(&mut persistence, assignment_id, &supervisor(), test_cause())
        .unwrap();

    let listed = handlers::list_assignments_for_user(&mut persistence, world.user_id).unwrap();
    assert!(listed.is_empty());
}

#[test]
fn test_assignment_listing_carries_progress() {
    let (mut persistence, world) = setup();
    let assignment_id: i64 = assign_and_start(&mut persistence, &world);

    let listed = handlers::list_assignments_for_user(&mut persistence, world.user_id).unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].assignment_id, assignment_id);
    assert_eq!(listed[0].status, "in_progress");
    assert_eq!(listed[0].progress.next_action, "scan_next_checkpoint");
}
