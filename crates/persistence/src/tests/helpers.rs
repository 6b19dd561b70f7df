// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.
//!
//! Tests run against unique in-memory `SQLite` databases; the fixtures
//! seed a station, an officer, three checkpoints, and a route over them.

use crate::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;
use vigil::TransitionResult;
use vigil_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use vigil_domain::{
    AssignmentStatus, Checkpoint, Coordinates, PatrolUser, Route, RouteAssignment, RoutePriority,
    Station,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 22:00 UTC);
pub const LATER: OffsetDateTime = datetime!(2026-03-01 23:30 UTC);

/// The seeded world a test operates on.
pub struct World {
    pub station_id: i64,
    pub user_id: i64,
    pub checkpoint_ids: Vec<i64>,
    pub route_id: i64,
}

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn test_actor() -> Actor {
    Actor::new(String::from("supervisor-1"), String::from("supervisor"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn test_audit_event(
    action: &str,
    route_id: Option<i64>,
    assignment_id: Option<i64>,
) -> AuditEvent {
    AuditEvent::new(
        test_actor(),
        test_cause(),
        Action::new(action.to_string(), None),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(String::from("after")),
        route_id,
        assignment_id,
    )
}

/// Seeds a station, an officer, three checkpoints, and a route over them.
pub fn seed_world(persistence: &mut Persistence) -> World {
    let station = Station::new(String::from("Central Station")).unwrap();
    let station_id: i64 = persistence.create_station(&station).unwrap();

    let user = PatrolUser::new(
        String::from("Officer Rivera"),
        Some(String::from("B-1021")),
        station_id,
    )
    .unwrap();
    let user_id: i64 = persistence.create_patrol_user(&user).unwrap();

    let mut checkpoint_ids: Vec<i64> = Vec::new();
    for (index, (lat, lng)) in [(0.0, 0.0), (0.001, 0.0), (0.002, 0.0)].iter().enumerate() {
        let checkpoint = Checkpoint::new(
            format!("Checkpoint {}", index + 1),
            Coordinates::new(*lat, *lng).unwrap(),
            100.0,
            station_id,
        )
        .unwrap();
        checkpoint_ids.push(persistence.create_checkpoint(&checkpoint).unwrap());
    }

    let route = Route {
        route_id: None,
        name: String::from("Night Loop"),
        checkpoint_ids: checkpoint_ids.clone(),
        station_id,
        priority: Some(RoutePriority::High),
        estimated_duration_minutes: Some(90),
        is_active: true,
    };
    let route_id: i64 = persistence.create_route(&route).unwrap();

    World {
        station_id,
        user_id,
        checkpoint_ids,
        route_id,
    }
}

/// A creation transition for a fresh assignment in the `Assigned` state.
pub fn assignment_creation(world: &World) -> TransitionResult {
    TransitionResult {
        assignment: RouteAssignment::new(world.user_id, world.route_id, world.station_id, NOW),
        audit_event: test_audit_event("AssignRoute", Some(world.route_id), None),
    }
}

/// A transition carrying the given already-persisted assignment.
pub fn transition_for(assignment: RouteAssignment, action: &str) -> TransitionResult {
    let route_id: i64 = assignment.route_id;
    let assignment_id: Option<i64> = assignment.assignment_id;
    TransitionResult {
        audit_event: test_audit_event(action, Some(route_id), assignment_id),
        assignment,
    }
}

/// Creates an assignment and moves it to `InProgress`, returning the
/// persisted assignment.
pub fn create_started_assignment(persistence: &mut Persistence, world: &World) -> RouteAssignment {
    let created = persistence.create_assignment(&assignment_creation(world)).unwrap();

    let mut assignment = persistence
        .get_assignment(created.assignment_id)
        .unwrap()
        .unwrap();
    assignment.status = AssignmentStatus::InProgress;
    assignment.start_date = LATER;
    persistence
        .update_assignment(&transition_for(assignment.clone(), "StartRoute"))
        .unwrap();

    persistence
        .get_assignment(created.assignment_id)
        .unwrap()
        .unwrap()
}
