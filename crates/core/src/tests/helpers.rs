// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for core tests.

use time::OffsetDateTime;
use time::macros::datetime;
use vigil_audit::{Actor, Cause};
use vigil_domain::{
    AssignmentStatus, Checkpoint, Coordinates, Route, RouteAssignment, RoutePriority,
};

pub const NOW: OffsetDateTime = datetime!(2026-03-01 22:00 UTC);
pub const LATER: OffsetDateTime = datetime!(2026-03-01 23:30 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("supervisor-1"), String::from("supervisor"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// A persisted checkpoint at the given position.
pub fn create_checkpoint(checkpoint_id: i64, latitude: f64, longitude: f64) -> Checkpoint {
    let mut checkpoint = Checkpoint::new(
        format!("Checkpoint {checkpoint_id}"),
        Coordinates::new(latitude, longitude).unwrap(),
        100.0,
        1,
    )
    .unwrap();
    checkpoint.checkpoint_id = Some(checkpoint_id);
    checkpoint
}

/// A persisted active route over the given checkpoint ids.
pub fn create_route(route_id: i64, checkpoint_ids: Vec<i64>) -> Route {
    Route {
        route_id: Some(route_id),
        name: format!("Route {route_id}"),
        checkpoint_ids,
        station_id: 1,
        priority: Some(RoutePriority::Medium),
        estimated_duration_minutes: Some(60),
        is_active: true,
    }
}

/// A persisted assignment in the given status.
pub fn create_assignment(
    assignment_id: i64,
    user_id: i64,
    route_id: i64,
    status: AssignmentStatus,
) -> RouteAssignment {
    let mut assignment = RouteAssignment::new(user_id, route_id, 1, NOW);
    assignment.assignment_id = Some(assignment_id);
    assignment.status = status;
    assignment
}
