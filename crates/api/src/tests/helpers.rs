// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.
//!
//! The world is seeded through the handlers themselves (as an Admin), so
//! the fixtures double as a smoke test for the administration surface.

use crate::request_response::{
    AssignRouteRequest, CreateCheckpointRequest, CreatePatrolUserRequest, CreateRouteRequest,
    CreateStationRequest, ScanCheckpointRequest, StartRouteRequest,
};
use crate::{AuthenticatedActor, Role, handlers};
use vigil::AssignmentPolicy;
use vigil_audit::Cause;
use vigil_persistence::Persistence;

/// The seeded world an API test operates on.
pub struct World {
    pub station_id: i64,
    pub user_id: i64,
    pub checkpoint_ids: Vec<i64>,
    /// Each checkpoint's geofence center, parallel to `checkpoint_ids`.
    pub checkpoint_positions: Vec<(f64, f64)>,
    pub route_id: i64,
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn supervisor() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("supervisor-1"), Role::Supervisor)
}

pub fn officer() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("officer-1"), Role::Officer)
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn test_policy() -> AssignmentPolicy {
    AssignmentPolicy::default()
}

/// Seeds a station, an officer, three checkpoints, and a route via the
/// administration handlers.
pub fn setup() -> (Persistence, World) {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let policy = test_policy();

    let station_id: i64 = handlers::create_station(
        &mut persistence,
        CreateStationRequest {
            name: String::from("Central Station"),
        },
        &admin(),
        test_cause(),
    )
    .unwrap();

    let user_id: i64 = handlers::create_patrol_user(
        &mut persistence,
        CreatePatrolUserRequest {
            name: String::from("Officer Rivera"),
            badge_number: Some(String::from("B-1021")),
            station_id,
        },
        &admin(),
        test_cause(),
    )
    .unwrap();

    let checkpoint_positions: Vec<(f64, f64)> = vec![(0.0, 0.0), (0.001, 0.0), (0.002, 0.0)];
    let mut checkpoint_ids: Vec<i64> = Vec::new();
    for (index, &(latitude, longitude)) in checkpoint_positions.iter().enumerate() {
        let response = handlers::create_checkpoint(
            &mut persistence,
            &policy,
            CreateCheckpointRequest {
                name: format!("Checkpoint {}", index + 1),
                latitude,
                longitude,
                scan_radius_m: None,
                station_id,
            },
            &admin(),
            test_cause(),
        )
        .unwrap();
        checkpoint_ids.push(response.checkpoint_id);
    }

    let route = handlers::create_route(
        &mut persistence,
        CreateRouteRequest {
            name: String::from("Night Loop"),
            checkpoint_ids: checkpoint_ids.clone(),
            station_id,
            priority: Some(String::from("high")),
            estimated_duration_minutes: Some(90),
        },
        &admin(),
        test_cause(),
    )
    .unwrap();

    (
        persistence,
        World {
            station_id,
            user_id,
            checkpoint_ids,
            checkpoint_positions,
            route_id: route.route_id,
        },
    )
}

/// Assigns the world's route to its officer and starts it, returning the
/// assignment id.
pub fn assign_and_start(persistence: &mut Persistence, world: &World) -> i64 {
    let assigned = handlers::assign_route(
        persistence,
        &test_policy(),
        AssignRouteRequest {
            user_id: world.user_id,
            route_id: world.route_id,
            station_id: world.station_id,
        },
        &supervisor(),
        test_cause(),
    )
    .unwrap();

    handlers::start_route(
        persistence,
        StartRouteRequest {
            assignment_id: assigned.assignment_id,
            notes: None,
        },
        &officer(),
        test_cause(),
    )
    .unwrap();

    assigned.assignment_id
}

/// Builds a scan request for the world's checkpoint at `index`, scanned
/// from the checkpoint's own center.
pub fn scan_request_for(world: &World, assignment_id: i64, index: usize) -> ScanCheckpointRequest {
    let (latitude, longitude) = world.checkpoint_positions[index];
    ScanCheckpointRequest {
        user_id: world.user_id,
        qr_payload: format!(
            r#"{{"id": {}, "type": "checkpoint"}}"#,
            world.checkpoint_ids[index]
        ),
        latitude,
        longitude,
        assignment_id,
        route_id: world.route_id,
        notes: None,
        media: Vec::new(),
        metadata: serde_json::Map::new(),
    }
}
