// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::geo::Coordinates;
use crate::types::{
    AssignmentStatus, Checkpoint, DEFAULT_SCAN_RADIUS_M, PatrolUser, Route, RouteAssignment,
    RoutePriority, ScanMedia, Station,
};
use time::OffsetDateTime;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2026-03-01 08:00 UTC);

#[test]
fn test_status_string_round_trip() {
    for status in [
        AssignmentStatus::Assigned,
        AssignmentStatus::InProgress,
        AssignmentStatus::Completed,
        AssignmentStatus::Cancelled,
    ] {
        let parsed: AssignmentStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_status_rejects_unknown_string() {
    let result: Result<AssignmentStatus, DomainError> = "paused".parse();

    assert!(matches!(result.unwrap_err(), DomainError::InvalidStatus(_)));
}

#[test]
fn test_status_transition_matrix() {
    use AssignmentStatus::{Assigned, Cancelled, Completed, InProgress};

    assert!(Assigned.can_transition_to(InProgress));
    assert!(Assigned.can_transition_to(Completed));
    assert!(Assigned.can_transition_to(Cancelled));
    assert!(InProgress.can_transition_to(Completed));
    assert!(InProgress.can_transition_to(Cancelled));

    // Terminal states admit nothing.
    for target in [Assigned, InProgress, Completed, Cancelled] {
        assert!(!Completed.can_transition_to(target));
        assert!(!Cancelled.can_transition_to(target));
    }

    // No backward transitions.
    assert!(!InProgress.can_transition_to(Assigned));
}

#[test]
fn test_status_terminal_and_active_duty() {
    assert!(AssignmentStatus::Assigned.is_active_duty());
    assert!(AssignmentStatus::InProgress.is_active_duty());
    assert!(!AssignmentStatus::Completed.is_active_duty());
    assert!(!AssignmentStatus::Cancelled.is_active_duty());

    assert!(AssignmentStatus::Completed.is_terminal());
    assert!(AssignmentStatus::Cancelled.is_terminal());
    assert!(!AssignmentStatus::Assigned.is_terminal());
}

#[test]
fn test_priority_parse_round_trip() {
    for priority in [
        RoutePriority::Low,
        RoutePriority::Medium,
        RoutePriority::High,
        RoutePriority::Urgent,
    ] {
        assert_eq!(RoutePriority::parse(priority.as_str()).unwrap(), priority);
    }
}

#[test]
fn test_priority_rejects_unknown_string() {
    let result = RoutePriority::parse("critical");

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidPriority(_)
    ));
}

#[test]
fn test_checkpoint_new_applies_defaults() {
    let checkpoint = Checkpoint::new(
        String::from("Main Entrance"),
        Coordinates::new(1.0, 2.0).unwrap(),
        DEFAULT_SCAN_RADIUS_M,
        3,
    )
    .unwrap();

    assert_eq!(checkpoint.checkpoint_id, None);
    assert!(checkpoint.is_active);
    assert!((checkpoint.scan_radius_m - 100.0).abs() < f64::EPSILON);
}

#[test]
fn test_checkpoint_rejects_blank_name() {
    let result = Checkpoint::new(
        String::from("   "),
        Coordinates::new(1.0, 2.0).unwrap(),
        100.0,
        3,
    );

    assert!(matches!(result.unwrap_err(), DomainError::InvalidName(_)));
}

#[test]
fn test_checkpoint_rejects_non_positive_radius() {
    let result = Checkpoint::new(
        String::from("Gate"),
        Coordinates::new(1.0, 2.0).unwrap(),
        0.0,
        3,
    );

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidScanRadius { .. }
    ));
}

#[test]
fn test_route_membership_helpers() {
    let route = Route {
        route_id: Some(1),
        name: String::from("Night Loop"),
        checkpoint_ids: vec![10, 20, 30],
        station_id: 3,
        priority: Some(RoutePriority::High),
        estimated_duration_minutes: Some(90),
        is_active: true,
    };

    assert!(route.contains_checkpoint(20));
    assert!(!route.contains_checkpoint(40));
    assert_eq!(route.total_checkpoints(), 3);
}

#[test]
fn test_new_assignment_starts_assigned_and_empty() {
    let assignment = RouteAssignment::new(5, 9, 3, NOW);

    assert_eq!(assignment.status, AssignmentStatus::Assigned);
    assert_eq!(assignment.start_date, NOW);
    assert_eq!(assignment.end_date, None);
    assert!(assignment.completed_checkpoints.is_empty());
    assert!(assignment.is_active);
}

#[test]
fn test_assignment_has_completed() {
    let mut assignment = RouteAssignment::new(5, 9, 3, NOW);
    assignment.completed_checkpoints.push(20);

    assert!(assignment.has_completed(20));
    assert!(!assignment.has_completed(10));
}

#[test]
fn test_scan_media_empty() {
    assert!(ScanMedia::empty().is_empty());

    let media = ScanMedia {
        images: vec![String::from("r2://scan/1.jpg")],
        videos: Vec::new(),
        audios: Vec::new(),
    };
    assert!(!media.is_empty());
}

#[test]
fn test_station_and_user_reject_blank_names() {
    assert!(Station::new(String::new()).is_err());
    assert!(PatrolUser::new(String::from(" "), None, 1).is_err());
}
