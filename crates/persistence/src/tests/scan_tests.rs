// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for transactional scan recording.

use crate::error::PersistenceError;
use vigil_domain::{
    AssignmentStatus, CheckpointScan, Coordinates, RouteAssignment, ScanMedia,
};

use super::helpers::{
    LATER, World, create_started_assignment, seed_world, test_persistence, transition_for,
};

/// Builds a valid scan of the given checkpoint for a started assignment.
fn scan_for(
    world: &World,
    assignment: &RouteAssignment,
    checkpoint_id: i64,
) -> CheckpointScan {
    CheckpointScan {
        scan_id: None,
        user_id: world.user_id,
        checkpoint_id,
        route_id: world.route_id,
        assignment_id: assignment.assignment_id.unwrap(),
        scanned_at: LATER,
        position: Coordinates::new(0.0, 0.0).unwrap(),
        distance_m: 12.5,
        is_valid: true,
        notes: None,
        media: ScanMedia::empty(),
        metadata: serde_json::Map::new(),
    }
}

/// The transition an in-progress, non-completing scan produces.
fn progress_transition(
    assignment: &RouteAssignment,
    checkpoint_id: i64,
) -> vigil::TransitionResult {
    let mut updated = assignment.clone();
    updated.completed_checkpoints.push(checkpoint_id);
    transition_for(updated, "RecordCheckpointCompletion")
}

#[test]
fn test_record_scan_persists_completion_and_scan_row() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let assignment = create_started_assignment(&mut persistence, &world);
    let checkpoint_id: i64 = world.checkpoint_ids[0];

    let scan = scan_for(&world, &assignment, checkpoint_id);
    let result = persistence
        .record_scan(&scan, &progress_transition(&assignment, checkpoint_id))
        .unwrap();

    let fetched = persistence
        .get_assignment(assignment.assignment_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched.completed_checkpoints, vec![checkpoint_id]);
    assert_eq!(fetched.status, AssignmentStatus::InProgress);

    let scans = persistence
        .list_scans_for_assignment(assignment.assignment_id.unwrap())
        .unwrap();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].scan_id, Some(result.scan_id));
    assert_eq!(scans[0].checkpoint_id, checkpoint_id);
    assert!(scans[0].is_valid);
    assert!((scans[0].distance_m - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_record_scan_persists_media_rows() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let assignment = create_started_assignment(&mut persistence, &world);
    let checkpoint_id: i64 = world.checkpoint_ids[0];

    let mut scan = scan_for(&world, &assignment, checkpoint_id);
    scan.media = ScanMedia {
        images: vec![String::from("blob://scan/1.jpg")],
        videos: vec![String::from("blob://scan/1.mp4")],
        audios: Vec::new(),
    };

    persistence
        .record_scan(&scan, &progress_transition(&assignment, checkpoint_id))
        .unwrap();

    let scans = persistence
        .list_scans_for_assignment(assignment.assignment_id.unwrap())
        .unwrap();
    assert_eq!(scans[0].media.images, vec![String::from("blob://scan/1.jpg")]);
    assert_eq!(scans[0].media.videos, vec![String::from("blob://scan/1.mp4")]);
    assert!(scans[0].media.audios.is_empty());
}

#[test]
fn test_duplicate_completion_is_rejected_atomically() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let assignment = create_started_assignment(&mut persistence, &world);
    let checkpoint_id: i64 = world.checkpoint_ids[0];

    let scan = scan_for(&world, &assignment, checkpoint_id);
    persistence
        .record_scan(&scan, &progress_transition(&assignment, checkpoint_id))
        .unwrap();

    // The second scan of the same checkpoint hits the completion
    // uniqueness constraint and leaves no second scan row behind.
    let result = persistence.record_scan(
        &scan_for(&world, &assignment, checkpoint_id),
        &progress_transition(&assignment, checkpoint_id),
    );

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::DuplicateCompletion { .. }
    ));
    let scans = persistence
        .list_scans_for_assignment(assignment.assignment_id.unwrap())
        .unwrap();
    assert_eq!(scans.len(), 1);
}

#[test]
fn test_completing_scan_updates_status_and_end_date() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let assignment = create_started_assignment(&mut persistence, &world);

    // Scan the first two checkpoints.
    let mut current = assignment.clone();
    for &checkpoint_id in &world.checkpoint_ids[..2] {
        let scan = scan_for(&world, &current, checkpoint_id);
        persistence
            .record_scan(&scan, &progress_transition(&current, checkpoint_id))
            .unwrap();
        current.completed_checkpoints.push(checkpoint_id);
    }

    // The final scan completes the route.
    let last: i64 = world.checkpoint_ids[2];
    let mut completed = current.clone();
    completed.completed_checkpoints.push(last);
    completed.status = AssignmentStatus::Completed;
    completed.end_date = Some(LATER);
    persistence
        .record_scan(
            &scan_for(&world, &current, last),
            &transition_for(completed, "RecordCheckpointCompletion"),
        )
        .unwrap();

    let fetched = persistence
        .get_assignment(assignment.assignment_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(fetched.status, AssignmentStatus::Completed);
    assert_eq!(fetched.end_date, Some(LATER));
    assert_eq!(fetched.completed_checkpoints.len(), 3);
}

#[test]
fn test_scan_against_non_in_progress_assignment_is_rejected() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let mut assignment = create_started_assignment(&mut persistence, &world);

    // Cancel the assignment underneath the scan.
    assignment.status = AssignmentStatus::Cancelled;
    assignment.end_date = Some(LATER);
    persistence
        .update_assignment(&transition_for(assignment.clone(), "CancelAssignment"))
        .unwrap();

    assignment.status = AssignmentStatus::InProgress;
    let checkpoint_id: i64 = world.checkpoint_ids[0];
    let result = persistence.record_scan(
        &scan_for(&world, &assignment, checkpoint_id),
        &progress_transition(&assignment, checkpoint_id),
    );

    assert!(matches!(
        result.unwrap_err(),
        PersistenceError::UnexpectedAssignmentStatus { .. }
    ));

    // The guarded update rolled the whole transaction back.
    let scans = persistence
        .list_scans_for_assignment(assignment.assignment_id.unwrap())
        .unwrap();
    assert!(scans.is_empty());
    let fetched = persistence
        .get_assignment(assignment.assignment_id.unwrap())
        .unwrap()
        .unwrap();
    assert!(fetched.completed_checkpoints.is_empty());
}

#[test]
fn test_completed_checkpoints_preserve_arrival_order() {
    let mut persistence = test_persistence();
    let world = seed_world(&mut persistence);
    let assignment = create_started_assignment(&mut persistence, &world);

    // Scan out of route order: 3rd, then 1st.
    let mut current = assignment.clone();
    for &checkpoint_id in &[world.checkpoint_ids[2], world.checkpoint_ids[0]] {
        let mut scan = scan_for(&world, &current, checkpoint_id);
        scan.scanned_at = LATER + time::Duration::seconds(
            i64::try_from(current.completed_checkpoints.len()).unwrap(),
        );
        persistence
            .record_scan(&scan, &progress_transition(&current, checkpoint_id))
            .unwrap();
        current.completed_checkpoints.push(checkpoint_id);
    }

    let fetched = persistence
        .get_assignment(assignment.assignment_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(
        fetched.completed_checkpoints,
        vec![world.checkpoint_ids[2], world.checkpoint_ids[0]]
    );
}
