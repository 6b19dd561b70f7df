// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{
    MAX_ROUTE_CHECKPOINTS, validate_checkpoints_active, validate_estimated_duration,
    validate_route_checkpoints, validate_scan_radius,
};
use std::collections::HashSet;

#[test]
fn test_route_checkpoints_rejects_empty_list() {
    let result = validate_route_checkpoints(&[]);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::EmptyRouteCheckpoints
    ));
}

#[test]
fn test_route_checkpoints_accepts_single_entry() {
    assert!(validate_route_checkpoints(&[1]).is_ok());
}

#[test]
fn test_route_checkpoints_accepts_maximum() {
    let ids: Vec<i64> = (1..=50).collect();
    assert!(validate_route_checkpoints(&ids).is_ok());
}

#[test]
fn test_route_checkpoints_rejects_over_maximum() {
    let ids: Vec<i64> = (1..=51).collect();

    let result = validate_route_checkpoints(&ids);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::TooManyRouteCheckpoints {
            count: 51,
            max: MAX_ROUTE_CHECKPOINTS,
        }
    ));
}

#[test]
fn test_route_checkpoints_rejects_duplicates() {
    let result = validate_route_checkpoints(&[1, 2, 3, 2]);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::DuplicateRouteCheckpoint { checkpoint_id: 2 }
    ));
}

#[test]
fn test_checkpoints_active_rejects_unknown_id() {
    let active: HashSet<i64> = [1, 2].into_iter().collect();

    let result = validate_checkpoints_active(&[1, 2, 3], &active);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InactiveRouteCheckpoint { checkpoint_id: 3 }
    ));
}

#[test]
fn test_checkpoints_active_accepts_fully_resolved_list() {
    let active: HashSet<i64> = [1, 2, 3].into_iter().collect();

    assert!(validate_checkpoints_active(&[3, 1], &active).is_ok());
}

#[test]
fn test_scan_radius_bounds() {
    assert!(validate_scan_radius(100.0).is_ok());
    assert!(validate_scan_radius(0.5).is_ok());
    assert!(validate_scan_radius(0.0).is_err());
    assert!(validate_scan_radius(-5.0).is_err());
    assert!(validate_scan_radius(f64::NAN).is_err());
    assert!(validate_scan_radius(f64::INFINITY).is_err());
}

#[test]
fn test_estimated_duration_bounds() {
    assert!(validate_estimated_duration(0).is_ok());
    assert!(validate_estimated_duration(1440).is_ok());

    let result = validate_estimated_duration(1441);
    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidEstimatedDuration {
            minutes: 1441,
            max: 1440,
        }
    ));
}
