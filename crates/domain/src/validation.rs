// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use std::collections::HashSet;

/// Maximum number of checkpoints a route may reference.
pub const MAX_ROUTE_CHECKPOINTS: usize = 50;

/// Maximum estimated patrol duration in minutes (24 hours).
pub const MAX_ESTIMATED_DURATION_MINUTES: u16 = 1440;

/// Validates a checkpoint scan radius.
///
/// # Errors
///
/// Returns `DomainError::InvalidScanRadius` if the radius is not a
/// positive finite number.
pub fn validate_scan_radius(radius_m: f64) -> Result<(), DomainError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(DomainError::InvalidScanRadius { radius_m });
    }
    Ok(())
}

/// Validates a route's checkpoint id list shape.
///
/// This checks count bounds and duplicates only. Resolving each id to an
/// active checkpoint requires store access and happens at the API
/// boundary via [`validate_checkpoints_active`].
///
/// # Arguments
///
/// * `checkpoint_ids` - The ordered checkpoint id list
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - The list has more than [`MAX_ROUTE_CHECKPOINTS`] entries
/// - Any id appears more than once
pub fn validate_route_checkpoints(checkpoint_ids: &[i64]) -> Result<(), DomainError> {
    if checkpoint_ids.is_empty() {
        return Err(DomainError::EmptyRouteCheckpoints);
    }
    if checkpoint_ids.len() > MAX_ROUTE_CHECKPOINTS {
        return Err(DomainError::TooManyRouteCheckpoints {
            count: checkpoint_ids.len(),
            max: MAX_ROUTE_CHECKPOINTS,
        });
    }

    let mut seen: HashSet<i64> = HashSet::with_capacity(checkpoint_ids.len());
    for &checkpoint_id in checkpoint_ids {
        if !seen.insert(checkpoint_id) {
            return Err(DomainError::DuplicateRouteCheckpoint { checkpoint_id });
        }
    }
    Ok(())
}

/// Validates that every referenced checkpoint resolves to an active one.
///
/// # Arguments
///
/// * `checkpoint_ids` - The ordered checkpoint id list
/// * `active_checkpoint_ids` - The set of ids that resolved to active
///   checkpoints at validation time
///
/// # Errors
///
/// Returns `DomainError::InactiveRouteCheckpoint` naming the first id
/// that is missing or inactive.
pub fn validate_checkpoints_active(
    checkpoint_ids: &[i64],
    active_checkpoint_ids: &HashSet<i64>,
) -> Result<(), DomainError> {
    for &checkpoint_id in checkpoint_ids {
        if !active_checkpoint_ids.contains(&checkpoint_id) {
            return Err(DomainError::InactiveRouteCheckpoint { checkpoint_id });
        }
    }
    Ok(())
}

/// Validates an estimated patrol duration.
///
/// # Errors
///
/// Returns `DomainError::InvalidEstimatedDuration` if the duration
/// exceeds [`MAX_ESTIMATED_DURATION_MINUTES`].
pub fn validate_estimated_duration(minutes: u16) -> Result<(), DomainError> {
    if minutes > MAX_ESTIMATED_DURATION_MINUTES {
        return Err(DomainError::InvalidEstimatedDuration {
            minutes,
            max: MAX_ESTIMATED_DURATION_MINUTES,
        });
    }
    Ok(())
}
