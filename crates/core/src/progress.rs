// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side assignment progress composition.
//!
//! Pure joins of an assignment's completed set against its route
//! definition. Route order is authoritative here: scans are accepted in
//! any order, but "next checkpoint" always means the first route
//! checkpoint not yet completed. No new state, no side effects.

use vigil_domain::{AssignmentStatus, Route, RouteAssignment};

/// The display state of one checkpoint within an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointState {
    /// The checkpoint has been scanned.
    Completed,
    /// The first unscanned checkpoint in route order.
    Next,
    /// Not yet scanned, later in route order.
    Pending,
}

/// Progress detail for one checkpoint on the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointProgress {
    /// The checkpoint id.
    pub checkpoint_id: i64,
    /// 1-based position in route order.
    pub position: usize,
    /// The checkpoint's display state.
    pub state: CheckpointState,
}

/// The recommended next action for the assignment's officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// The assignment has not been started yet.
    StartRoute,
    /// The patrol is in progress and checkpoints remain.
    ScanNextCheckpoint,
    /// The patrol is in progress with nothing left to scan.
    CompleteRoute,
    /// The assignment is terminal.
    None,
}

/// Aggregated progress for one assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentProgress {
    /// The assignment's current status.
    pub status: AssignmentStatus,
    /// Total checkpoints on the route.
    pub total: usize,
    /// Checkpoints completed so far.
    pub completed: usize,
    /// Completion percentage (0-100).
    pub percentage: f64,
    /// Unscanned checkpoint ids in route order.
    pub remaining: Vec<i64>,
    /// The first unscanned checkpoint in route order, if any.
    pub next_checkpoint_id: Option<i64>,
    /// Per-checkpoint display states in route order.
    pub checkpoints: Vec<CheckpointProgress>,
    /// The recommended next action.
    pub next_action: NextAction,
}

/// Computes aggregated progress for an assignment against its route.
///
/// Derived purely from the assignment status and the completed set; the
/// completed count is the intersection with the route's current
/// checkpoint list, so a completion that went stale through a later route
/// edit does not inflate the percentage.
#[must_use]
pub fn assignment_progress(assignment: &RouteAssignment, route: &Route) -> AssignmentProgress {
    let total: usize = route.total_checkpoints();

    let remaining: Vec<i64> = route
        .checkpoint_ids
        .iter()
        .copied()
        .filter(|&id| !assignment.has_completed(id))
        .collect();
    let completed: usize = total - remaining.len();
    let next_checkpoint_id: Option<i64> = remaining.first().copied();

    let percentage: f64 = if total == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let ratio: f64 = completed as f64 / total as f64;
        ratio * 100.0
    };

    let checkpoints: Vec<CheckpointProgress> = route
        .checkpoint_ids
        .iter()
        .enumerate()
        .map(|(index, &checkpoint_id)| {
            let state: CheckpointState = if assignment.has_completed(checkpoint_id) {
                CheckpointState::Completed
            } else if Some(checkpoint_id) == next_checkpoint_id {
                CheckpointState::Next
            } else {
                CheckpointState::Pending
            };
            CheckpointProgress {
                checkpoint_id,
                position: index + 1,
                state,
            }
        })
        .collect();

    let next_action: NextAction = match assignment.status {
        AssignmentStatus::Assigned => NextAction::StartRoute,
        AssignmentStatus::InProgress => {
            if remaining.is_empty() {
                NextAction::CompleteRoute
            } else {
                NextAction::ScanNextCheckpoint
            }
        }
        AssignmentStatus::Completed | AssignmentStatus::Cancelled => NextAction::None,
    };

    AssignmentProgress {
        status: assignment.status,
        total,
        completed,
        percentage,
        remaining,
        next_checkpoint_id,
        checkpoints,
        next_action,
    }
}
