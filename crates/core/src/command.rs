// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request assignment state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bind a route to an officer for one patrol cycle.
    AssignRoute {
        /// The officer receiving the assignment.
        user_id: i64,
        /// The route to patrol.
        route_id: i64,
        /// The station scope of the assignment.
        station_id: i64,
    },
    /// Physically begin the patrol for an assignment.
    StartRoute {
        /// The assignment to start.
        assignment_id: i64,
        /// Optional notes recorded at start time.
        notes: Option<String>,
    },
    /// Record a verified checkpoint completion.
    ///
    /// Issued only by the scan verifier after its precondition chain has
    /// passed; this command does not re-deduplicate.
    RecordCheckpointCompletion {
        /// The assignment being progressed.
        assignment_id: i64,
        /// The completed checkpoint.
        checkpoint_id: i64,
    },
    /// Mark an assignment completed, optionally overriding unscanned
    /// checkpoints.
    CompleteRoute {
        /// The assignment to complete.
        assignment_id: i64,
        /// Whether to complete despite unscanned checkpoints.
        force: bool,
        /// Optional completion notes.
        notes: Option<String>,
    },
    /// Cancel an assignment.
    CancelAssignment {
        /// The assignment to cancel.
        assignment_id: i64,
        /// Optional cancellation reason.
        reason: Option<String>,
        /// Optional notes.
        notes: Option<String>,
    },
    /// Soft-delete an assignment that is not in progress.
    DeleteAssignment {
        /// The assignment to delete.
        assignment_id: i64,
    },
}
