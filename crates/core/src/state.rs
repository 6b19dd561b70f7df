// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vigil_audit::{AuditEvent, StateSnapshot};
use vigil_domain::{DEFAULT_SCAN_RADIUS_M, PatrolUser, Route, RouteAssignment};

/// Assignment arbitration policy.
///
/// The concurrent-assignment limit is an explicit configuration value, not
/// a hard-coded literal, so deployments and test suites can vary it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentPolicy {
    /// Maximum number of active-duty assignments (status assigned or
    /// in-progress) a single user may hold concurrently.
    pub max_active_assignments: usize,
    /// Scan radius in meters applied to checkpoints created without an
    /// explicit radius.
    pub default_scan_radius_m: f64,
}

impl AssignmentPolicy {
    /// The default concurrent-assignment limit.
    pub const DEFAULT_MAX_ACTIVE_ASSIGNMENTS: usize = 5;

    /// Creates a policy with the given limit and the default scan radius.
    #[must_use]
    pub const fn new(max_active_assignments: usize) -> Self {
        Self {
            max_active_assignments,
            default_scan_radius_m: DEFAULT_SCAN_RADIUS_M,
        }
    }
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ACTIVE_ASSIGNMENTS)
    }
}

/// A consistent snapshot of everything route assignment arbitration needs.
///
/// The caller loads this inside the same critical section that will
/// persist the resulting assignment, so the four conflict checks and the
/// create are evaluated against one view of the world.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignRouteContext {
    /// The officer, if the lookup resolved to an active user.
    pub user: Option<PatrolUser>,
    /// The route, if the lookup resolved.
    pub route: Option<Route>,
    /// The active-duty assignment currently covering the route, if any.
    pub route_active_assignment: Option<RouteAssignment>,
    /// All active-duty assignments currently held by the officer.
    pub user_active_assignments: Vec<RouteAssignment>,
}

/// The state an existing assignment's lifecycle commands operate on.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentState {
    /// The assignment being operated on.
    pub assignment: RouteAssignment,
    /// The route definition the assignment covers.
    pub route: Route,
}

impl AssignmentState {
    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "assignment={},status={},completed={}/{}",
            self.assignment.assignment_id.unwrap_or_default(),
            self.assignment.status,
            self.assignment.completed_checkpoints.len(),
            self.route.total_checkpoints()
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The assignment after the transition.
    pub assignment: RouteAssignment,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
