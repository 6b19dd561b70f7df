// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Default geofence scan radius in meters for new checkpoints.
///
/// This is the single authoritative default; deployments can override it
/// per checkpoint or through the assignment policy.
pub const DEFAULT_SCAN_RADIUS_M: f64 = 100.0;

/// Represents the lifecycle state of a route assignment.
///
/// Transitions are monotonic: `Assigned → InProgress → {Completed,
/// Cancelled}`. `Completed` and `Cancelled` are terminal. Force completion
/// is additionally permitted directly from `Assigned` (an administrative
/// close-out of a patrol that never started).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssignmentStatus {
    /// Initial state after creation. The officer has not started the patrol.
    #[default]
    Assigned,
    /// The officer has physically begun the patrol.
    InProgress,
    /// All checkpoints scanned, or force-completed. Terminal.
    Completed,
    /// Cancelled by a supervisor or the officer. Terminal.
    Cancelled,
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AssignmentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Assigned` → `InProgress`
    /// - `Assigned` → `Completed` (force completion before start)
    /// - `Assigned` → `Cancelled`
    /// - `InProgress` → `Completed`
    /// - `InProgress` → `Cancelled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Assigned, Self::InProgress)
                | (Self::Assigned | Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }

    /// Returns whether this status is terminal (no further transitions).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether this status counts toward active-duty rules
    /// (route-conflict and concurrent-assignment limits).
    #[must_use]
    pub const fn is_active_duty(&self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }
}

/// Represents a route's priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePriority {
    /// Routine coverage.
    Low,
    /// Standard patrol priority.
    Medium,
    /// Elevated attention required.
    High,
    /// Immediate, continuous coverage expected.
    Urgent,
}

impl RoutePriority {
    /// Parses a route priority from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match a valid priority.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DomainError::InvalidPriority(format!(
                "Unknown priority: {s}"
            ))),
        }
    }

    /// Returns the string representation of this priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for RoutePriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents a police station that owns checkpoints, routes, and officers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the station has not been persisted yet.
    pub station_id: Option<i64>,
    /// The station's display name.
    pub name: String,
    /// Whether the station is active (soft-delete flag).
    pub is_active: bool,
}

impl Station {
    /// Creates a new `Station` without a persisted id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Station name cannot be empty",
            )));
        }
        Ok(Self {
            station_id: None,
            name,
            is_active: true,
        })
    }
}

/// Represents a patrol officer.
///
/// Officers are the subjects of route assignments and the actors behind
/// checkpoint scans. Authentication is external; the domain only needs a
/// stable identifier, a display name, and the owning station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatrolUser {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the user has not been persisted yet.
    pub user_id: Option<i64>,
    /// The officer's display name.
    pub name: String,
    /// The officer's badge number (informational, not unique).
    pub badge_number: Option<String>,
    /// The station this officer belongs to.
    pub station_id: i64,
    /// Whether the officer is active (soft-delete flag).
    pub is_active: bool,
}

impl PatrolUser {
    /// Creates a new `PatrolUser` without a persisted id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn new(
        name: String,
        badge_number: Option<String>,
        station_id: i64,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "User name cannot be empty",
            )));
        }
        Ok(Self {
            user_id: None,
            name,
            badge_number,
            station_id,
            is_active: true,
        })
    }
}

/// Represents a fixed geofenced physical location identified by a QR code.
///
/// Checkpoints are created by administrators and only ever soft-deleted,
/// since routes may keep referencing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the checkpoint has not been persisted yet.
    pub checkpoint_id: Option<i64>,
    /// The checkpoint's display name.
    pub name: String,
    /// The geofence center.
    pub position: Coordinates,
    /// The maximum allowed distance in meters between a reported user
    /// position and the geofence center for a scan to count as valid.
    pub scan_radius_m: f64,
    /// The station this checkpoint belongs to.
    pub station_id: i64,
    /// Whether the checkpoint is active (soft-delete flag).
    pub is_active: bool,
}

impl Checkpoint {
    /// Creates a new `Checkpoint` without a persisted id.
    ///
    /// # Arguments
    ///
    /// * `name` - The checkpoint's display name
    /// * `position` - The geofence center
    /// * `scan_radius_m` - The scan radius in meters
    /// * `station_id` - The owning station
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the radius is not a
    /// positive finite number.
    pub fn new(
        name: String,
        position: Coordinates,
        scan_radius_m: f64,
        station_id: i64,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Checkpoint name cannot be empty",
            )));
        }
        crate::validation::validate_scan_radius(scan_radius_m)?;
        Ok(Self {
            checkpoint_id: None,
            name,
            position,
            scan_radius_m,
            station_id,
            is_active: true,
        })
    }
}

/// Represents an administrator-defined ordered list of checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the route has not been persisted yet.
    pub route_id: Option<i64>,
    /// The route's display name.
    pub name: String,
    /// The ordered checkpoint ids making up this route.
    ///
    /// Validated at creation/update time (1-50 entries, no duplicates,
    /// each resolving to an active checkpoint). Membership may go stale if
    /// a checkpoint is later deactivated; this is tolerated, not
    /// re-validated.
    pub checkpoint_ids: Vec<i64>,
    /// The station this route belongs to.
    pub station_id: i64,
    /// Optional priority tier.
    pub priority: Option<RoutePriority>,
    /// Optional estimated patrol duration in minutes (0-1440).
    pub estimated_duration_minutes: Option<u16>,
    /// Whether the route is active (soft-delete flag).
    pub is_active: bool,
}

impl Route {
    /// Returns whether the given checkpoint is part of this route.
    #[must_use]
    pub fn contains_checkpoint(&self, checkpoint_id: i64) -> bool {
        self.checkpoint_ids.contains(&checkpoint_id)
    }

    /// Returns the number of checkpoints on this route.
    #[must_use]
    pub const fn total_checkpoints(&self) -> usize {
        self.checkpoint_ids.len()
    }
}

/// Represents the binding of one route to one officer for one patrol cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAssignment {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the assignment has not been persisted yet.
    pub assignment_id: Option<i64>,
    /// The assigned officer.
    pub user_id: i64,
    /// The route being patrolled.
    pub route_id: i64,
    /// The station scope of this assignment.
    pub station_id: i64,
    /// The assignment's lifecycle status.
    pub status: AssignmentStatus,
    /// Assignment time, overwritten with the patrol start time when the
    /// officer starts the route.
    pub start_date: OffsetDateTime,
    /// Set when the assignment reaches a terminal status.
    pub end_date: Option<OffsetDateTime>,
    /// Checkpoint ids completed so far. Grows monotonically while in
    /// progress; a subset of the route's checkpoint list, enforced at scan
    /// time. Order here is arrival order; route order is authoritative for
    /// progress display.
    pub completed_checkpoints: Vec<i64>,
    /// Free-text notes accumulated across lifecycle operations.
    pub notes: Option<String>,
    /// Whether the assignment is active (soft-delete flag).
    pub is_active: bool,
}

impl RouteAssignment {
    /// Creates a new `RouteAssignment` in the `Assigned` state.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The assigned officer
    /// * `route_id` - The route being patrolled
    /// * `station_id` - The station scope
    /// * `now` - The assignment timestamp
    #[must_use]
    pub const fn new(user_id: i64, route_id: i64, station_id: i64, now: OffsetDateTime) -> Self {
        Self {
            assignment_id: None,
            user_id,
            route_id,
            station_id,
            status: AssignmentStatus::Assigned,
            start_date: now,
            end_date: None,
            completed_checkpoints: Vec::new(),
            notes: None,
            is_active: true,
        }
    }

    /// Returns whether the given checkpoint has been completed on this
    /// assignment.
    #[must_use]
    pub fn has_completed(&self, checkpoint_id: i64) -> bool {
        self.completed_checkpoints.contains(&checkpoint_id)
    }
}

/// Opaque URI lists for media attached to a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScanMedia {
    /// Image URIs.
    pub images: Vec<String>,
    /// Video URIs.
    pub videos: Vec<String>,
    /// Audio URIs.
    pub audios: Vec<String>,
}

impl ScanMedia {
    /// Creates an empty media set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            images: Vec::new(),
            videos: Vec::new(),
            audios: Vec::new(),
        }
    }

    /// Returns whether no media is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty() && self.audios.is_empty()
    }
}

/// An append-only audit record of a checkpoint scan attempt that reached
/// persistence.
///
/// Out-of-range attempts are rejected before any row is written, so every
/// persisted scan has `is_valid = true` under current rules; the flag is
/// stored anyway because it is part of the scan's audit contract.
/// Scan rows are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointScan {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the scan has not been persisted yet.
    pub scan_id: Option<i64>,
    /// The scanning officer.
    pub user_id: i64,
    /// The scanned checkpoint.
    pub checkpoint_id: i64,
    /// The route the assignment covers.
    pub route_id: i64,
    /// The assignment this scan progresses.
    pub assignment_id: i64,
    /// When the scan was recorded.
    pub scanned_at: OffsetDateTime,
    /// The officer's reported position at scan time.
    pub position: Coordinates,
    /// Measured distance in meters from the checkpoint center.
    pub distance_m: f64,
    /// True iff `distance_m` was within the checkpoint's scan radius at
    /// the time of the scan.
    pub is_valid: bool,
    /// Optional free-text notes.
    pub notes: Option<String>,
    /// Attached media URIs.
    pub media: ScanMedia,
    /// Arbitrary auxiliary data supplied by the scanning device.
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
