// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod geo;
mod qr;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use geo::{Coordinates, EARTH_RADIUS_M, haversine_distance_m};
pub use qr::{QR_PAYLOAD_TYPE, QrPayload};
pub use types::{
    AssignmentStatus, Checkpoint, CheckpointScan, DEFAULT_SCAN_RADIUS_M, PatrolUser, Route,
    RouteAssignment, RoutePriority, ScanMedia, Station,
};
pub use validation::{
    MAX_ESTIMATED_DURATION_MINUTES, MAX_ROUTE_CHECKPOINTS, validate_checkpoints_active,
    validate_estimated_duration, validate_route_checkpoints, validate_scan_radius,
};
