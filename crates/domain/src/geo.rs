// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Coordinates and great-circle distance.
//!
//! Coordinates are validated at construction, so the distance function is
//! total: invalid or non-finite values are rejected exactly once, at the
//! parse boundary.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, as used by the Haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS-84 coordinate pair.
///
/// Latitude is constrained to `[-90, 90]` and longitude to `[-180, 180]`;
/// both must be finite. The persistence layer stores a coordinate pair as
/// a single `"lat,lng"` delimited string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    latitude: f64,
    /// Longitude in decimal degrees.
    longitude: f64,
}

impl Coordinates {
    /// Creates validated `Coordinates`.
    ///
    /// # Arguments
    ///
    /// * `latitude` - Latitude in decimal degrees
    /// * `longitude` - Longitude in decimal degrees
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either value is not
    /// finite or is outside valid bounds.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if Self::in_bounds(latitude, longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(DomainError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Creates validated `Coordinates` from a user-reported position.
    ///
    /// Identical bounds to [`Coordinates::new`], but an out-of-bounds pair
    /// is reported as `InvalidPosition` so callers can distinguish a bad
    /// device fix from a bad stored checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPosition` if either value is not
    /// finite or is outside valid bounds.
    pub fn from_user_position(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if Self::in_bounds(latitude, longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(DomainError::InvalidPosition {
                latitude,
                longitude,
            })
        }
    }

    fn in_bounds(latitude: f64, longitude: f64) -> bool {
        latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
    }

    /// Parses the persistence-layer `"lat,lng"` delimited form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if the string does not
    /// split into two parseable, in-bounds numbers.
    pub fn parse_storage(value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidCoordinate {
            latitude: f64::NAN,
            longitude: f64::NAN,
        };
        let (lat_str, lng_str) = value.split_once(',').ok_or_else(invalid)?;
        let latitude: f64 = lat_str.trim().parse().map_err(|_| invalid())?;
        let longitude: f64 = lng_str.trim().parse().map_err(|_| invalid())?;
        Self::new(latitude, longitude)
    }

    /// Renders the persistence-layer `"lat,lng"` delimited form.
    #[must_use]
    pub fn to_storage_string(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Computes the great-circle distance between two coordinates in meters.
///
/// Implements the Haversine formula: with φ1, φ2 the latitudes in radians,
/// Δφ and Δλ the deltas,
///
/// ```text
/// a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// c = 2 · atan2(√a, √(1−a))
/// d = R · c
/// ```
///
/// Deterministic, no side effects. `Coordinates` are validated at
/// construction, so the result is always a non-negative finite number.
#[must_use]
pub fn haversine_distance_m(a: Coordinates, b: Coordinates) -> f64 {
    let phi1: f64 = a.latitude().to_radians();
    let phi2: f64 = b.latitude().to_radians();
    let delta_phi: f64 = (b.latitude() - a.latitude()).to_radians();
    let delta_lambda: f64 = (b.longitude() - a.longitude()).to_radians();

    let half_phi: f64 = (delta_phi / 2.0).sin();
    let half_lambda: f64 = (delta_lambda / 2.0).sin();

    let h: f64 = half_phi * half_phi + phi1.cos() * phi2.cos() * half_lambda * half_lambda;
    let c: f64 = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}
