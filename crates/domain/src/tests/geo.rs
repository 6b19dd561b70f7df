// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::geo::{Coordinates, haversine_distance_m};

fn coords(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap()
}

#[test]
fn test_distance_to_self_is_zero() {
    let points = [
        coords(0.0, 0.0),
        coords(51.5074, -0.1278),
        coords(-33.8688, 151.2093),
        coords(90.0, 0.0),
        coords(-90.0, 180.0),
    ];
    for p in points {
        assert!(haversine_distance_m(p, p).abs() < 1e-9);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let a = coords(40.7128, -74.0060);
    let b = coords(34.0522, -118.2437);

    let ab = haversine_distance_m(a, b);
    let ba = haversine_distance_m(b, a);

    assert!((ab - ba).abs() < 1e-6);
}

#[test]
fn test_distance_one_degree_longitude_at_equator() {
    let a = coords(0.0, 0.0);
    let b = coords(0.0, 1.0);

    // One degree of longitude at the equator is R * pi / 180.
    let expected = 6_371_000.0 * std::f64::consts::PI / 180.0;
    let actual = haversine_distance_m(a, b);

    assert!((actual - expected).abs() < 1.0, "got {actual}");
}

#[test]
fn test_distance_known_city_pair() {
    // London to Paris, great-circle distance roughly 343.5 km.
    let london = coords(51.5074, -0.1278);
    let paris = coords(48.8566, 2.3522);

    let distance = haversine_distance_m(london, paris);

    assert!(
        (343_000.0..345_000.0).contains(&distance),
        "got {distance}"
    );
}

#[test]
fn test_distance_is_non_negative() {
    let a = coords(-89.9, -179.9);
    let b = coords(89.9, 179.9);

    assert!(haversine_distance_m(a, b) >= 0.0);
}

#[test]
fn test_coordinates_reject_out_of_bounds_latitude() {
    let result = Coordinates::new(90.01, 0.0);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidCoordinate { .. }
    ));
}

#[test]
fn test_coordinates_reject_out_of_bounds_longitude() {
    let result = Coordinates::new(0.0, -180.01);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidCoordinate { .. }
    ));
}

#[test]
fn test_coordinates_reject_nan() {
    let result = Coordinates::new(f64::NAN, 0.0);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidCoordinate { .. }
    ));
}

#[test]
fn test_coordinates_accept_boundary_values() {
    assert!(Coordinates::new(90.0, 180.0).is_ok());
    assert!(Coordinates::new(-90.0, -180.0).is_ok());
}

#[test]
fn test_user_position_reports_invalid_position() {
    let result = Coordinates::from_user_position(f64::INFINITY, 0.0);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidPosition { .. }
    ));
}

#[test]
fn test_storage_string_round_trip() {
    let original = coords(12.34, -56.78);

    let parsed = Coordinates::parse_storage(&original.to_storage_string()).unwrap();

    assert!((parsed.latitude() - 12.34).abs() < 1e-12);
    assert!((parsed.longitude() - (-56.78)).abs() < 1e-12);
}

#[test]
fn test_parse_storage_tolerates_whitespace() {
    let parsed = Coordinates::parse_storage(" 1.5 , -2.5 ").unwrap();

    assert!((parsed.latitude() - 1.5).abs() < 1e-12);
    assert!((parsed.longitude() - (-2.5)).abs() < 1e-12);
}

#[test]
fn test_parse_storage_rejects_garbage() {
    assert!(Coordinates::parse_storage("not-a-coordinate").is_err());
    assert!(Coordinates::parse_storage("1.0").is_err());
    assert!(Coordinates::parse_storage("1.0,abc").is_err());
    assert!(Coordinates::parse_storage("91.0,0.0").is_err());
}
