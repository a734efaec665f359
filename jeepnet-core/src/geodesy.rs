//! Great-circle distance on a spherical Earth.

use crate::{Kilometers, model::Coordinate};

/// Mean Earth radius used by every distance in the network
pub const EARTH_RADIUS_KM: Kilometers = 6371.0;

/// Haversine distance between two coordinates in kilometers.
///
/// Non-finite input yields a non-finite result; callers reject such
/// coordinates before measuring them.
pub fn haversine(from: Coordinate, to: Coordinate) -> Kilometers {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Position of a coordinate on the unit sphere.
///
/// Straight-line distance between two such points is
/// `2 * sin(arc / 2)`, which grows monotonically with the arc length.
pub(crate) fn unit_vector(coord: Coordinate) -> [f64; 3] {
    let (lat, lon) = (coord.lat.to_radians(), coord.lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Unit-sphere chord length spanning `distance` kilometers of great circle
pub(crate) fn chord_length(distance: Kilometers) -> f64 {
    let arc = (distance / EARTH_RADIUS_KM).clamp(0.0, std::f64::consts::PI);
    2.0 * (arc / 2.0).sin()
}
