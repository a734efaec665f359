//! Coordinates and the quantized node identity derived from them

use std::fmt;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize, Serializer};

/// Largest supported rounding precision; keeps quantized values well inside `i64`
pub const MAX_PRECISION: u8 = 9;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point::new(value.lon, value.lat)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(value: Point<f64>) -> Self {
        Self {
            lat: value.y(),
            lon: value.x(),
        }
    }
}

/// Node identity: a coordinate quantized to `precision` decimal places.
///
/// Two coordinates that round to the same pair of integers are the same
/// node. The textual form (`"lat,lon"` with fixed decimals) is only
/// produced when the graph is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    lat: i64,
    lon: i64,
    precision: u8,
}

impl NodeId {
    /// # Panics
    ///
    /// If `precision` exceeds [`MAX_PRECISION`]; configurations are
    /// validated before any node is created.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_coordinate(coord: Coordinate, precision: u8) -> Self {
        assert!(precision <= MAX_PRECISION, "precision {precision} too large");
        let scale = 10f64.powi(i32::from(precision));
        Self {
            lat: (coord.lat * scale).round() as i64,
            lon: (coord.lon * scale).round() as i64,
            precision,
        }
    }

    /// Quantized latitude, in units of `10^-precision` degrees
    pub fn lat_units(&self) -> i64 {
        self.lat
    }

    /// Quantized longitude, in units of `10^-precision` degrees
    pub fn lon_units(&self) -> i64 {
        self.lon
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }
}

fn write_fixed(f: &mut fmt::Formatter<'_>, units: i64, precision: u8) -> fmt::Result {
    let sign = if units < 0 { "-" } else { "" };
    let abs = units.unsigned_abs();
    if precision == 0 {
        return write!(f, "{sign}{abs}");
    }
    let scale = 10u64.pow(u32::from(precision));
    let width = usize::from(precision);
    write!(f, "{sign}{}.{:0width$}", abs / scale, abs % scale)
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.lat, self.precision)?;
        f.write_str(",")?;
        write_fixed(f, self.lon, self.precision)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(lat: f64, lon: f64) -> NodeId {
        NodeId::from_coordinate(Coordinate::new(lat, lon), 6)
    }

    #[test]
    fn differences_beyond_precision_share_a_node() {
        assert_eq!(id(14.123_456_1, 121.000_000_2), id(14.123_456_4, 120.999_999_9));
    }

    #[test]
    fn differences_within_precision_split_nodes() {
        assert_ne!(id(14.123_456, 121.0), id(14.123_457, 121.0));
        assert_ne!(id(14.0, 121.000_001), id(14.0, 121.000_002));
    }

    #[test]
    fn formats_fixed_decimals() {
        assert_eq!(id(14.5, 121.0).to_string(), "14.500000,121.000000");
        assert_eq!(id(-0.5, -121.25).to_string(), "-0.500000,-121.250000");
        assert_eq!(id(0.0, 0.000_001).to_string(), "0.000000,0.000001");
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(id(-0.000_000_1, 0.0), id(0.0, 0.0));
        assert_eq!(id(-0.000_000_1, 0.0).to_string(), "0.000000,0.000000");
    }

    #[test]
    fn zero_precision_has_no_fraction() {
        let node = NodeId::from_coordinate(Coordinate::new(14.6, -121.4), 0);
        assert_eq!(node.to_string(), "15,-121");
    }

    #[test]
    fn serializes_as_string_key() {
        let json = serde_json::to_string(&id(1.0, 2.0)).unwrap();
        assert_eq!(json, "\"1.000000,2.000000\"");
    }
}
