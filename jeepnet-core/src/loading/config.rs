use serde::{Deserialize, Serialize};

use crate::{Error, model::MAX_PRECISION};

/// How the proximity linker finds node pairs within walking distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProximityStrategy {
    /// R-tree over unit-sphere positions, confirmed with haversine
    #[default]
    #[serde(rename = "rtree")]
    RTree,
    /// Every unordered pair is measured
    Exhaustive,
}

/// Constants that shape edge weights and graph topology.
///
/// They must agree with whatever the pathfinding consumer assumes, so
/// every one of them can be overridden from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Average vehicle speed, km per minute
    pub transit_speed_km_per_min: f64,
    /// Average walking speed, km per minute
    pub walk_speed_km_per_min: f64,
    /// Largest distance bridged by a WALK edge, km
    pub walk_threshold_km: f64,
    /// Decimal places used for node identity
    pub coordinate_precision: u8,
    /// Shorter TRANSIT legs are clamped to this distance, km
    pub min_distance_km: f64,
    pub proximity_strategy: ProximityStrategy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            transit_speed_km_per_min: 0.25,
            walk_speed_km_per_min: 0.06667,
            walk_threshold_km: 0.1,
            coordinate_precision: 6,
            min_distance_km: 0.0001,
            proximity_strategy: ProximityStrategy::default(),
        }
    }
}

impl NetworkConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when a constant would produce
    /// non-positive or non-finite weights.
    pub fn validate(&self) -> Result<(), Error> {
        let positive = |value: f64| value.is_finite() && value > 0.0;

        if !positive(self.transit_speed_km_per_min) {
            return Err(Error::InvalidConfig(format!(
                "transit speed must be positive, got {}",
                self.transit_speed_km_per_min
            )));
        }
        if !positive(self.walk_speed_km_per_min) {
            return Err(Error::InvalidConfig(format!(
                "walking speed must be positive, got {}",
                self.walk_speed_km_per_min
            )));
        }
        if !self.walk_threshold_km.is_finite() || self.walk_threshold_km < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "walking threshold must be a non-negative distance, got {}",
                self.walk_threshold_km
            )));
        }
        if !positive(self.min_distance_km) {
            return Err(Error::InvalidConfig(format!(
                "minimum distance must be positive, got {}",
                self.min_distance_km
            )));
        }
        if self.coordinate_precision > MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "coordinate precision must be at most {MAX_PRECISION}, got {}",
                self.coordinate_precision
            )));
        }
        Ok(())
    }
}
