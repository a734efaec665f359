use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jeepnet_core::{NetworkConfig, ProximityStrategy};
use serde::Deserialize;

/// Contents of a `jeepnet.toml` file. Every field is optional; command-line
/// arguments take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub network: NetworkConfig,
    pub paths: PathConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathConfig {
    pub segments: Option<PathBuf>,
    pub blueprint: Option<PathBuf>,
    pub lookup: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub geojson: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Network constants that can be set on the command line
#[derive(Debug, Clone, Default, clap::Args)]
pub struct NetworkOverrides {
    /// Vehicle speed in km per minute
    #[arg(long)]
    pub transit_speed: Option<f64>,
    /// Walking speed in km per minute
    #[arg(long)]
    pub walk_speed: Option<f64>,
    /// Longest walking transfer in km
    #[arg(long)]
    pub walk_threshold: Option<f64>,
    /// Decimal places that define node identity
    #[arg(long)]
    pub precision: Option<u8>,
    /// Floor for edge distances in km
    #[arg(long)]
    pub min_distance: Option<f64>,
    /// Nearby-node search used for walking transfers
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    Rtree,
    Exhaustive,
}

impl From<StrategyArg> for ProximityStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Rtree => ProximityStrategy::RTree,
            StrategyArg::Exhaustive => ProximityStrategy::Exhaustive,
        }
    }
}

impl NetworkOverrides {
    pub fn apply(&self, mut config: NetworkConfig) -> NetworkConfig {
        if let Some(speed) = self.transit_speed {
            config.transit_speed_km_per_min = speed;
        }
        if let Some(speed) = self.walk_speed {
            config.walk_speed_km_per_min = speed;
        }
        if let Some(threshold) = self.walk_threshold {
            config.walk_threshold_km = threshold;
        }
        if let Some(precision) = self.precision {
            config.coordinate_precision = precision;
        }
        if let Some(distance) = self.min_distance {
            config.min_distance_km = distance;
        }
        if let Some(strategy) = self.strategy {
            config.proximity_strategy = strategy.into();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = FileConfig::load_optional(None).unwrap();
        assert_eq!(config.network, NetworkConfig::default());
        assert!(config.paths.segments.is_none());
    }

    #[test]
    fn reads_network_table_and_paths() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[network]
walk_threshold_km = 0.25
proximity_strategy = "exhaustive"

[paths]
lookup = "data/lookup.json"
"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.network.walk_threshold_km, 0.25);
        assert_eq!(config.network.transit_speed_km_per_min, 0.25);
        assert_eq!(
            config.network.proximity_strategy,
            ProximityStrategy::Exhaustive
        );
        assert_eq!(config.paths.lookup, Some(PathBuf::from("data/lookup.json")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\nwalk_treshold_km = 1.0").unwrap();
        assert!(FileConfig::load(file.path()).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let overrides = NetworkOverrides {
            walk_speed: Some(0.08),
            strategy: Some(StrategyArg::Exhaustive),
            ..NetworkOverrides::default()
        };
        let config = overrides.apply(NetworkConfig {
            walk_speed_km_per_min: 0.05,
            walk_threshold_km: 0.3,
            ..NetworkConfig::default()
        });
        assert_eq!(config.walk_speed_km_per_min, 0.08);
        assert_eq!(config.walk_threshold_km, 0.3);
        assert_eq!(config.proximity_strategy, ProximityStrategy::Exhaustive);
    }
}
