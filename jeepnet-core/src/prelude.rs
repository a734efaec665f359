// Re-export key components
pub use crate::algo::stats::NetworkStats;
pub use crate::export::{to_json_string, write_json};
pub use crate::geodesy::haversine;
pub use crate::loading::{
    BuildReport, NetworkBuild, NetworkConfig, ProximityStrategy, build_network,
    build_network_from_blueprint, build_network_from_files,
};
pub use crate::loading::input::{
    Blueprint, RouteGeometry, RouteLookup, Segment, expand_blueprint, load_blueprint,
    load_polyline_lookup, load_segments,
};
pub use crate::model::{Coordinate, Edge, EdgeType, NetworkGraph, Node, NodeId};

// Core scalar types
pub use crate::Kilometers;
pub use crate::Minutes;

pub use crate::Error;
