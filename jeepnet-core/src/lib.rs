//! Builds a routable weighted graph out of transit route polylines.
//!
//! The pipeline runs in three stages over an owned [`NetworkGraph`]:
//! edge building (one TRANSIT edge per consecutive polyline pair), chain
//! simplification and proximity linking (WALK edges between nearby nodes).

pub mod algo;
pub mod error;
pub mod export;
pub mod geodesy;
pub mod loading;
pub mod model;
pub mod prelude;

pub use error::Error;
pub use loading::{
    BuildReport, NetworkBuild, NetworkConfig, ProximityStrategy, RouteGeometry, RouteLookup,
    Segment, SegmentIssue, build_network, build_network_from_blueprint, build_network_from_files,
};
pub use model::{Coordinate, Edge, EdgeType, NetworkGraph, Node, NodeId};

/// Distance in kilometers
pub type Kilometers = f64;
/// Traversal cost in minutes
pub type Minutes = f64;

/// Route id carried by every WALK edge
pub const WALK_ROUTE_ID: &str = "W_DEFAULT";
/// Route name carried by every WALK edge
pub const WALK_ROUTE_NAME: &str = "Walk Segment";
