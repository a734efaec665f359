//! Input loading and the three network stages: edge building, chain
//! simplification and proximity linking.

mod builder;
mod config;
mod edges;
pub mod input;
mod report;
mod simplify;
mod transfers;

pub use builder::{
    NetworkBuild, build_network, build_network_from_blueprint, build_network_from_files,
};
pub use config::{NetworkConfig, ProximityStrategy};
pub use input::{RouteGeometry, RouteLookup, Segment};
pub use report::{BuildReport, SegmentIssue};
