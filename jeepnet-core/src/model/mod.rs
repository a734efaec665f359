//! Data model of the transit network graph

pub mod coordinate;
pub mod network;

pub use coordinate::{Coordinate, MAX_PRECISION, NodeId};
pub use network::{Edge, EdgeType, NetworkGraph, Node};
