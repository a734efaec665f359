//! Network graph: node table plus adjacency list

use std::collections::BTreeMap;

use serde::Serialize;

use super::coordinate::{Coordinate, NodeId};
use crate::{Kilometers, Minutes, WALK_ROUTE_ID, WALK_ROUTE_NAME};

/// Physical point of the network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Display name, e.g. `"Route 1 START"`
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EdgeType {
    Transit,
    Walk,
}

/// Directed, weighted connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub start_node_id: NodeId,
    pub end_node_id: NodeId,
    #[serde(rename = "type")]
    pub kind: EdgeType,
    pub distance: Kilometers,
    pub weight: Minutes,
    pub route_id: String,
    pub route_name: String,
    pub polyline_points: Vec<Coordinate>,
}

impl Edge {
    /// Transit edge covering a single pair of consecutive polyline points
    pub fn transit(
        start: NodeId,
        end: NodeId,
        distance: Kilometers,
        weight: Minutes,
        route_id: &str,
        route_name: &str,
        polyline_points: Vec<Coordinate>,
    ) -> Self {
        Self {
            id: format!("{start}-{end}-{route_id}"),
            start_node_id: start,
            end_node_id: end,
            kind: EdgeType::Transit,
            distance,
            weight,
            route_id: route_id.to_string(),
            route_name: route_name.to_string(),
            polyline_points,
        }
    }

    /// Pedestrian transfer between two nodes
    pub fn walk(from: &Node, to: &Node, distance: Kilometers, weight: Minutes) -> Self {
        Self {
            id: format!("W-{}-{}", from.id, to.id),
            start_node_id: from.id,
            end_node_id: to.id,
            kind: EdgeType::Walk,
            distance,
            weight,
            route_id: WALK_ROUTE_ID.to_string(),
            route_name: WALK_ROUTE_NAME.to_string(),
            polyline_points: vec![from.coordinate(), to.coordinate()],
        }
    }

    /// Joins `self` (A→P) with `next` (P→B) into a single A→B edge.
    ///
    /// Costs add up, the junction point appears once in the polyline and
    /// the route is taken from `self`.
    pub fn merged_with(self, next: Edge) -> Self {
        let mut polyline_points = self.polyline_points;
        polyline_points.extend(next.polyline_points.into_iter().skip(1));

        Self {
            id: format!(
                "{}-{}-{}",
                self.start_node_id, next.end_node_id, self.route_id
            ),
            start_node_id: self.start_node_id,
            end_node_id: next.end_node_id,
            kind: self.kind,
            distance: self.distance + next.distance,
            weight: self.weight + next.weight,
            route_id: self.route_id,
            route_name: self.route_name,
            polyline_points,
        }
    }

    pub fn is_transit(&self) -> bool {
        self.kind == EdgeType::Transit
    }

    pub fn is_self_loop(&self) -> bool {
        self.start_node_id == self.end_node_id
    }
}

/// The routable graph handed to the pathfinding consumer.
///
/// Nodes without outgoing edges have no adjacency entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGraph {
    pub all_nodes: BTreeMap<NodeId, Node>,
    pub adjacency_list: BTreeMap<NodeId, Vec<Edge>>,
}

impl NetworkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.all_nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency_list.values().map(Vec::len).sum()
    }

    pub fn edge_count_of(&self, kind: EdgeType) -> usize {
        self.edges().filter(|edge| edge.kind == kind).count()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.all_nodes.get(id)
    }

    /// Outgoing edges of a node, empty for sinks and unknown ids
    pub fn outgoing(&self, id: &NodeId) -> &[Edge] {
        self.adjacency_list.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.adjacency_list.values().flatten()
    }

    /// Returns the id of the node at `coord`, creating it with the name
    /// produced by `name` if this is the first time the point is seen.
    pub fn ensure_node(
        &mut self,
        coord: Coordinate,
        precision: u8,
        name: impl FnOnce() -> String,
    ) -> NodeId {
        let id = NodeId::from_coordinate(coord, precision);
        self.all_nodes.entry(id).or_insert_with(|| Node {
            id,
            name: name(),
            lat: coord.lat,
            lon: coord.lon,
        });
        id
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.adjacency_list
            .entry(edge.start_node_id)
            .or_default()
            .push(edge);
    }

    /// Checks that every edge references nodes present in the node table
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges().filter(|edge| {
            !self.all_nodes.contains_key(&edge.start_node_id)
                || !self.all_nodes.contains_key(&edge.end_node_id)
        })
    }
}
