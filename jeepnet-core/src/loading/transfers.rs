use log::{debug, info};
use rayon::prelude::*;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::config::{NetworkConfig, ProximityStrategy};
use crate::geodesy::{chord_length, haversine, unit_vector};
use crate::Kilometers;
use crate::model::{Coordinate, Edge, NetworkGraph, Node};

/// Slack on the R-tree search radius, relative and absolute (unit-sphere
/// chord units); the haversine check that follows decides membership exactly.
const SEARCH_RADIUS_SLACK: f64 = 1e-9;
const SEARCH_RADIUS_EPSILON: f64 = 1e-12;

/// Unordered pair of node positions (`first < second`) within walking range
#[derive(Debug, Clone, Copy, PartialEq)]
struct NearbyPair {
    first: usize,
    second: usize,
    distance: Kilometers,
}

/// Node position on the unit sphere, indexed by its place in the node table
#[derive(Debug, Clone, Copy)]
struct IndexedNode {
    index: usize,
    position: [f64; 3],
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.position
            .iter()
            .zip(point)
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }
}

fn within_walking_range(
    from: Coordinate,
    to: Coordinate,
    threshold: Kilometers,
) -> Option<Kilometers> {
    let distance = haversine(from, to);
    (distance > 0.0 && distance <= threshold).then_some(distance)
}

/// Measures every unordered pair
fn exhaustive_pairs(coords: &[Coordinate], threshold: Kilometers) -> Vec<NearbyPair> {
    (0..coords.len())
        .into_par_iter()
        .flat_map_iter(|first| {
            ((first + 1)..coords.len()).filter_map(move |second| {
                within_walking_range(coords[first], coords[second], threshold).map(|distance| {
                    NearbyPair {
                        first,
                        second,
                        distance,
                    }
                })
            })
        })
        .collect()
}

/// R-tree candidates on the unit sphere, confirmed with haversine.
///
/// Chord length grows monotonically with arc length, so a ball of chord
/// radius around a node contains every node within the walking threshold.
fn indexed_pairs(coords: &[Coordinate], threshold: Kilometers) -> Vec<NearbyPair> {
    let tree = RTree::bulk_load(
        coords
            .iter()
            .enumerate()
            .map(|(index, &coord)| IndexedNode {
                index,
                position: unit_vector(coord),
            })
            .collect(),
    );
    let radius = chord_length(threshold) * (1.0 + SEARCH_RADIUS_SLACK) + SEARCH_RADIUS_EPSILON;
    let max_squared_radius = radius * radius;

    (0..coords.len())
        .into_par_iter()
        .flat_map_iter(|first| {
            let mut neighbours: Vec<NearbyPair> = tree
                .locate_within_distance(unit_vector(coords[first]), max_squared_radius)
                .filter(|candidate| candidate.index > first)
                .filter_map(|candidate| {
                    within_walking_range(coords[first], coords[candidate.index], threshold).map(
                        |distance| NearbyPair {
                            first,
                            second: candidate.index,
                            distance,
                        },
                    )
                })
                .collect();
            neighbours.sort_unstable_by_key(|pair| pair.second);
            neighbours
        })
        .collect()
}

/// Connects every pair of distinct nodes closer than the walking threshold
/// with a WALK edge in each direction. Returns the number of edges added.
pub(crate) fn link_nearby_nodes(graph: &mut NetworkGraph, config: &NetworkConfig) -> usize {
    let threshold = config.walk_threshold_km;
    info!(
        "Adding inter-node walk edges (max {threshold} km) between {} nodes",
        graph.node_count()
    );

    let nodes: Vec<Node> = graph.all_nodes.values().cloned().collect();
    let coords: Vec<Coordinate> = nodes.iter().map(Node::coordinate).collect();

    let pairs = match config.proximity_strategy {
        ProximityStrategy::RTree => indexed_pairs(&coords, threshold),
        ProximityStrategy::Exhaustive => exhaustive_pairs(&coords, threshold),
    };

    for pair in &pairs {
        let (a, b) = (&nodes[pair.first], &nodes[pair.second]);
        let weight = pair.distance / config.walk_speed_km_per_min;
        debug!("Walk link {} <-> {} ({:.4} km)", a.id, b.id, pair.distance);

        graph.push_edge(Edge::walk(a, b, pair.distance, weight));
        graph.push_edge(Edge::walk(b, a, pair.distance, weight));
    }

    let added = pairs.len() * 2;
    info!("Added {added} walk edges");
    added
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::{EdgeType, NodeId};

    fn graph_of(points: &[(f64, f64)]) -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        for &(lat, lon) in points {
            graph.ensure_node(Coordinate::new(lat, lon), 6, || "node".into());
        }
        graph
    }

    fn id(lat: f64, lon: f64) -> NodeId {
        NodeId::from_coordinate(Coordinate::new(lat, lon), 6)
    }

    fn walk_edges(graph: &NetworkGraph) -> Vec<&Edge> {
        graph
            .edges()
            .filter(|edge| edge.kind == EdgeType::Walk)
            .collect()
    }

    #[test]
    fn nearby_nodes_get_symmetric_walk_edges() {
        // ~55 m apart along the equator
        let mut graph = graph_of(&[(0.0, 0.0), (0.0, 0.0005)]);
        let added = link_nearby_nodes(&mut graph, &NetworkConfig::default());

        assert_eq!(added, 2);
        let forward = &graph.outgoing(&id(0.0, 0.0))[0];
        let backward = &graph.outgoing(&id(0.0, 0.0005))[0];
        assert_eq!(forward.kind, EdgeType::Walk);
        assert_eq!(forward.end_node_id, backward.start_node_id);
        assert_eq!(forward.distance, backward.distance);
        assert_eq!(forward.weight, backward.weight);
        assert_relative_eq!(forward.weight, forward.distance / 0.06667, epsilon = 1e-12);
        assert_eq!(forward.route_id, crate::WALK_ROUTE_ID);
        assert_eq!(forward.route_name, crate::WALK_ROUTE_NAME);
        assert_eq!(
            forward.polyline_points,
            vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0005)]
        );
        assert_eq!(backward.polyline_points[0], Coordinate::new(0.0, 0.0005));
        assert_eq!(forward.id, format!("W-{}-{}", id(0.0, 0.0), id(0.0, 0.0005)));
    }

    #[test]
    fn distant_nodes_are_not_linked() {
        let mut graph = graph_of(&[(0.0, 0.0), (0.0, 0.01)]);
        assert_eq!(link_nearby_nodes(&mut graph, &NetworkConfig::default()), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let a = Coordinate::new(14.6, 121.0);
        let b = Coordinate::new(14.6, 121.0007);
        let exact = haversine(a, b);

        for strategy in [ProximityStrategy::RTree, ProximityStrategy::Exhaustive] {
            let mut graph = graph_of(&[(a.lat, a.lon), (b.lat, b.lon)]);
            let at_threshold = NetworkConfig {
                walk_threshold_km: exact,
                proximity_strategy: strategy,
                ..NetworkConfig::default()
            };
            assert_eq!(link_nearby_nodes(&mut graph, &at_threshold), 2);

            let mut graph = graph_of(&[(a.lat, a.lon), (b.lat, b.lon)]);
            let below = NetworkConfig {
                walk_threshold_km: exact * (1.0 - 1e-6),
                proximity_strategy: strategy,
                ..NetworkConfig::default()
            };
            assert_eq!(link_nearby_nodes(&mut graph, &below), 0);
        }
    }

    #[test]
    fn sub_metre_threshold_matches_exhaustive() {
        for step in 1..=50 {
            let a = Coordinate::new(14.6 + f64::from(step) * 0.001, 121.0);
            let b = Coordinate::new(a.lat + 0.000_000_7, a.lon + 0.000_000_6);
            let exact = haversine(a, b);
            assert!(exact < 0.001);

            for strategy in [ProximityStrategy::RTree, ProximityStrategy::Exhaustive] {
                let mut graph = NetworkGraph::new();
                graph.ensure_node(a, 9, || "a".into());
                graph.ensure_node(b, 9, || "b".into());
                let config = NetworkConfig {
                    walk_threshold_km: exact,
                    proximity_strategy: strategy,
                    ..NetworkConfig::default()
                };
                assert_eq!(link_nearby_nodes(&mut graph, &config), 2, "{strategy:?} at {step}");
            }
        }
    }

    #[test]
    fn zero_distance_pairs_are_excluded() {
        // Distinct ids at precision 9, same point once projected
        let mut graph = NetworkGraph::new();
        graph.ensure_node(Coordinate::new(1.0, 1.0), 9, || "a".into());
        graph.ensure_node(Coordinate::new(1.0, 1.000_000_001), 9, || "b".into());
        let a = graph.all_nodes.keys().next().copied().unwrap();
        graph.all_nodes.get_mut(&a).unwrap().lon = 1.000_000_001;

        assert_eq!(link_nearby_nodes(&mut graph, &NetworkConfig::default()), 0);
    }

    #[test]
    fn strategies_agree() {
        let mut points = Vec::new();
        for i in 0..12 {
            for j in 0..12 {
                let jitter = f64::from((i * 7 + j * 3) % 5) * 0.000_05;
                points.push((
                    14.6 + f64::from(i) * 0.0006 + jitter,
                    121.0 + f64::from(j) * 0.0007 - jitter,
                ));
            }
        }

        let mut indexed = graph_of(&points);
        let mut exhaustive = indexed.clone();
        link_nearby_nodes(&mut indexed, &NetworkConfig::default());
        link_nearby_nodes(
            &mut exhaustive,
            &NetworkConfig {
                proximity_strategy: ProximityStrategy::Exhaustive,
                ..NetworkConfig::default()
            },
        );

        assert!(!walk_edges(&indexed).is_empty());
        assert_eq!(indexed, exhaustive);
    }
}
