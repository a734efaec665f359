use hashbrown::HashMap;
use petgraph::unionfind::UnionFind;
use serde::Serialize;

use crate::loading::BuildReport;
use crate::model::{EdgeType, NetworkGraph, NodeId};

/// Summary of a built network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub node_count: usize,
    pub transit_edge_count: usize,
    pub walk_edge_count: usize,
    /// Chain nodes collapsed by simplification
    pub nodes_removed: usize,
    pub segments_accepted: usize,
    pub segments_skipped: usize,
    /// Weakly connected components, isolated nodes included
    pub connected_components: usize,
}

impl NetworkStats {
    pub fn collect(graph: &NetworkGraph, report: &BuildReport, nodes_removed: usize) -> Self {
        Self {
            node_count: graph.node_count(),
            transit_edge_count: graph.edge_count_of(EdgeType::Transit),
            walk_edge_count: graph.edge_count_of(EdgeType::Walk),
            nodes_removed,
            segments_accepted: report.segments_accepted,
            segments_skipped: report.skipped_segments(),
            connected_components: connected_components(graph),
        }
    }
}

/// Counts weakly connected components, ignoring edge direction
pub fn connected_components(graph: &NetworkGraph) -> usize {
    let index: HashMap<NodeId, usize> = graph
        .all_nodes
        .keys()
        .enumerate()
        .map(|(i, id)| (*id, i))
        .collect();

    let mut components = graph.node_count();
    let mut uf = UnionFind::<usize>::new(components);
    for edge in graph.edges() {
        if let (Some(&a), Some(&b)) = (index.get(&edge.start_node_id), index.get(&edge.end_node_id))
            && uf.union(a, b)
        {
            components -= 1;
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Edge};

    fn node(graph: &mut NetworkGraph, lat: f64, lon: f64) -> NodeId {
        graph.ensure_node(Coordinate::new(lat, lon), 6, || "n".into())
    }

    #[test]
    fn empty_graph_has_no_components() {
        assert_eq!(connected_components(&NetworkGraph::new()), 0);
    }

    #[test]
    fn direction_is_ignored() {
        let mut graph = NetworkGraph::new();
        let a = node(&mut graph, 0.0, 0.0);
        let b = node(&mut graph, 0.0, 1.0);
        let c = node(&mut graph, 0.0, 2.0);
        node(&mut graph, 5.0, 5.0);

        graph.push_edge(Edge::transit(a, b, 1.0, 4.0, "R", "R", vec![]));
        graph.push_edge(Edge::transit(c, b, 1.0, 4.0, "S", "S", vec![]));

        assert_eq!(connected_components(&graph), 2);
    }

    #[test]
    fn collects_counts_from_graph_and_report() {
        let mut graph = NetworkGraph::new();
        let a = node(&mut graph, 0.0, 0.0);
        let b = node(&mut graph, 0.0, 0.0005);
        graph.push_edge(Edge::transit(a, b, 0.05, 0.2, "R", "R", vec![]));
        let (from, to) = (graph.all_nodes[&a].clone(), graph.all_nodes[&b].clone());
        graph.push_edge(Edge::walk(&from, &to, 0.05, 0.75));
        graph.push_edge(Edge::walk(&to, &from, 0.05, 0.75));

        let report = BuildReport {
            segments_accepted: 3,
            ..BuildReport::default()
        };
        let stats = NetworkStats::collect(&graph, &report, 7);

        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.transit_edge_count, 1);
        assert_eq!(stats.walk_edge_count, 2);
        assert_eq!(stats.nodes_removed, 7);
        assert_eq!(stats.segments_accepted, 3);
        assert_eq!(stats.segments_skipped, 0);
        assert_eq!(stats.connected_components, 1);
    }
}
