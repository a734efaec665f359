//! Chain simplification.
//!
//! A node with exactly one inbound and one outbound edge, both TRANSIT and
//! on the same route, carries no branching information: its two edges are
//! replaced by a single edge with the summed distance and weight. The pass
//! repeats until no such node is left. Junctions between routes, branch
//! points, termini (turnarounds included) and anything touched by a WALK
//! edge are kept verbatim.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use log::{debug, info};

use crate::model::{Edge, EdgeType, NetworkGraph, NodeId};

/// Reverse-index entry: the edge `id` stored in the adjacency of `start`
#[derive(Debug, Clone, PartialEq, Eq)]
struct IncomingEdge {
    start: NodeId,
    id: String,
    kind: EdgeType,
}

impl IncomingEdge {
    fn of(edge: &Edge) -> Self {
        Self {
            start: edge.start_node_id,
            id: edge.id.clone(),
            kind: edge.kind,
        }
    }
}

/// Incoming edges keyed by end node. Only lives for the duration of one
/// simplification pass.
struct ReverseIndex {
    incoming: HashMap<NodeId, Vec<IncomingEdge>>,
}

impl ReverseIndex {
    fn build(graph: &NetworkGraph) -> Self {
        let mut incoming: HashMap<NodeId, Vec<IncomingEdge>> = HashMap::new();
        for edge in graph.edges() {
            incoming
                .entry(edge.end_node_id)
                .or_default()
                .push(IncomingEdge::of(edge));
        }
        Self { incoming }
    }

    fn incoming(&self, node: &NodeId) -> &[IncomingEdge] {
        self.incoming.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    fn replace(&mut self, node: &NodeId, old_id: &str, new: IncomingEdge) {
        if let Some(entries) = self.incoming.get_mut(node)
            && let Some(entry) = entries.iter_mut().find(|entry| entry.id == old_id)
        {
            *entry = new;
        }
    }

    fn remove(&mut self, node: &NodeId) {
        self.incoming.remove(node);
    }
}

/// Chain node P together with its unique predecessor edge A→P, stored at
/// `inbound_position` in the adjacency of A
struct Chain {
    node: NodeId,
    predecessor: NodeId,
    inbound_position: usize,
}

fn find_chain(graph: &NetworkGraph, index: &ReverseIndex, node: NodeId) -> Option<Chain> {
    if !graph.all_nodes.contains_key(&node) {
        return None;
    }

    let [inbound] = index.incoming(&node) else {
        return None;
    };
    let [outbound] = graph.outgoing(&node) else {
        return None;
    };

    if inbound.kind != EdgeType::Transit || !outbound.is_transit() {
        return None;
    }
    if inbound.start == node || outbound.is_self_loop() {
        return None;
    }
    // Turnaround A->P->A: P is a route terminus
    if inbound.start == outbound.end_node_id {
        return None;
    }

    let inbound_position = graph
        .outgoing(&inbound.start)
        .iter()
        .position(|edge| edge.id == inbound.id)?;
    if graph.outgoing(&inbound.start)[inbound_position].route_id != outbound.route_id {
        return None;
    }

    Some(Chain {
        node,
        predecessor: inbound.start,
        inbound_position,
    })
}

/// Replaces A→P→B with A→B and removes P. Returns A and B.
fn collapse(
    graph: &mut NetworkGraph,
    index: &mut ReverseIndex,
    chain: Chain,
) -> Option<(NodeId, NodeId)> {
    let Chain {
        node,
        predecessor,
        inbound_position,
    } = chain;

    let outbound = graph.adjacency_list.remove(&node)?.pop()?;
    let successor = outbound.end_node_id;

    let predecessor_edges = graph.adjacency_list.get_mut(&predecessor)?;
    let inbound = predecessor_edges.remove(inbound_position);

    let outbound_id = outbound.id.clone();
    let merged = inbound.merged_with(outbound);
    debug!("Collapsed {node} into {}", merged.id);

    index.replace(&successor, &outbound_id, IncomingEdge::of(&merged));
    index.remove(&node);
    predecessor_edges.push(merged);
    graph.all_nodes.remove(&node);

    Some((predecessor, successor))
}

/// Collapses every chain node of `graph`, returning how many nodes were
/// removed.
pub(crate) fn simplify_network(graph: &mut NetworkGraph) -> usize {
    let order: Vec<NodeId> = graph.all_nodes.keys().copied().collect();
    simplify_in_order(graph, order)
}

/// Worklist form of the fixed-point pass. Only the two neighbours of a
/// collapsed node can change candidacy, so they are re-queued after every
/// merge; the first visit order does not affect the final topology.
pub(crate) fn simplify_in_order(
    graph: &mut NetworkGraph,
    order: impl IntoIterator<Item = NodeId>,
) -> usize {
    info!(
        "Simplifying network of {} nodes (merging chain segments)",
        graph.node_count()
    );

    let mut index = ReverseIndex::build(graph);
    let mut queue: VecDeque<NodeId> = order.into_iter().collect();
    let mut queued: HashSet<NodeId> = queue.iter().copied().collect();
    let mut removed = 0;

    while let Some(node) = queue.pop_front() {
        queued.remove(&node);

        let Some(chain) = find_chain(graph, &index, node) else {
            continue;
        };
        let Some((predecessor, successor)) = collapse(graph, &mut index, chain) else {
            continue;
        };
        removed += 1;

        for neighbour in [predecessor, successor] {
            if queued.insert(neighbour) {
                queue.push_back(neighbour);
            }
        }
    }

    info!("Simplification complete. Removed {removed} nodes");
    removed
}
