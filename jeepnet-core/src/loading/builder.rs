use std::path::Path;

use log::info;

use super::config::NetworkConfig;
use super::edges::build_transit_edges;
use super::input::{
    RouteLookup, Segment, expand_blueprint, load_blueprint, load_polyline_lookup, load_segments,
};
use super::report::BuildReport;
use super::simplify::simplify_network;
use super::transfers::link_nearby_nodes;
use crate::{Error, algo::NetworkStats, model::NetworkGraph};

/// Result of a full build: the graph, every skipped record and a summary
#[derive(Debug, Clone)]
pub struct NetworkBuild {
    pub graph: NetworkGraph,
    pub report: BuildReport,
    pub stats: NetworkStats,
}

/// Runs edge building, chain simplification and proximity linking, in
/// that order, over in-memory inputs.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if the configuration is rejected.
/// Individual bad segments never fail the build; they end up in the report.
pub fn build_network(
    segments: &[Segment],
    lookup: &RouteLookup,
    config: &NetworkConfig,
) -> Result<NetworkBuild, Error> {
    build_with_report(segments, lookup, config, BuildReport::default())
}

fn build_with_report(
    segments: &[Segment],
    lookup: &RouteLookup,
    config: &NetworkConfig,
    mut report: BuildReport,
) -> Result<NetworkBuild, Error> {
    config.validate()?;

    let mut graph = NetworkGraph::new();
    build_transit_edges(&mut graph, segments, lookup, config, &mut report);

    let nodes_removed = simplify_network(&mut graph);
    link_nearby_nodes(&mut graph, config);

    let stats = NetworkStats::collect(&graph, &report, nodes_removed);
    info!(
        "Network built: {} nodes, {} transit edges, {} walk edges",
        stats.node_count, stats.transit_edge_count, stats.walk_edge_count
    );

    Ok(NetworkBuild {
        graph,
        report,
        stats,
    })
}

/// Loads both input documents and builds the network.
///
/// # Errors
///
/// Fails before any graph is built if either file cannot be read or parsed,
/// or if the configuration is rejected.
pub fn build_network_from_files(
    segments_path: &Path,
    lookup_path: &Path,
    config: &NetworkConfig,
) -> Result<NetworkBuild, Error> {
    config.validate()?;

    let segments = load_segments(segments_path)?;
    let lookup = load_polyline_lookup(lookup_path)?;

    let mut report = BuildReport::default();
    report.extend(segments.issues);
    report.extend(lookup.issues);

    build_with_report(&segments.value, &lookup.value, config, report)
}

/// Like [`build_network_from_files`], with segments expanded from a
/// blueprint instead of read from a segment list.
///
/// # Errors
///
/// Fails if either file cannot be read or parsed, or if the configuration
/// is rejected.
pub fn build_network_from_blueprint(
    blueprint_path: &Path,
    lookup_path: &Path,
    config: &NetworkConfig,
) -> Result<NetworkBuild, Error> {
    config.validate()?;

    let blueprint = load_blueprint(blueprint_path)?;
    let lookup = load_polyline_lookup(lookup_path)?;
    let segments = expand_blueprint(&blueprint.value, &lookup.value);

    let mut report = BuildReport::default();
    report.extend(blueprint.issues);
    report.extend(lookup.issues);
    report.extend(segments.issues);

    build_with_report(&segments.value, &lookup.value, config, report)
}
