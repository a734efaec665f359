//! High-resolution TRANSIT edges: one edge per consecutive pair of
//! polyline points inside every segment.

use itertools::Itertools;
use log::{debug, info};

use super::config::NetworkConfig;
use super::input::{RouteLookup, Segment};
use super::report::{BuildReport, SegmentIssue};
use crate::geodesy::haversine;
use crate::model::{Edge, NetworkGraph};

/// Adds the edges of every segment to `graph`, reporting the ones that
/// cannot be resolved against `lookup`.
pub(crate) fn build_transit_edges(
    graph: &mut NetworkGraph,
    segments: &[Segment],
    lookup: &RouteLookup,
    config: &NetworkConfig,
    report: &mut BuildReport,
) {
    info!("Building initial transit edges from {} segments", segments.len());

    for segment in segments {
        match add_segment_edges(graph, segment, lookup, config) {
            Ok(edge_count) => {
                debug!("Segment {} produced {edge_count} edges", segment.label());
                report.segments_accepted += 1;
            }
            Err(issue) => report.record(issue),
        }
    }

    info!(
        "Built {} nodes and {} transit edges",
        graph.node_count(),
        graph.edge_count()
    );
}

fn add_segment_edges(
    graph: &mut NetworkGraph,
    segment: &Segment,
    lookup: &RouteLookup,
    config: &NetworkConfig,
) -> Result<usize, SegmentIssue> {
    let route = lookup
        .get(&segment.route_id)
        .ok_or_else(|| SegmentIssue::UnknownRoute {
            segment: segment.label(),
            route_id: segment.route_id.clone(),
        })?;

    let polyline = &route.full_polyline;
    if polyline.is_empty() {
        return Err(SegmentIssue::EmptyPolyline {
            segment: segment.label(),
            route_id: segment.route_id.clone(),
        });
    }

    // Bounds are checked before the slice is taken
    let (start, end) =
        segment
            .index_range(polyline.len())
            .ok_or_else(|| SegmentIssue::InvalidIndices {
                segment: segment.label(),
                start_index: segment.start_index,
                end_index: segment.end_index,
                len: polyline.len(),
            })?;
    let points = &polyline[start..=end];

    if let Some(offset) = points.iter().position(|point| !point.is_finite()) {
        return Err(SegmentIssue::NonFiniteCoordinate {
            segment: segment.label(),
            index: start + offset,
        });
    }

    let starts_route = start == 0;
    let ends_route = end == polyline.len() - 1;
    let last_pair = points.len().saturating_sub(2);
    let route_name = segment.route_name.as_str();
    let precision = config.coordinate_precision;

    let mut edge_count = 0;
    for (i, (&from, &to)) in points.iter().tuple_windows().enumerate() {
        let from_id = graph.ensure_node(from, precision, || {
            if i == 0 && starts_route {
                format!("{route_name} START")
            } else {
                format!("{route_name} Midpoint")
            }
        });
        let to_id = graph.ensure_node(to, precision, || {
            if i == last_pair && ends_route {
                format!("{route_name} END")
            } else {
                format!("{route_name} Midpoint")
            }
        });

        let distance = haversine(from, to).max(config.min_distance_km);
        let weight = distance / config.transit_speed_km_per_min;

        graph.push_edge(Edge::transit(
            from_id,
            to_id,
            distance,
            weight,
            &segment.route_id,
            route_name,
            vec![from, to],
        ));
        edge_count += 1;
    }

    Ok(edge_count)
}
