//! Expansion of a segment blueprint into the flat segment list consumed
//! by the network builder.

use log::{debug, info};
use serde::Deserialize;

use super::parser::Loaded;
use super::raw_types::{BlueprintRoute, RouteLookup, Segment, SegmentDefinition};
use crate::loading::SegmentIssue;

const DEFAULT_COLOR: &str = "#000000";

/// Validates every segment definition against its route polyline and
/// resolves its start and end points.
pub fn expand_blueprint(
    blueprint: &[BlueprintRoute],
    lookup: &RouteLookup,
) -> Loaded<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut issues = Vec::new();

    for route in blueprint {
        let Some(geometry) = lookup.get(&route.route_id) else {
            issues.push(SegmentIssue::UnknownRoute {
                segment: format!("{}[*]", route.route_id),
                route_id: route.route_id.clone(),
            });
            continue;
        };
        let polyline = &geometry.full_polyline;
        if polyline.is_empty() {
            issues.push(SegmentIssue::EmptyPolyline {
                segment: format!("{}[*]", route.route_id),
                route_id: route.route_id.clone(),
            });
            continue;
        }

        let color_hex = route.color_hex.as_deref().unwrap_or(DEFAULT_COLOR);

        for (position, raw) in route.segments.iter().enumerate() {
            let definition = match SegmentDefinition::deserialize(raw) {
                Ok(definition) => definition,
                Err(e) => {
                    issues.push(SegmentIssue::MalformedSegment {
                        position,
                        reason: format!("route `{}`: {e}", route.route_id),
                    });
                    continue;
                }
            };

            let mut segment = Segment {
                segment_id: definition.segment_id,
                direction: definition.direction,
                color_hex: color_hex.to_string(),
                ..Segment::new(
                    &route.route_id,
                    &route.route_name,
                    definition.start_index,
                    definition.end_index,
                )
            };

            let Some((start, end)) = segment.index_range(polyline.len()) else {
                issues.push(SegmentIssue::InvalidIndices {
                    segment: segment.label(),
                    start_index: segment.start_index,
                    end_index: segment.end_index,
                    len: polyline.len(),
                });
                continue;
            };

            segment.start_point = Some(polyline[start]);
            segment.end_point = Some(polyline[end]);
            segment.total_points = Some(end - start + 1);
            debug!("Processed segment {}", segment.label());
            segments.push(segment);
        }
    }

    info!(
        "Expanded blueprint into {} segments ({} skipped)",
        segments.len(),
        issues.len()
    );
    Loaded {
        value: segments,
        issues,
    }
}
