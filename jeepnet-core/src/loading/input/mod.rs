//! Input documents: segment list, polyline lookup and segment blueprint

mod blueprint;
mod parser;
mod raw_types;

pub use blueprint::expand_blueprint;
pub use parser::{
    Loaded, blueprint_from_value, load_blueprint, load_polyline_lookup, load_segments,
    lookup_from_value, read_json_file, segments_from_value,
};
pub use raw_types::{
    Blueprint, BlueprintRoute, RouteGeometry, RouteLookup, Segment, SegmentDefinition, css_color,
    normalize_color,
};
