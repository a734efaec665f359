use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use serde_json::Value;

use super::raw_types::{BlueprintRoute, RouteGeometry, RouteLookup, Segment};
use crate::{Error, loading::SegmentIssue};

/// Parsed input together with the records that had to be dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub issues: Vec<SegmentIssue>,
}

/// Reads a whole JSON document. Any failure here is fatal for the run.
pub fn read_json_file(path: &Path) -> Result<Value, Error> {
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        Error::InvalidData(format!("Failed to parse JSON in '{}': {}", path.display(), e))
    })
}

fn expect_array(value: Value, what: &str) -> Result<Vec<Value>, Error> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(Error::InvalidData(format!(
            "{what} must be a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserializes segment records one by one; malformed records are reported
/// instead of failing the document.
pub fn segments_from_value(value: Value) -> Result<Loaded<Vec<Segment>>, Error> {
    let records = expect_array(value, "segment list")?;
    let mut segments = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Segment>(record) {
            Ok(segment) => segments.push(segment),
            Err(e) => issues.push(SegmentIssue::MalformedSegment {
                position,
                reason: e.to_string(),
            }),
        }
    }

    Ok(Loaded {
        value: segments,
        issues,
    })
}

pub fn lookup_from_value(value: Value) -> Result<Loaded<RouteLookup>, Error> {
    let Value::Object(records) = value else {
        return Err(Error::InvalidData(format!(
            "polyline lookup must be a JSON object, found {}",
            json_kind(&value)
        )));
    };

    let mut lookup = RouteLookup::new();
    let mut issues = Vec::new();
    for (route_id, record) in records {
        match serde_json::from_value::<RouteGeometry>(record) {
            Ok(route) => lookup.insert(route_id, route),
            Err(e) => issues.push(SegmentIssue::MalformedRoute {
                route_id,
                reason: e.to_string(),
            }),
        }
    }

    Ok(Loaded {
        value: lookup,
        issues,
    })
}

pub fn blueprint_from_value(value: Value) -> Result<Loaded<Vec<BlueprintRoute>>, Error> {
    let records = expect_array(value, "segment blueprint")?;
    let mut routes = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (position, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<BlueprintRoute>(record) {
            Ok(route) => routes.push(route),
            Err(e) => issues.push(SegmentIssue::MalformedBlueprint {
                position,
                reason: e.to_string(),
            }),
        }
    }

    Ok(Loaded {
        value: routes,
        issues,
    })
}

/// Loads the segment list produced by the blueprint stage
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array
pub fn load_segments(path: &Path) -> Result<Loaded<Vec<Segment>>, Error> {
    info!("Reading segmented route data from {}", path.display());
    let loaded = segments_from_value(read_json_file(path)?)?;
    info!("Loaded {} segments", loaded.value.len());
    Ok(loaded)
}

/// Loads the route id → polyline lookup
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object
pub fn load_polyline_lookup(path: &Path) -> Result<Loaded<RouteLookup>, Error> {
    info!("Reading polyline lookup from {}", path.display());
    let loaded = lookup_from_value(read_json_file(path)?)?;
    info!("Loaded {} route polylines", loaded.value.len());
    Ok(loaded)
}

/// Loads a segment blueprint
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array
pub fn load_blueprint(path: &Path) -> Result<Loaded<Vec<BlueprintRoute>>, Error> {
    info!("Reading segment blueprint from {}", path.display());
    blueprint_from_value(read_json_file(path)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_segment_is_reported_not_fatal() {
        let value = json!([
            {"routeId": "R", "routeName": "Route", "startIndex": 0, "endIndex": 1},
            {"routeId": "R", "startIndex": 0},
            {"routeId": "R", "routeName": "Route", "startIndex": "zero", "endIndex": 1}
        ]);
        let loaded = segments_from_value(value).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.issues.len(), 2);
        assert!(matches!(
            loaded.issues[0],
            SegmentIssue::MalformedSegment { position: 1, .. }
        ));
    }

    #[test]
    fn non_array_segment_document_is_fatal() {
        assert!(matches!(
            segments_from_value(json!({"routeId": "R"})),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn lookup_drops_routes_without_polyline() {
        let value = json!({
            "R1": {"routeName": "One", "routeColorHex": "0xFF0000FF",
                   "fullPolyline": [{"lat": 0.0, "lon": 0.0}]},
            "R2": {"routeName": "Two"}
        });
        let loaded = lookup_from_value(value).unwrap();
        assert_eq!(loaded.value.len(), 1);
        assert!(loaded.value.get("R1").is_some());
        assert!(matches!(
            &loaded.issues[..],
            [SegmentIssue::MalformedRoute { route_id, .. }] if route_id == "R2"
        ));
    }

    #[test]
    fn non_object_lookup_is_fatal() {
        assert!(lookup_from_value(json!([1, 2])).is_err());
    }
}
