use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::Error;
use crate::loading::RouteLookup;
use crate::model::{Edge, EdgeType, NetworkGraph, Node};

/// Stroke for WALK edges
const WALK_STROKE: &str = "#9E9E9E";
/// Stroke for TRANSIT edges whose route has no usable color
const TRANSIT_STROKE: &str = "#000000";

impl NetworkGraph {
    /// Converts the network to a `GeoJSON` `FeatureCollection`: a Point per
    /// node followed by a LineString per edge.
    ///
    /// Route colors are taken from `lookup` when one is given.
    pub fn to_geojson(&self, lookup: Option<&RouteLookup>) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.node_count() + self.edge_count());

        for node in self.all_nodes.values() {
            features.push(node_feature(node)?);
        }
        for edge in self.edges() {
            features.push(self.edge_feature(edge, lookup)?);
        }

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self, lookup: Option<&RouteLookup>) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(lookup)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }

    fn edge_feature(&self, edge: &Edge, lookup: Option<&RouteLookup>) -> Result<Feature, Error> {
        let mut coords: Vec<Coord<f64>> = edge
            .polyline_points
            .iter()
            .map(|&point| point.into())
            .collect();

        // Edges built without geometry are drawn as a straight line
        if coords.len() < 2
            && let (Some(start), Some(end)) =
                (self.node(&edge.start_node_id), self.node(&edge.end_node_id))
        {
            coords = vec![start.coordinate().into(), end.coordinate().into()];
        }

        let stroke = match edge.kind {
            EdgeType::Walk => WALK_STROKE.to_string(),
            EdgeType::Transit => lookup
                .and_then(|lookup| lookup.get(&edge.route_id))
                .and_then(|route| route.css_color())
                .unwrap_or_else(|| TRANSIT_STROKE.to_string()),
        };

        let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));
        let value = json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": {
                "id": edge.id,
                "type": edge.kind,
                "routeId": edge.route_id,
                "routeName": edge.route_name,
                "distance": edge.distance,
                "weight": edge.weight,
                "stroke": stroke,
            }
        });

        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn node_feature(node: &Node) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&Point::from(node.coordinate())));
    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "id": node.id,
            "name": node.name,
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::RouteGeometry;
    use crate::model::Coordinate;

    fn graph() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        let a = graph.ensure_node(Coordinate::new(0.0, 0.0), 6, || "a".into());
        let b = graph.ensure_node(Coordinate::new(0.0, 0.0005), 6, || "b".into());
        graph.push_edge(Edge::transit(a, b, 0.05, 0.2, "R1", "Route 1", vec![]));
        let (from, to) = (graph.all_nodes[&a].clone(), graph.all_nodes[&b].clone());
        graph.push_edge(Edge::walk(&from, &to, 0.05, 0.75));
        graph
    }

    fn lookup() -> RouteLookup {
        [(
            "R1",
            RouteGeometry {
                route_name: "Route 1".into(),
                route_color_hex: "0xFFE53935".into(),
                full_polyline: vec![],
            },
        )]
        .into_iter()
        .collect()
    }

    fn features(lookup: Option<&RouteLookup>) -> Vec<serde_json::Value> {
        let collection = graph().to_geojson(lookup).unwrap();
        let value = serde_json::to_value(&collection).unwrap();
        value["features"].as_array().unwrap().clone()
    }

    #[test]
    fn nodes_then_edges() {
        let features = features(Some(&lookup()));
        let kinds: Vec<_> = features
            .iter()
            .map(|f| f["geometry"]["type"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, ["Point", "Point", "LineString", "LineString"]);
        assert_eq!(features[0]["properties"]["id"], "0.000000,0.000000");
        assert_eq!(features[0]["geometry"]["coordinates"], json!([0.0, 0.0]));
    }

    #[test]
    fn strokes_follow_edge_type_and_route_color() {
        let features = features(Some(&lookup()));
        assert_eq!(features[2]["properties"]["stroke"], "#E53935");
        assert_eq!(features[3]["properties"]["stroke"], WALK_STROKE);
        assert_eq!(features[3]["properties"]["routeId"], crate::WALK_ROUTE_ID);

        let plain = self::features(None);
        assert_eq!(plain[2]["properties"]["stroke"], TRANSIT_STROKE);
        assert_eq!(plain[2]["properties"]["type"], "TRANSIT");
    }

    #[test]
    fn edges_without_geometry_use_node_positions() {
        let features = features(None);
        assert_eq!(
            features[2]["geometry"]["coordinates"],
            json!([[0.0, 0.0], [0.0005, 0.0]])
        );
    }
}
