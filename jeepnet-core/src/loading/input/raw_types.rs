use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// Index range of one route polyline forming a logical segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub segment_id: String,
    pub route_id: String,
    pub route_name: String,
    #[serde(default)]
    pub direction: String,
    pub start_index: i64,
    pub end_index: i64,
    #[serde(default)]
    pub color_hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<usize>,
}

impl Segment {
    pub fn new(route_id: &str, route_name: &str, start_index: i64, end_index: i64) -> Self {
        Self {
            segment_id: String::new(),
            route_id: route_id.to_string(),
            route_name: route_name.to_string(),
            direction: String::new(),
            start_index,
            end_index,
            color_hex: String::new(),
            start_point: None,
            end_point: None,
            total_points: None,
        }
    }

    /// Name used in warnings; falls back to the route and index range
    pub fn label(&self) -> String {
        if self.segment_id.is_empty() {
            format!(
                "{}[{}..={}]",
                self.route_id, self.start_index, self.end_index
            )
        } else {
            self.segment_id.clone()
        }
    }

    /// Inclusive index range into a polyline of `len` points, if valid
    pub fn index_range(&self, len: usize) -> Option<(usize, usize)> {
        let start = usize::try_from(self.start_index).ok()?;
        let end = usize::try_from(self.end_index).ok()?;
        (start <= end && end < len).then_some((start, end))
    }
}

/// Full geometry of a route as produced by the route-file converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGeometry {
    #[serde(default)]
    pub route_name: String,
    #[serde(default)]
    pub route_color_hex: String,
    pub full_polyline: Vec<Coordinate>,
}

impl RouteGeometry {
    /// Route color as `#RRGGBB`, if the stored value is a usable hex color
    pub fn css_color(&self) -> Option<String> {
        css_color(&self.route_color_hex)
    }
}

/// Route id → geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteLookup {
    routes: HashMap<String, RouteGeometry>,
}

impl RouteLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route_id: impl Into<String>, route: RouteGeometry) {
        self.routes.insert(route_id.into(), route);
    }

    pub fn get(&self, route_id: &str) -> Option<&RouteGeometry> {
        self.routes.get(route_id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RouteGeometry)> {
        self.routes.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, RouteGeometry)> for RouteLookup {
    fn from_iter<I: IntoIterator<Item = (K, RouteGeometry)>>(iter: I) -> Self {
        Self {
            routes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// One route of a segment blueprint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintRoute {
    pub route_id: String,
    pub route_name: String,
    #[serde(default)]
    pub color_hex: Option<String>,
    /// Kept raw so that one malformed definition does not reject the route
    #[serde(default)]
    pub segments: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDefinition {
    pub segment_id: String,
    pub start_index: i64,
    pub end_index: i64,
    pub direction: String,
}

pub type Blueprint = Vec<BlueprintRoute>;

/// Strips `0x`/`#` prefixes and upper-cases a hex color
pub fn normalize_color(raw: &str) -> String {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'))
        .unwrap_or(trimmed);
    digits.to_ascii_uppercase()
}

/// `#RRGGBB` for `RRGGBB` or `AARRGGBB` input in any supported prefix style
pub fn css_color(raw: &str) -> Option<String> {
    let digits = normalize_color(raw);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(format!("#{digits}")),
        8 => Some(format!("#{}", &digits[2..])),
        _ => None,
    }
}
