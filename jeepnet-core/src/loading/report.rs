use thiserror::Error;

/// Why a single input record was left out of the network.
///
/// None of these abort a build; they are collected into a [`BuildReport`]
/// and logged as warnings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentIssue {
    #[error("segment {segment}: route `{route_id}` is missing from the polyline lookup")]
    UnknownRoute { segment: String, route_id: String },
    #[error("segment {segment}: route `{route_id}` has an empty polyline")]
    EmptyPolyline { segment: String, route_id: String },
    #[error(
        "segment {segment}: indices {start_index}..={end_index} are invalid for a polyline of {len} points"
    )]
    InvalidIndices {
        segment: String,
        start_index: i64,
        end_index: i64,
        len: usize,
    },
    #[error("segment {segment}: non-finite coordinate at polyline index {index}")]
    NonFiniteCoordinate { segment: String, index: usize },
    #[error("segment record #{position} is malformed: {reason}")]
    MalformedSegment { position: usize, reason: String },
    #[error("blueprint route #{position} is malformed: {reason}")]
    MalformedBlueprint { position: usize, reason: String },
    #[error("route `{route_id}` has a malformed polyline record: {reason}")]
    MalformedRoute { route_id: String, reason: String },
}

/// Per-record outcome of a build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// Segments that produced edges (or were valid single points)
    pub segments_accepted: usize,
    pub issues: Vec<SegmentIssue>,
}

impl BuildReport {
    pub fn record(&mut self, issue: SegmentIssue) {
        log::warn!("Skipping: {issue}");
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = SegmentIssue>) {
        for issue in issues {
            self.record(issue);
        }
    }

    pub fn skipped_segments(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| {
                !matches!(
                    issue,
                    SegmentIssue::MalformedRoute { .. } | SegmentIssue::MalformedBlueprint { .. }
                )
            })
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
