//! Serialized forms of a finished network

mod geojson;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::{Error, model::NetworkGraph};

/// `{allNodes, adjacencyList}` document as consumed by the pathfinder
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn to_json_string(graph: &NetworkGraph, pretty: bool) -> Result<String, Error> {
    let json = if pretty {
        serde_json::to_string_pretty(graph)?
    } else {
        serde_json::to_string(graph)?
    };
    Ok(json)
}

/// Writes the graph document to `path`, replacing any existing file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_json(graph: &NetworkGraph, path: &Path, pretty: bool) -> Result<(), Error> {
    let file = File::create(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to create file '{}': {}", path.display(), e),
        )
    })?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, graph)?;
    } else {
        serde_json::to_writer(&mut writer, graph)?;
    }
    writer.flush()?;

    info!(
        "Wrote network with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Edge};

    fn sample() -> NetworkGraph {
        let mut graph = NetworkGraph::new();
        let a = graph.ensure_node(Coordinate::new(14.5, 121.0), 6, || "R START".into());
        let b = graph.ensure_node(Coordinate::new(14.51, 121.0), 6, || "R END".into());
        graph.push_edge(Edge::transit(
            a,
            b,
            1.1,
            4.4,
            "R",
            "Route",
            vec![Coordinate::new(14.5, 121.0), Coordinate::new(14.51, 121.0)],
        ));
        graph
    }

    #[test]
    fn compact_and_pretty_agree() {
        let graph = sample();
        let compact: serde_json::Value =
            serde_json::from_str(&to_json_string(&graph, false).unwrap()).unwrap();
        let pretty: serde_json::Value =
            serde_json::from_str(&to_json_string(&graph, true).unwrap()).unwrap();
        assert_eq!(compact, pretty);
        assert_eq!(compact["allNodes"]["14.500000,121.000000"]["name"], "R START");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");
        write_json(&sample(), &path, false).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let edges = written["adjacencyList"]["14.500000,121.000000"]
            .as_array()
            .unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0]["routeId"], "R");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("network.json");
        assert!(matches!(
            write_json(&sample(), &path, false),
            Err(Error::IoError(_))
        ));
    }
}
