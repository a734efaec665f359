use std::path::Path;

use jeepnet_core::prelude::*;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
#[cfg(feature = "stubgen")]
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};

fn to_py_err(error: Error) -> PyErr {
    match error {
        Error::InvalidConfig(msg) => PyValueError::new_err(msg),
        other => PyRuntimeError::new_err(format!("Failed to build network: {other}")),
    }
}

/// NetworkGraph
///
/// Routable jeepney network: nodes keyed by their rounded ``"lat,lon"``
/// id and directed TRANSIT and WALK edges weighted in minutes.
///
/// Example:
///
/// .. code-block:: python
///
///     graph = build_network("segments.json", "lookup.json")
///     graph.save("network.json")
#[cfg_attr(feature = "stubgen", gen_stub_pyclass)]
#[pyclass(name = "NetworkGraph")]
pub struct PyNetworkGraph {
    graph: NetworkGraph,
    stats: NetworkStats,
    issues: Vec<String>,
}

impl From<NetworkBuild> for PyNetworkGraph {
    fn from(build: NetworkBuild) -> Self {
        Self {
            issues: build.report.issues.iter().map(ToString::to_string).collect(),
            graph: build.graph,
            stats: build.stats,
        }
    }
}

#[cfg_attr(feature = "stubgen", gen_stub_pymethods)]
#[pymethods]
impl PyNetworkGraph {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Reasons for every input record left out of the network
    pub fn skipped(&self) -> Vec<String> {
        self.issues.clone()
    }

    /// Build statistics as a dictionary
    pub fn stats<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        let stats = &self.stats;
        dict.set_item("node_count", stats.node_count)?;
        dict.set_item("transit_edge_count", stats.transit_edge_count)?;
        dict.set_item("walk_edge_count", stats.walk_edge_count)?;
        dict.set_item("nodes_removed", stats.nodes_removed)?;
        dict.set_item("segments_accepted", stats.segments_accepted)?;
        dict.set_item("segments_skipped", stats.segments_skipped)?;
        dict.set_item("connected_components", stats.connected_components)?;
        Ok(dict)
    }

    /// ``{allNodes, adjacencyList}`` JSON document
    #[pyo3(signature = (pretty = false))]
    pub fn to_json(&self, pretty: bool) -> PyResult<String> {
        to_json_string(&self.graph, pretty).map_err(to_py_err)
    }

    /// GeoJSON FeatureCollection string; route colors are read from
    /// ``lookup_path`` when given
    #[pyo3(signature = (lookup_path = None))]
    pub fn to_geojson(&self, lookup_path: Option<&str>) -> PyResult<String> {
        let lookup = lookup_path
            .map(|path| load_polyline_lookup(Path::new(path)))
            .transpose()
            .map_err(to_py_err)?;
        self.graph
            .to_geojson_string(lookup.as_ref().map(|loaded| &loaded.value))
            .map_err(to_py_err)
    }

    #[pyo3(signature = (path, pretty = false))]
    pub fn save(&self, path: &str, pretty: bool) -> PyResult<()> {
        write_json(&self.graph, Path::new(path), pretty).map_err(to_py_err)
    }

    fn __repr__(&self) -> String {
        format!(
            "NetworkGraph with {} nodes, {} transit edges and {} walk edges",
            self.stats.node_count, self.stats.transit_edge_count, self.stats.walk_edge_count
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

fn network_config(
    transit_speed: f64,
    walk_speed: f64,
    walk_threshold: f64,
    precision: u8,
    min_distance: f64,
) -> NetworkConfig {
    NetworkConfig {
        transit_speed_km_per_min: transit_speed,
        walk_speed_km_per_min: walk_speed,
        walk_threshold_km: walk_threshold,
        coordinate_precision: precision,
        min_distance_km: min_distance,
        proximity_strategy: ProximityStrategy::default(),
    }
}

/// Build a jeepney network from a segment list and a polyline lookup
///
/// Parameters
/// ----------
/// segments_path : str
///     JSON array of segment records
/// lookup_path : str
///     JSON object mapping route ids to their full polylines
/// transit_speed : float, default=0.25
///     Vehicle speed in km per minute
/// walk_speed : float, default=0.06667
///     Walking speed in km per minute
/// walk_threshold : float, default=0.1
///     Longest walking transfer in km
/// precision : int, default=6
///     Decimal places that define node identity
/// min_distance : float, default=0.0001
///     Floor for edge distances in km
///
/// Returns
/// -------
/// NetworkGraph
///
/// Raises
/// ------
/// ValueError
///     If a constant is out of range
/// RuntimeError
///     If an input file cannot be read or parsed
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "build_network")]
#[pyo3(signature = (
    segments_path,
    lookup_path,
    transit_speed = 0.25,
    walk_speed = 0.06667,
    walk_threshold = 0.1,
    precision = 6,
    min_distance = 0.0001
))]
#[allow(clippy::too_many_arguments)]
pub fn py_build_network(
    segments_path: &str,
    lookup_path: &str,
    transit_speed: f64,
    walk_speed: f64,
    walk_threshold: f64,
    precision: u8,
    min_distance: f64,
) -> PyResult<PyNetworkGraph> {
    let config = network_config(
        transit_speed,
        walk_speed,
        walk_threshold,
        precision,
        min_distance,
    );
    build_network_from_files(Path::new(segments_path), Path::new(lookup_path), &config)
        .map(PyNetworkGraph::from)
        .map_err(to_py_err)
}

/// Build a jeepney network from a segment blueprint and a polyline lookup
///
/// Takes the same constants as ``build_network``.
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "build_network_from_blueprint")]
#[pyo3(signature = (
    blueprint_path,
    lookup_path,
    transit_speed = 0.25,
    walk_speed = 0.06667,
    walk_threshold = 0.1,
    precision = 6,
    min_distance = 0.0001
))]
#[allow(clippy::too_many_arguments)]
pub fn py_build_network_from_blueprint(
    blueprint_path: &str,
    lookup_path: &str,
    transit_speed: f64,
    walk_speed: f64,
    walk_threshold: f64,
    precision: u8,
    min_distance: f64,
) -> PyResult<PyNetworkGraph> {
    let config = network_config(
        transit_speed,
        walk_speed,
        walk_threshold,
        precision,
        min_distance,
    );
    build_network_from_blueprint(Path::new(blueprint_path), Path::new(lookup_path), &config)
        .map(PyNetworkGraph::from)
        .map_err(to_py_err)
}

/// Great-circle distance in km between two points given in degrees
#[cfg_attr(feature = "stubgen", gen_stub_pyfunction)]
#[pyfunction(name = "haversine")]
pub fn py_haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2))
}
