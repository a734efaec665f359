use pyo3::prelude::*;

use network::{PyNetworkGraph, py_build_network, py_build_network_from_blueprint, py_haversine};

pub mod network;

/// A Python module implemented in Rust.
#[pymodule]
fn jeepnet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyNetworkGraph>()?;
    m.add_function(wrap_pyfunction!(py_build_network, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_network_from_blueprint, m)?)?;
    m.add_function(wrap_pyfunction!(py_haversine, m)?)?;
    Ok(())
}

#[cfg(feature = "stubgen")]
pyo3_stub_gen::define_stub_info_gatherer!(stub_info);
