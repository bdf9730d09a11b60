//! rust_gwtransport — deposition inversion for 1-D advective groundwater
//! transport, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing deposition inversion and forward
//! prediction to Python through the `_rust_gwtransport` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`transport`] (coefficients,
//!   nullspace, inversion, prediction) and [`optimization`] (the L-BFGS
//!   minimizer used for the nullspace refinement).
//! - Define the `#[pyfunction]` wrappers and the `#[pymodule]` initializer
//!   for `_rust_gwtransport`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file only converts
//!   Python inputs, calls into [`transport`], and maps errors.
//! - Python callers pass timestamps as float days on a common epoch.
//!
//! Conventions
//! -----------
//! - Errors from the Rust core are converted to `ValueError` at the PyO3
//!   boundary; malformed array arguments raise `TypeError`.
//! - Python functions return plain numpy arrays; the caller re-attaches the
//!   index (flow index for deposition, valid-row index for concentration).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`transport`] directly and can ignore
//!   the items guarded by `python-bindings`.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_deposition_pipeline.rs`.

pub mod optimization;
pub mod transport;
pub mod utils;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    transport::{AdvectiveResidenceTime, TimeSeries},
    utils::{
        extract_deposition_options, extract_f64_array, extract_flow_and_aquifer, extract_objective,
    },
};

/// compute_deposition — invert an observed concentration into deposition.
///
/// Parameters
/// ----------
/// - `cout`: array-like of `float`
///   Concentration at every extraction timestamp with a determinable
///   residence time, in flow order.
/// - `flow`, `index`: array-like of `float`
///   Daily flow and its timestamps (days, strictly increasing).
/// - `pore_volume`, `porosity`, `thickness`, `retardation_factor`: `float`
///   Aquifer parameters.
/// - `nullspace_objective`: `str | callable | None`
///   `"squared_lengths"` (default), `"summed_lengths"`, or
///   `f(w, x_ls, N) -> float`.
/// - `tol_grad`, `tol_cost`, `max_iter`, `line_searcher`, `lbfgs_mem`,
///   `verbose`: optimizer settings.
///
/// Returns
/// -------
/// `numpy.ndarray` of deposition, aligned to `index`.
///
/// Errors
/// ------
/// - `ValueError` for invalid parameters, a shape mismatch between `cout`
///   and the valid rows, an unknown objective name, or a failed
///   optimization.
/// - `TypeError` for arguments that are not 1-D float arrays.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "compute_deposition")]
#[pyo3(signature = (
    cout, flow, index, pore_volume, porosity, thickness, retardation_factor = 1.0,
    nullspace_objective = None, tol_grad = 1e-8, tol_cost = 1e-12, max_iter = 2000,
    line_searcher = None, lbfgs_mem = None, verbose = false
))]
#[allow(clippy::too_many_arguments)]
fn py_compute_deposition<'py>(
    py: Python<'py>, cout: &Bound<'py, PyAny>, flow: &Bound<'py, PyAny>,
    index: &Bound<'py, PyAny>, pore_volume: f64, porosity: f64, thickness: f64,
    retardation_factor: f64, nullspace_objective: Option<&Bound<'py, PyAny>>, tol_grad: f64,
    tol_cost: f64, max_iter: usize, line_searcher: Option<&str>, lbfgs_mem: Option<usize>,
    verbose: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let (flow, aquifer) =
        extract_flow_and_aquifer(flow, index, pore_volume, porosity, thickness, retardation_factor)?;
    let cout = extract_f64_array(cout, "cout")?;
    let objective = extract_objective(nullspace_objective)?;
    let options =
        extract_deposition_options(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, verbose)?;

    let deposition =
        transport::compute_deposition(&cout, &flow, &aquifer, &objective, &options)?;
    let (_, values) = deposition.into_parts();
    Ok(values.into_pyarray(py))
}

/// compute_concentration — predict extraction concentration from deposition.
///
/// Returns
/// -------
/// `(index, cout)`: the extraction timestamps with a residence time and the
/// predicted concentration at each of them.
///
/// Errors
/// ------
/// - `ValueError` for invalid parameters or a deposition series not
///   aligned to `flow`.
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "compute_concentration")]
#[pyo3(signature = (
    deposition, flow, index, pore_volume, porosity, thickness, retardation_factor = 1.0
))]
#[allow(clippy::too_many_arguments)]
fn py_compute_concentration<'py>(
    py: Python<'py>, deposition: &Bound<'py, PyAny>, flow: &Bound<'py, PyAny>,
    index: &Bound<'py, PyAny>, pore_volume: f64, porosity: f64, thickness: f64,
    retardation_factor: f64,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let (flow, aquifer) =
        extract_flow_and_aquifer(flow, index, pore_volume, porosity, thickness, retardation_factor)?;
    let deposition =
        TimeSeries::new(flow.index().clone(), extract_f64_array(deposition, "deposition")?)?;

    let cout = transport::compute_concentration(
        &deposition,
        &flow,
        &aquifer,
        &AdvectiveResidenceTime,
    )?;
    let (index, values) = cout.into_parts();
    Ok((index.into_pyarray(py), values.into_pyarray(py)))
}

/// _rust_gwtransport — PyO3 module initializer for the Python extension.
///
/// Registers `compute_deposition` and `compute_concentration`. Invoked by
/// Python when importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_gwtransport<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_compute_deposition, m)?)?;
    m.add_function(wrap_pyfunction!(py_compute_concentration, m)?)?;
    Ok(())
}
