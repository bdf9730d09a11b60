//! Python-boundary helpers: array extraction, objective selection and
//! option assembly for the `_rust_gwtransport` extension.
#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, ToPyArray};

#[cfg(feature = "python-bindings")]
use crate::{
    optimization::minimizer::{LineSearcher, OptimizerOptions, Tolerances},
    transport::{
        core::{
            AquiferParams, DEFAULT_FLOW_FLOOR_FRACTION, DepositionOptions, NullspaceTolerance,
            TimeSeries,
        },
        objective::NullspaceObjective,
    },
};

/// Copy a 1-D numpy array, pandas Series or float sequence into an owned
/// `Array1<f64>`.
///
/// # Errors
/// - `TypeError` naming `what` if the object is none of the accepted kinds.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_array<'py>(raw: &Bound<'py, PyAny>, what: &str) -> PyResult<Array1<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    if let Ok(values) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(arr) = values.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_owned());
        }
    }
    let vec: Vec<f64> = raw.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(format!(
            "{what}: expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64"
        ))
    })?;
    Ok(Array1::from(vec))
}

/// Flow series and aquifer parameters from raw Python arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_flow_and_aquifer<'py>(
    flow: &Bound<'py, PyAny>, index: &Bound<'py, PyAny>, pore_volume: f64, porosity: f64,
    thickness: f64, retardation_factor: f64,
) -> PyResult<(TimeSeries, AquiferParams)> {
    let flow = TimeSeries::new(extract_f64_array(index, "index")?, extract_f64_array(flow, "flow")?)?;
    let aquifer = AquiferParams::new(pore_volume, porosity, thickness, retardation_factor)?;
    Ok((flow, aquifer))
}

/// Objective from a name (`"squared_lengths"`, `"summed_lengths"`) or a
/// Python callable `f(w, x_ls, N) -> float`. `None` selects squared lengths.
///
/// A callable that raises or returns a non-float yields NaN, which the
/// optimizer rejects as a non-finite cost.
#[cfg(feature = "python-bindings")]
pub fn extract_objective(raw: Option<&Bound<'_, PyAny>>) -> PyResult<NullspaceObjective> {
    let Some(raw) = raw else {
        return Ok(NullspaceObjective::SquaredLengths);
    };
    if let Ok(name) = raw.extract::<String>() {
        return Ok(name.parse::<NullspaceObjective>()?);
    }
    if !raw.is_callable() {
        return Err(pyo3::exceptions::PyTypeError::new_err(
            "nullspace_objective must be 'squared_lengths', 'summed_lengths' or a callable",
        ));
    }
    let callable: Py<PyAny> = raw.clone().unbind();
    Ok(NullspaceObjective::custom(move |w, x_ls, basis| {
        Python::with_gil(|py| {
            callable
                .call1(py, (w.to_pyarray(py), x_ls.to_pyarray(py), basis.to_pyarray(py)))
                .and_then(|value| value.extract::<f64>(py))
                .unwrap_or_else(|err| {
                    log::warn!("custom nullspace objective failed: {err}");
                    f64::NAN
                })
        })
    }))
}

/// Inversion options from the keyword arguments of `compute_deposition`.
#[cfg(feature = "python-bindings")]
pub fn extract_deposition_options(
    tol_grad: f64, tol_cost: f64, max_iter: usize, line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>, verbose: bool,
) -> PyResult<DepositionOptions> {
    let tols = Tolerances::new(Some(tol_grad), Some(tol_cost), Some(max_iter))?;
    let ls = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::MoreThuente,
    };
    let optimizer = OptimizerOptions::new(tols, ls, verbose, lbfgs_mem)?;
    Ok(DepositionOptions::new(
        optimizer,
        NullspaceTolerance::default(),
        DEFAULT_FLOW_FLOOR_FRACTION,
    )?)
}
