//! Python bindings for the fingermatch identification library.
//!
//! Minutiae cross the boundary as `N x 2` int32 numpy arrays of `(x, y)`
//! pixel coordinates, one array per minutia type.

use numpy::{PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use fingermatch::{
    Candidate as RustCandidate, FingerMatchError, IdentifyConfig as RustIdentifyConfig,
    Identifier as RustIdentifier, MinutiaeSet, Point, TemplateDatabase,
};

/// Convert a FingerMatchError to a Python exception.
fn to_py_err(err: FingerMatchError) -> PyErr {
    match err {
        FingerMatchError::InvalidConfig { .. } => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn points_from_array(points: &PyReadonlyArray2<'_, i32>, name: &str) -> PyResult<Vec<Point>> {
    let shape = points.shape();
    if shape[1] != 2 && shape[0] != 0 {
        return Err(PyValueError::new_err(format!(
            "{name} must have shape (N, 2), got ({}, {})",
            shape[0], shape[1]
        )));
    }
    let data = points.as_slice()?;
    Ok(data
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect())
}

fn minutiae_from_arrays(
    terminations: PyReadonlyArray2<'_, i32>,
    bifurcations: PyReadonlyArray2<'_, i32>,
) -> PyResult<MinutiaeSet> {
    Ok(MinutiaeSet::new(
        points_from_array(&terminations, "terminations")?,
        points_from_array(&bifurcations, "bifurcations")?,
    ))
}

/// A scored database label.
#[pyclass]
#[derive(Clone)]
pub struct Candidate {
    /// Enrolled identity label.
    #[pyo3(get)]
    pub label: String,
    /// Normalized similarity in [0, 1].
    #[pyo3(get)]
    pub score: f64,
    /// Common points across both minutia types.
    #[pyo3(get)]
    pub common_points: usize,
}

#[pymethods]
impl Candidate {
    fn __repr__(&self) -> String {
        format!(
            "Candidate(label='{}', score={:.4}, common_points={})",
            self.label, self.score, self.common_points
        )
    }
}

impl From<RustCandidate> for Candidate {
    fn from(c: RustCandidate) -> Self {
        Self {
            label: c.label,
            score: c.score,
            common_points: c.common_points,
        }
    }
}

/// Configuration for identification.
#[pyclass]
#[derive(Clone)]
pub struct IdentifyConfig {
    inner: RustIdentifyConfig,
}

#[pymethods]
impl IdentifyConfig {
    /// Create a new IdentifyConfig.
    ///
    /// Args:
    ///     k: Neighbours per tuple profile (default: 3)
    ///     th_range: Distance-ratio tolerance (default: 0.1)
    ///     th_angle: Angle tolerance in degrees (default: 2.0)
    ///     acceptance_floor: Minimum accepted score (default: None)
    ///     parallel: Enable parallel scoring (default: False)
    #[new]
    #[pyo3(signature = (k=3, th_range=0.1, th_angle=2.0, acceptance_floor=None, parallel=false))]
    fn new(
        k: usize,
        th_range: f64,
        th_angle: f64,
        acceptance_floor: Option<f64>,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustIdentifyConfig {
            k,
            th_range,
            th_angle,
            acceptance_floor,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!(
            "IdentifyConfig(k={}, th_range={}, th_angle={}, acceptance_floor={:?}, parallel={})",
            self.inner.k,
            self.inner.th_range,
            self.inner.th_angle,
            self.inner.acceptance_floor,
            self.inner.parallel
        )
    }
}

/// Fingerprint identifier over an in-memory template database.
#[pyclass]
pub struct Identifier {
    inner: RustIdentifier,
}

#[pymethods]
impl Identifier {
    /// Create an identifier over an empty database.
    ///
    /// Args:
    ///     config: IdentifyConfig (default: IdentifyConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<IdentifyConfig>) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = RustIdentifier::new(TemplateDatabase::new())
            .with_config(cfg)
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Load a template database from a JSON file.
    ///
    /// Args:
    ///     path: Path to the database JSON
    ///     config: IdentifyConfig (default: IdentifyConfig())
    #[staticmethod]
    #[pyo3(signature = (path, config = None))]
    fn from_file(path: &str, config: Option<IdentifyConfig>) -> PyResult<Self> {
        let database = TemplateDatabase::load_json(path).map_err(to_py_err)?;
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        let inner = RustIdentifier::new(database)
            .with_config(cfg)
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Write the database to a JSON file.
    fn save(&self, path: &str) -> PyResult<()> {
        self.inner.database().save_json(path).map_err(to_py_err)
    }

    /// Enroll minutiae under a label, replacing any earlier template.
    ///
    /// Args:
    ///     label: Identity label
    ///     terminations: (N, 2) int32 array
    ///     bifurcations: (M, 2) int32 array
    ///
    /// Returns:
    ///     True if an existing template was replaced
    fn enroll(
        &mut self,
        label: &str,
        terminations: PyReadonlyArray2<'_, i32>,
        bifurcations: PyReadonlyArray2<'_, i32>,
    ) -> PyResult<bool> {
        let minutiae = minutiae_from_arrays(terminations, bifurcations)?;
        let cfg = self.inner.config().clone();
        let current = std::mem::replace(
            &mut self.inner,
            RustIdentifier::new(TemplateDatabase::new()),
        );
        let mut database = current.into_database();
        let replaced = database.enroll(label, &minutiae, cfg.k).is_some();
        self.inner = RustIdentifier::new(database)
            .with_config(cfg)
            .map_err(to_py_err)?;
        Ok(replaced)
    }

    /// Identify minutiae against the database.
    ///
    /// Returns:
    ///     The best accepted Candidate, or None
    fn identify(
        &self,
        py: Python<'_>,
        terminations: PyReadonlyArray2<'_, i32>,
        bifurcations: PyReadonlyArray2<'_, i32>,
    ) -> PyResult<Option<Candidate>> {
        let minutiae = minutiae_from_arrays(terminations, bifurcations)?;
        let found = py.detach(|| self.inner.identify(&minutiae));
        Ok(found.map(Candidate::from))
    }

    /// Score every enrolled label, best first.
    fn rank(
        &self,
        py: Python<'_>,
        terminations: PyReadonlyArray2<'_, i32>,
        bifurcations: PyReadonlyArray2<'_, i32>,
    ) -> PyResult<Vec<Candidate>> {
        let minutiae = minutiae_from_arrays(terminations, bifurcations)?;
        let ranked = py.detach(|| self.inner.rank(&minutiae));
        Ok(ranked.into_iter().map(Candidate::from).collect())
    }

    /// Enrolled labels in enrollment order.
    #[getter]
    fn labels(&self) -> Vec<String> {
        self.inner.database().labels().map(str::to_owned).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.database().len()
    }

    fn __repr__(&self) -> String {
        format!("Identifier(templates={})", self.inner.database().len())
    }
}

/// Python module for fingermatch identification.
#[pymodule]
fn _fingermatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Candidate>()?;
    m.add_class::<IdentifyConfig>()?;
    m.add_class::<Identifier>()?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
