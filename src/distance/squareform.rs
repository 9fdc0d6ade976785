//! Condensed vector ↔ square matrix conversion.

use super::condensed::{condensed_index, condensed_len, num_observations};
use crate::error::{Error, Result};
use core::str::FromStr;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// A distance matrix in either representation.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceForm {
    /// Condensed upper triangle.
    Vector(Array1<f64>),
    /// Full symmetric matrix with a zero diagonal.
    Matrix(Array2<f64>),
}

impl DistanceForm {
    /// Array rank: 1 for vectors, 2 for matrices.
    pub fn ndim(&self) -> usize {
        match self {
            DistanceForm::Vector(_) => 1,
            DistanceForm::Matrix(_) => 2,
        }
    }

    /// The condensed vector, if this is one.
    pub fn into_vector(self) -> Option<Array1<f64>> {
        match self {
            DistanceForm::Vector(v) => Some(v),
            DistanceForm::Matrix(_) => None,
        }
    }

    /// The square matrix, if this is one.
    pub fn into_matrix(self) -> Option<Array2<f64>> {
        match self {
            DistanceForm::Matrix(m) => Some(m),
            DistanceForm::Vector(_) => None,
        }
    }
}

impl From<Array1<f64>> for DistanceForm {
    fn from(v: Array1<f64>) -> Self {
        DistanceForm::Vector(v)
    }
}

impl From<Array2<f64>> for DistanceForm {
    fn from(m: Array2<f64>) -> Self {
        DistanceForm::Matrix(m)
    }
}

/// Conversion direction for [`squareform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Force {
    /// Pick the direction from the input rank.
    #[default]
    Auto,
    /// Input must be a matrix; produce a vector.
    ToVector,
    /// Input must be a vector; produce a matrix.
    ToMatrix,
}

impl FromStr for Force {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "no" | "auto" => Ok(Force::Auto),
            "tovector" => Ok(Force::ToVector),
            "tomatrix" => Ok(Force::ToMatrix),
            _ => Err(Error::InvalidParameter {
                name: "force",
                message: "expected 'no', 'tovector' or 'tomatrix'",
            }),
        }
    }
}

/// Convert between condensed and square form.
///
/// With `checks` disabled, matrix input is not tested for symmetry or a zero
/// diagonal; only its upper triangle is read.
///
/// ```rust
/// use hcluster::distance::{squareform, DistanceForm, Force};
/// use ndarray::array;
///
/// let v = DistanceForm::from(array![2.0, 3.0, 5.0]);
/// let m = squareform(&v, Force::Auto, true).unwrap();
/// assert_eq!(m, DistanceForm::from(array![[0.0, 2.0, 3.0], [2.0, 0.0, 5.0], [3.0, 5.0, 0.0]]));
/// assert_eq!(squareform(&m, Force::Auto, true).unwrap(), v);
/// ```
pub fn squareform(x: &DistanceForm, force: Force, checks: bool) -> Result<DistanceForm> {
    match (x, force) {
        (DistanceForm::Vector(v), Force::Auto | Force::ToMatrix) => {
            to_matrix(v.view()).map(DistanceForm::Matrix)
        }
        (DistanceForm::Matrix(m), Force::Auto | Force::ToVector) => {
            to_vector(m.view(), checks).map(DistanceForm::Vector)
        }
        (DistanceForm::Vector(_), Force::ToVector) => Err(Error::TypeMismatch {
            expected: "a square matrix when forcing 'tovector'",
            found: "a 1-D vector".to_string(),
        }),
        (DistanceForm::Matrix(_), Force::ToMatrix) => Err(Error::TypeMismatch {
            expected: "a condensed vector when forcing 'tomatrix'",
            found: "a 2-D matrix".to_string(),
        }),
    }
}

/// Expand a condensed vector into a symmetric zero-diagonal matrix.
pub fn to_matrix(v: ArrayView1<'_, f64>) -> Result<Array2<f64>> {
    let d = num_observations(v.len())?;
    let mut out = Array2::<f64>::zeros((d, d));
    let mut k = 0;
    for i in 0..d - 1 {
        for j in (i + 1)..d {
            out[[i, j]] = v[k];
            out[[j, i]] = v[k];
            k += 1;
        }
    }
    Ok(out)
}

/// Extract the upper triangle of a square distance matrix.
pub fn to_vector(m: ArrayView2<'_, f64>, checks: bool) -> Result<Array1<f64>> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::ShapeMismatch {
            expected: "square matrix".to_string(),
            actual: format!("{rows}x{cols}"),
        });
    }
    if rows < 2 {
        return Err(Error::TooFewObservations {
            required: 2,
            found: rows,
        });
    }
    if checks {
        check_symmetric(m)?;
        check_zero_diagonal(m)?;
    }
    let d = rows;
    let mut out = Array1::<f64>::zeros(condensed_len(d));
    for i in 0..d - 1 {
        for j in (i + 1)..d {
            out[condensed_index(i, j, d)] = m[[i, j]];
        }
    }
    Ok(out)
}

fn check_symmetric(m: ArrayView2<'_, f64>) -> Result<()> {
    let d = m.nrows();
    for i in 0..d {
        for j in (i + 1)..d {
            if m[[i, j]] != m[[j, i]] {
                return Err(Error::ShapeMismatch {
                    expected: "symmetric matrix".to_string(),
                    actual: format!("entry ({i}, {j}) differs from ({j}, {i})"),
                });
            }
        }
    }
    Ok(())
}

fn check_zero_diagonal(m: ArrayView2<'_, f64>) -> Result<()> {
    match m.diag().iter().position(|v| *v != 0.0) {
        Some(i) => Err(Error::ShapeMismatch {
            expected: "zero diagonal".to_string(),
            actual: format!("entry ({i}, {i}) is {}", m[[i, i]]),
        }),
        None => Ok(()),
    }
}
