//! Condensed-vector indexing.
//!
//! A condensed vector stores the strict upper triangle of an m×m distance
//! matrix, row by row:
//!
//! ```text
//! [d(0,1), d(0,2), ..., d(0,m-1), d(1,2), ..., d(m-2,m-1)]
//! ```
//!
//! Every component in the crate uses [`condensed_index`] for this layout.

use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::Rng;

/// Number of unordered pairs among `m` observations.
#[inline]
pub fn condensed_len(m: usize) -> usize {
    m * m.saturating_sub(1) / 2
}

/// Position of pair `(i, j)`, `i < j < m`, in a condensed vector.
#[inline]
pub fn condensed_index(i: usize, j: usize, m: usize) -> usize {
    debug_assert!(i < j && j < m, "pair ({i}, {j}) invalid for m = {m}");
    i * m - i * (i + 1) / 2 + (j - i - 1)
}

/// Recover the number of observations from a condensed length.
///
/// Fails unless `len == d * (d - 1) / 2` for some integer `d >= 2`.
pub fn num_observations(len: usize) -> Result<usize> {
    let d = ((2.0 * len as f64).sqrt()).ceil() as usize;
    if d >= 2 && condensed_len(d) == len {
        Ok(d)
    } else {
        Err(Error::InvalidCondensedLength { len })
    }
}

/// True when `y` is a usable condensed distance vector: binomial length and
/// finite, non-negative entries.
pub fn is_valid_condensed(y: ArrayView1<'_, f64>) -> bool {
    num_observations(y.len()).is_ok() && y.iter().all(|d| d.is_finite() && *d >= 0.0)
}

/// True when `d` is a square, symmetric distance matrix with a zero diagonal,
/// all within `tol`.
pub fn is_valid_square(d: ArrayView2<'_, f64>, tol: f64) -> bool {
    let (rows, cols) = d.dim();
    if rows != cols || rows < 2 {
        return false;
    }
    for i in 0..rows {
        if d[[i, i]].abs() > tol {
            return false;
        }
        for j in (i + 1)..cols {
            let (a, b) = (d[[i, j]], d[[j, i]]);
            if !a.is_finite() || a < 0.0 || (a - b).abs() > tol {
                return false;
            }
        }
    }
    true
}

/// Random condensed distance vector for `n_points` observations, entries
/// drawn uniformly from `[0, 1)`.
pub fn random_condensed<R: Rng + ?Sized>(n_points: usize, rng: &mut R) -> Result<Array1<f64>> {
    if n_points < 2 {
        return Err(Error::TooFewObservations {
            required: 2,
            found: n_points,
        });
    }
    Ok((0..condensed_len(n_points))
        .map(|_| rng.random::<f64>())
        .collect())
}
