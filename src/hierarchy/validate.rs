//! Linkage matrix validation.
//!
//! A linkage matrix `Z` for `n` observations has `n − 1` rows of
//! `[left, right, distance, count]`. Each check below is a pure predicate
//! over the whole matrix; they run in this order and the first failure is
//! reported with its row:
//!
//! | # | Check | Defect |
//! |---|-------|--------|
//! | 1 | 4 columns, ≥ 1 row | shape |
//! | 2 | distances ≥ 0 (NaN fails) | [`Corruption::NegativeDistance`] |
//! | 3 | counts ≥ 0 | [`Corruption::NegativeCount`] |
//! | 4 | ids are integers in `[0, 2n − 2)` | [`Corruption::IdOutOfRange`] |
//! | 5 | no id used twice | [`Corruption::IdReused`] |
//! | 6 | row `i` only uses ids `< n + i` | [`Corruption::ForwardReference`] |
//! | 7 | count = sum of children's counts | [`Corruption::CountMismatch`] |
//!
//! Checks 5 and 6 together make `Z` a forest of binary merges; with
//! `2(n − 1)` references over `2n − 2` ids it is a single tree whose root
//! is `2n − 2`.

use crate::error::{Corruption, Error, Result};
use ndarray::ArrayView2;

/// Validate a linkage matrix and return the number of observations.
///
/// ```rust
/// use hcluster::hierarchy::check_linkage;
/// use hcluster::ErrorKind;
/// use ndarray::array;
///
/// assert_eq!(check_linkage(array![[0.0, 1.0, 1.0, 2.0]].view()).unwrap(), 2);
/// let bad = array![[0.0, 1.0, -1.0, 2.0]];
/// assert_eq!(check_linkage(bad.view()).unwrap_err().kind(), ErrorKind::CorruptStructure);
/// ```
pub fn check_linkage(z: ArrayView2<'_, f64>) -> Result<usize> {
    let n = check_shape(z, 4)?;
    check_distances(z)?;
    check_counts(z)?;
    check_ids(z, n)?;
    check_unique(z, n)?;
    check_order(z, n)?;
    check_count_consistency(z, n)?;
    Ok(n)
}

/// Whether `z` passes every check of [`check_linkage`].
pub fn is_valid_linkage(z: ArrayView2<'_, f64>) -> bool {
    check_linkage(z).is_ok()
}

/// Checks 2, 4, 5 and 6 on a matrix of `columns` columns; counts are not read.
pub(crate) fn check_structure(z: ArrayView2<'_, f64>, columns: usize) -> Result<usize> {
    let n = check_shape(z, columns)?;
    check_distances(z)?;
    check_ids(z, n)?;
    check_unique(z, n)?;
    check_order(z, n)?;
    Ok(n)
}

/// Cluster sizes for ids `0..2n − 1`, assuming the structure checks passed.
pub(crate) fn propagate_counts(z: ArrayView2<'_, f64>, n: usize) -> Vec<usize> {
    let mut counts = vec![1usize; n];
    counts.reserve(z.nrows());
    for row in z.rows() {
        let c = counts[row[0] as usize] + counts[row[1] as usize];
        counts.push(c);
    }
    counts
}

fn check_shape(z: ArrayView2<'_, f64>, columns: usize) -> Result<usize> {
    let (rows, cols) = z.dim();
    if cols != columns || rows == 0 {
        return Err(Error::ShapeMismatch {
            expected: format!("(n-1) x {columns} linkage matrix with at least one row"),
            actual: format!("{rows}x{cols}"),
        });
    }
    Ok(rows + 1)
}

fn check_distances(z: ArrayView2<'_, f64>) -> Result<()> {
    match z.column(2).iter().position(|d| !(*d >= 0.0)) {
        Some(row) => Err(Error::corrupt(
            row,
            Corruption::NegativeDistance { value: z[[row, 2]] },
        )),
        None => Ok(()),
    }
}

fn check_counts(z: ArrayView2<'_, f64>) -> Result<()> {
    match z.column(3).iter().position(|c| !(*c >= 0.0)) {
        Some(row) => Err(Error::corrupt(
            row,
            Corruption::NegativeCount { value: z[[row, 3]] },
        )),
        None => Ok(()),
    }
}

fn check_ids(z: ArrayView2<'_, f64>, n: usize) -> Result<()> {
    let limit = (2 * n - 2) as f64;
    for (i, row) in z.rows().into_iter().enumerate() {
        for &v in [row[0], row[1]].iter() {
            if !(v >= 0.0 && v < limit && v.fract() == 0.0) {
                return Err(Error::corrupt(i, Corruption::IdOutOfRange { value: v }));
            }
        }
    }
    Ok(())
}

fn check_unique(z: ArrayView2<'_, f64>, n: usize) -> Result<()> {
    let mut seen = vec![false; 2 * n - 2];
    for (i, row) in z.rows().into_iter().enumerate() {
        for id in [row[0] as usize, row[1] as usize] {
            if seen[id] {
                return Err(Error::corrupt(i, Corruption::IdReused { id }));
            }
            seen[id] = true;
        }
    }
    Ok(())
}

fn check_order(z: ArrayView2<'_, f64>, n: usize) -> Result<()> {
    for (i, row) in z.rows().into_iter().enumerate() {
        for id in [row[0] as usize, row[1] as usize] {
            if id >= n + i {
                return Err(Error::corrupt(i, Corruption::ForwardReference { id }));
            }
        }
    }
    Ok(())
}

fn check_count_consistency(z: ArrayView2<'_, f64>, n: usize) -> Result<()> {
    let counts = propagate_counts(z, n);
    for (i, row) in z.rows().into_iter().enumerate() {
        let expected = counts[n + i];
        if row[3] != expected as f64 {
            return Err(Error::corrupt(
                i,
                Corruption::CountMismatch {
                    expected,
                    found: row[3],
                },
            ));
        }
    }
    Ok(())
}
