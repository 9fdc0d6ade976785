//! Inconsistency coefficients.
//!
//! A link whose height stands out from the links just below it joins two
//! well-separated groups. For each row `i` of a linkage matrix, gather the
//! heights of the links up to `depth` levels below and including it, then
//! report
//!
//! | Column | Value |
//! |--------|-------|
//! | 0 | mean height |
//! | 1 | standard deviation (ddof 1; 0 for a single link) |
//! | 2 | number of links gathered |
//! | 3 | `(h_i − mean) / std`, 0 when std is 0 |

use super::validate::check_linkage;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};

/// Inconsistency matrix of a linkage matrix, one row per link.
///
/// ```rust
/// use hcluster::inconsistent;
/// use ndarray::array;
///
/// let z = array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 3.0, 3.0]];
/// let r = inconsistent(z.view(), 2).unwrap();
/// assert_eq!(r.row(0).to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
/// assert!((r[[1, 0]] - 2.0).abs() < 1e-12);
/// assert_eq!(r[[1, 2]], 2.0);
/// ```
pub fn inconsistent(z: ArrayView2<'_, f64>, depth: usize) -> Result<Array2<f64>> {
    if depth == 0 {
        return Err(Error::InvalidParameter {
            name: "depth",
            message: "must be at least 1",
        });
    }
    let n = check_linkage(z)?;
    let rows = z.nrows();
    let mut out = Array2::<f64>::zeros((rows, 4));
    let mut heights = Vec::new();
    let mut stack = Vec::new();

    for i in 0..rows {
        heights.clear();
        stack.push((n + i, 1usize));
        while let Some((id, level)) = stack.pop() {
            if id < n {
                continue;
            }
            let row = z.row(id - n);
            heights.push(row[2]);
            if level < depth {
                stack.push((row[0] as usize, level + 1));
                stack.push((row[1] as usize, level + 1));
            }
        }

        let k = heights.len() as f64;
        let mean = heights.iter().sum::<f64>() / k;
        let std = if heights.len() > 1 {
            let ss: f64 = heights.iter().map(|h| (h - mean) * (h - mean)).sum();
            (ss / (k - 1.0)).sqrt()
        } else {
            0.0
        };
        let coefficient = if std > 0.0 {
            (z[[i, 2]] - mean) / std
        } else {
            0.0
        };

        out[[i, 0]] = mean;
        out[[i, 1]] = std;
        out[[i, 2]] = k;
        out[[i, 3]] = coefficient;
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    fn four_leaves() -> Array2<f64> {
        // 6 ─┬─ 4 ─┬─ 0
        //    │     └─ 1
        //    └─ 5 ─┬─ 2
        //          └─ 3
        array![
            [0.0, 1.0, 1.0, 2.0],
            [2.0, 3.0, 2.0, 2.0],
            [4.0, 5.0, 6.0, 4.0]
        ]
    }

    #[test]
    fn singleton_links_are_flat() {
        let r = inconsistent(four_leaves().view(), 2).unwrap();
        assert_eq!(r.dim(), (3, 4));
        for i in 0..2 {
            assert_eq!(r[[i, 1]], 0.0);
            assert_eq!(r[[i, 2]], 1.0);
            assert_eq!(r[[i, 3]], 0.0);
        }
    }

    #[test]
    fn root_statistics() {
        let r = inconsistent(four_leaves().view(), 2).unwrap();
        // heights 6, 1, 2: mean 3, ss = 9 + 4 + 1 = 14, std = sqrt(7)
        assert!((r[[2, 0]] - 3.0).abs() < 1e-12);
        assert!((r[[2, 1]] - 7f64.sqrt()).abs() < 1e-12);
        assert_eq!(r[[2, 2]], 3.0);
        assert!((r[[2, 3]] - 3.0 / 7f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn depth_one_sees_only_the_link() {
        let r = inconsistent(four_leaves().view(), 1).unwrap();
        for i in 0..3 {
            assert_eq!(r[[i, 0]], four_leaves()[[i, 2]]);
            assert_eq!(r[[i, 2]], 1.0);
        }
    }

    #[test]
    fn errors() {
        let err = inconsistent(four_leaves().view(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainViolation);
        let err = inconsistent(array![[0.0, 1.0, 1.0, 5.0]].view(), 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CorruptStructure);
    }
}
