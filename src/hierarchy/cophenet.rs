//! Cophenetic distances.
//!
//! The cophenetic distance between observations `p` and `q` is the height
//! at which they first share a cluster: the distance on the linkage row of
//! their lowest common ancestor.
//!
//! ```text
//!      *  (height=3)         c(a,d) = 3
//!     / \                    c(b,c) = 2
//!    *   d                   c(a,b) = 1
//!   / \                      c(a,c) = 2
//!  *   c
//! / \
//! a   b
//! ```
//!
//! For monotone linkages these distances form an ultrametric:
//! `c(x, z) <= max(c(x, y), c(y, z))`. Single linkage produces the
//! *subdominant* ultrametric, the largest ultrametric below the input.

use super::dendrogram::Dendrogram;
use crate::distance::{condensed_index, condensed_len};
use crate::error::{Error, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Condensed cophenetic distance vector of a linkage matrix.
///
/// ```rust
/// use hcluster::cophenet;
/// use ndarray::array;
///
/// let z = array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 2.0, 3.0]];
/// assert_eq!(cophenet(z.view()).unwrap(), array![1.0, 2.0, 2.0]);
/// ```
pub fn cophenet(z: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    let dendro = Dendrogram::from_linkage(z)?;
    Ok(cophenetic_vector(&dendro))
}

/// Cophenetic correlation between `y` and the tree `z`.
///
/// Returns Pearson's correlation between the original distances `y` and
/// the cophenetic distances, clamped to `[-1, 1]`, together with the
/// cophenetic vector.
pub fn cophenet_correlation(
    z: ArrayView2<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<(f64, Array1<f64>)> {
    let dendro = Dendrogram::from_linkage(z)?;
    let expected = condensed_len(dendro.n_items());
    if y.len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            found: y.len(),
        });
    }
    let c = cophenetic_vector(&dendro);
    let r = pearson(y, c.view())?;
    tracing::debug!(
        observations = dendro.n_items(),
        correlation = r,
        "cophenet.correlation"
    );
    Ok((r, c))
}

impl Dendrogram {
    /// Cophenetic distances of this merge history.
    pub fn cophenetic(&self) -> Array1<f64> {
        cophenetic_vector(self)
    }
}

fn cophenetic_vector(dendro: &Dendrogram) -> Array1<f64> {
    let n = dendro.n_items();
    let mut out = Array1::<f64>::zeros(condensed_len(n));
    let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    members.reserve(dendro.n_merges());

    for m in dendro.merges() {
        let left = std::mem::take(&mut members[m.cluster_a]);
        let right = std::mem::take(&mut members[m.cluster_b]);
        for &p in &left {
            for &q in &right {
                out[condensed_index(p.min(q), p.max(q), n)] = m.distance;
            }
        }
        // Keep the larger list and extend it with the smaller.
        let (mut big, small) = if left.len() >= right.len() {
            (left, right)
        } else {
            (right, left)
        };
        big.extend(small);
        members.push(big);
    }
    out
}

fn pearson(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Result<f64> {
    let len = a.len() as f64;
    let mean_a = a.sum() / len;
    let mean_b = b.sum() / len;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b.iter()) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return Err(Error::DegenerateCorrelation);
    }
    Ok((cov / (var_a * var_b).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results, clippy::needless_range_loop)]
mod tests {
    use super::*;
    use crate::cluster::{linkage, Method};
    use crate::distance::{to_matrix, Metric};
    use crate::error::ErrorKind;
    use ndarray::{array, Array2};
    use proptest::prelude::*;

    /// Largest ultrametric below `d`: minimax path distances.
    fn subdominant_ultrametric(d: &Array2<f64>) -> Array2<f64> {
        let n = d.nrows();
        let mut u = d.clone();
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let through_k = u[[i, k]].max(u[[k, j]]);
                    if through_k < u[[i, j]] {
                        u[[i, j]] = through_k;
                    }
                }
            }
        }
        u
    }

    fn is_ultrametric(d: &Array2<f64>, tolerance: f64) -> bool {
        let n = d.nrows();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    if d[[i, k]] > d[[i, j]].max(d[[j, k]]) + tolerance {
                        return false;
                    }
                }
            }
        }
        true
    }

    #[test]
    fn three_point_scenario() {
        let y = array![1.0, 2.0, 1.0];
        let z = linkage((&y).into(), Method::Single, &Metric::Euclidean).unwrap();
        assert_eq!(cophenet(z.view()).unwrap(), array![1.0, 1.0, 1.0]);
    }

    #[test]
    fn collinear_complete_linkage_correlation() {
        // Points at 0, 2, 5.
        let y = array![2.0, 5.0, 3.0];
        let z = linkage((&y).into(), Method::Complete, &Metric::Euclidean).unwrap();
        let (r, c) = cophenet_correlation(z.view(), y.view()).unwrap();
        assert_eq!(c, array![2.0, 5.0, 5.0]);
        assert!(r > 0.0 && r <= 1.0);
        // mean y = 10/3, mean c = 4; cov = 4, var_y = 14/3, var_c = 6
        let expect = 4.0 / ((14.0f64 / 3.0) * 6.0).sqrt();
        assert!((r - expect).abs() < 1e-10);
    }

    #[test]
    fn correlation_errors() {
        let z = array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 2.0, 3.0]];
        let err = cophenet_correlation(z.view(), array![1.0, 2.0].view()).unwrap_err();
        assert_eq!(
            err,
            Error::SizeMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);

        // Constant y has zero variance.
        let err = cophenet_correlation(z.view(), array![1.0, 1.0, 1.0].view()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainViolation);
    }

    #[test]
    fn invalid_linkage_rejected() {
        let z = array![[0.0, 0.0, 1.0, 2.0]];
        assert_eq!(cophenet(z.view()).unwrap_err().kind(), ErrorKind::CorruptStructure);
    }

    fn condensed_strategy() -> impl Strategy<Value = Array1<f64>> {
        (2usize..10).prop_flat_map(|n| {
            proptest::collection::vec(0.0f64..50.0, n * (n - 1) / 2).prop_map(Array1::from)
        })
    }

    proptest! {
        #[test]
        fn cophenetic_distances_are_ultrametric(y in condensed_strategy(), mi in 0usize..4) {
            let z = linkage((&y).into(), Method::ALL[mi], &Metric::Euclidean).unwrap();
            let c = cophenet(z.view()).unwrap();
            prop_assert_eq!(c.len(), y.len());
            prop_assert!(is_ultrametric(&to_matrix(c.view()).unwrap(), 1e-9));
        }

        #[test]
        fn single_linkage_is_subdominant(y in condensed_strategy()) {
            let z = linkage((&y).into(), Method::Single, &Metric::Euclidean).unwrap();
            let c = to_matrix(cophenet(z.view()).unwrap().view()).unwrap();
            let u = subdominant_ultrametric(&to_matrix(y.view()).unwrap());
            for (a, b) in c.iter().zip(u.iter()) {
                prop_assert!((a - b).abs() < 1e-10);
            }
        }

        #[test]
        fn correlation_in_range(y in condensed_strategy(), mi in 0usize..4) {
            let z = linkage((&y).into(), Method::ALL[mi], &Metric::Euclidean).unwrap();
            if let Ok((r, _)) = cophenet_correlation(z.view(), y.view()) {
                prop_assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}
