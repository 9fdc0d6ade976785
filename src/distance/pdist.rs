//! Pairwise distances over an observation matrix.

use super::condensed::condensed_len;
use super::metric::{self, DistanceFn, Metric};
use super::squareform::to_vector;
use crate::error::{Error, Result};
use faer::prelude::*;
use faer::Mat;
use ndarray::{Array1, Array2, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// ∞-norm condition number above which the covariance counts as singular.
const MAX_CONDITION: f64 = 1e12;

/// Condensed pairwise distances between the rows of `x`.
///
/// The result has `m * (m - 1) / 2` entries, pair `(i, j)` at
/// [`condensed_index(i, j, m)`](super::condensed_index).
///
/// Metric preconditions are checked before any distance is computed:
/// zero-variance columns (seuclidean), zero-norm rows (cosine, correlation)
/// and singular covariance (mahalanobis) are errors.
///
/// # Example
///
/// ```rust
/// use hcluster::distance::{pdist, Metric};
/// use ndarray::array;
///
/// let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
/// let y = pdist(x.view(), &Metric::Euclidean).unwrap();
/// assert_eq!(y.len(), 3);
/// assert!((y[2] - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn pdist(x: ArrayView2<'_, f64>, metric: &Metric) -> Result<Array1<f64>> {
    let (m, n) = check_observations(x.nrows(), x.ncols())?;
    tracing::debug!(
        observations = m,
        dimensions = n,
        metric = metric.name(),
        "pdist.start"
    );

    // Matrix form: one Gram product, then the upper triangle.
    let out = if let Metric::Cosine = metric {
        cosine_matrix(x)?
    } else {
        let data: Vec<f64> = x.iter().copied().collect();
        Kernel::prepare(metric, data, m, n)?.evaluate()
    };
    tracing::debug!(pairs = out.len(), "pdist.done");
    Ok(out)
}

/// Condensed pairwise distances between boolean rows.
///
/// Only [`Metric::Hamming`] and [`Metric::Jaccard`] have a boolean path.
pub fn pdist_bool(x: ArrayView2<'_, bool>, metric: &Metric) -> Result<Array1<f64>> {
    if !metric.supports_bool() {
        return Err(Error::TypeMismatch {
            expected: "hamming or jaccard for boolean observations",
            found: metric.name().to_string(),
        });
    }
    let (m, n) = check_observations(x.nrows(), x.ncols())?;
    let data: Vec<bool> = x.iter().copied().collect();
    let row = |i: usize| &data[i * n..(i + 1) * n];
    let kernel: fn(&[bool], &[bool]) -> f64 = match metric {
        Metric::Jaccard => metric::jaccard_bool,
        _ => metric::hamming_bool,
    };

    let mut out = Vec::with_capacity(condensed_len(m));
    for i in 0..m - 1 {
        for j in (i + 1)..m {
            out.push(kernel(row(i), row(j)));
        }
    }
    Ok(Array1::from(out))
}

fn check_observations(m: usize, n: usize) -> Result<(usize, usize)> {
    if m < 2 {
        return Err(Error::TooFewObservations {
            required: 2,
            found: m,
        });
    }
    if n == 0 {
        return Err(Error::ShapeMismatch {
            expected: "at least one column".to_string(),
            actual: format!("{m}x0"),
        });
    }
    Ok((m, n))
}

/// Per-metric state computed once over all rows.
enum KernelKind {
    Euclidean,
    Cityblock,
    Chebyshev,
    Minkowski(f64),
    SEuclidean(Vec<f64>),
    Hamming,
    Jaccard,
    /// Rows are already centred for correlation; holds the row norms.
    Cosine(Vec<f64>),
    /// Row-major inverse covariance.
    Mahalanobis(Vec<f64>),
    Custom(DistanceFn),
}

struct Kernel {
    data: Vec<f64>,
    m: usize,
    dim: usize,
    kind: KernelKind,
}

impl Kernel {
    fn prepare(metric: &Metric, mut data: Vec<f64>, m: usize, dim: usize) -> Result<Self> {
        let kind = match metric {
            Metric::Euclidean => KernelKind::Euclidean,
            Metric::Cityblock => KernelKind::Cityblock,
            Metric::Chebyshev => KernelKind::Chebyshev,
            Metric::Minkowski { p } => {
                if !(p.is_finite() && *p > 0.0) {
                    return Err(Error::InvalidParameter {
                        name: "p",
                        message: "minkowski order must be finite and > 0",
                    });
                }
                KernelKind::Minkowski(*p)
            }
            Metric::SEuclidean => {
                let var = column_variances(&data, m, dim);
                if let Some(dimension) = var.iter().position(|v| *v <= 0.0) {
                    return Err(Error::ZeroVariance { dimension });
                }
                KernelKind::SEuclidean(var)
            }
            Metric::Hamming => KernelKind::Hamming,
            Metric::Jaccard => KernelKind::Jaccard,
            Metric::Cosine => KernelKind::Cosine(row_norms(&data, m, dim)?),
            Metric::Correlation => {
                for row in data.chunks_exact_mut(dim) {
                    let mean = row.iter().sum::<f64>() / dim as f64;
                    row.iter_mut().for_each(|v| *v -= mean);
                }
                KernelKind::Cosine(row_norms(&data, m, dim)?)
            }
            Metric::Mahalanobis => KernelKind::Mahalanobis(inverse_covariance(&data, m, dim)?),
            Metric::Custom(f) => KernelKind::Custom(f.clone()),
        };
        Ok(Self { data, m, dim, kind })
    }

    #[inline]
    fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    fn distance(&self, i: usize, j: usize) -> f64 {
        let (u, v) = (self.row(i), self.row(j));
        match &self.kind {
            KernelKind::Euclidean => metric::euclidean(u, v),
            KernelKind::Cityblock => metric::cityblock(u, v),
            KernelKind::Chebyshev => metric::chebyshev(u, v),
            KernelKind::Minkowski(p) => metric::minkowski(u, v, *p),
            KernelKind::SEuclidean(var) => metric::seuclidean(u, v, var),
            KernelKind::Hamming => metric::hamming(u, v),
            KernelKind::Jaccard => metric::jaccard(u, v),
            KernelKind::Cosine(norms) => metric::cosine(u, v, norms[i], norms[j]),
            KernelKind::Mahalanobis(vi) => metric::mahalanobis(u, v, vi),
            KernelKind::Custom(f) => f(u, v),
        }
    }

    #[cfg(feature = "parallel")]
    fn evaluate(&self) -> Array1<f64> {
        let m = self.m;
        // Ordered collect: each pair lands in its canonical slot.
        let out: Vec<f64> = (0..m - 1)
            .into_par_iter()
            .flat_map_iter(|i| ((i + 1)..m).map(move |j| self.distance(i, j)))
            .collect();
        Array1::from(out)
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate(&self) -> Array1<f64> {
        let m = self.m;
        let mut out = Vec::with_capacity(condensed_len(m));
        for i in 0..m - 1 {
            for j in (i + 1)..m {
                out.push(self.distance(i, j));
            }
        }
        Array1::from(out)
    }
}

/// Sample variance (ddof = 1) of each column.
fn column_variances(data: &[f64], m: usize, dim: usize) -> Vec<f64> {
    let means = column_means(data, m, dim);
    let mut var = vec![0.0; dim];
    for row in data.chunks_exact(dim) {
        for ((acc, x), mu) in var.iter_mut().zip(row).zip(&means) {
            let d = x - mu;
            *acc += d * d;
        }
    }
    var.iter_mut().for_each(|v| *v /= (m - 1) as f64);
    var
}

fn column_means(data: &[f64], m: usize, dim: usize) -> Vec<f64> {
    let mut means = vec![0.0; dim];
    for row in data.chunks_exact(dim) {
        for (acc, x) in means.iter_mut().zip(row) {
            *acc += x;
        }
    }
    means.iter_mut().for_each(|v| *v /= m as f64);
    means
}

fn row_norms(data: &[f64], m: usize, dim: usize) -> Result<Vec<f64>> {
    let norms: Vec<f64> = data
        .chunks_exact(dim)
        .map(|row| metric::dot(row, row).sqrt())
        .collect();
    debug_assert_eq!(norms.len(), m);
    match norms.iter().position(|n| *n == 0.0) {
        Some(row) => Err(Error::ZeroNorm { row }),
        None => Ok(norms),
    }
}

/// Inverse of the sample covariance of the columns, row-major.
fn inverse_covariance(data: &[f64], m: usize, dim: usize) -> Result<Vec<f64>> {
    // Rank of the sample covariance is at most m - 1.
    if m <= dim {
        return Err(Error::SingularCovariance);
    }
    let means = column_means(data, m, dim);
    let mut cov = Mat::<f64>::zeros(dim, dim);
    for row in data.chunks_exact(dim) {
        for a in 0..dim {
            let da = row[a] - means[a];
            for b in a..dim {
                cov[(a, b)] += da * (row[b] - means[b]);
            }
        }
    }
    let scale = (m - 1) as f64;
    for a in 0..dim {
        for b in a..dim {
            let v = cov[(a, b)] / scale;
            cov[(a, b)] = v;
            cov[(b, a)] = v;
        }
    }

    let identity = Mat::<f64>::identity(dim, dim);
    let inv = cov.full_piv_lu().solve(&identity);

    let kappa = inf_norm(&cov) * inf_norm(&inv);
    if !(kappa < MAX_CONDITION) {
        return Err(Error::SingularCovariance);
    }

    let mut out = Vec::with_capacity(dim * dim);
    for i in 0..dim {
        for j in 0..dim {
            out.push(inv[(i, j)]);
        }
    }
    Ok(out)
}

/// Maximum absolute row sum.
fn inf_norm(a: &Mat<f64>) -> f64 {
    (0..a.nrows())
        .map(|i| (0..a.ncols()).map(|j| a[(i, j)].abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Cosine distances via the Gram matrix, condensed through squareform.
fn cosine_matrix(x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
    let m = x.nrows();
    let norms: Vec<f64> = x.outer_iter().map(|r| r.dot(&r).sqrt()).collect();
    if let Some(row) = norms.iter().position(|n| *n == 0.0) {
        return Err(Error::ZeroNorm { row });
    }
    let gram = x.dot(&x.t());
    let mut dm = Array2::<f64>::zeros((m, m));
    for i in 0..m {
        for j in (i + 1)..m {
            let d = (1.0 - gram[[i, j]] / (norms[i] * norms[j])).max(0.0);
            dm[[i, j]] = d;
            dm[[j, i]] = d;
        }
    }
    to_vector(dm.view(), false)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::distance::condensed_index;
    use ndarray::array;
    use proptest::prelude::*;

    fn assert_close(a: &Array1<f64>, b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-10, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn three_point_euclidean() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let y = pdist(x.view(), &Metric::Euclidean).unwrap();
        assert_close(&y, &[1.0, 1.0, 2f64.sqrt()]);
    }

    #[test]
    fn every_metric_agrees_with_its_custom_form() {
        let x = array![
            [1.0, 2.0, 0.0],
            [0.5, -1.0, 3.0],
            [2.0, 2.0, 1.0],
            [0.0, 1.0, 4.0],
        ];
        let cases: Vec<(Metric, fn(&[f64], &[f64]) -> f64)> = vec![
            (Metric::Euclidean, metric::euclidean),
            (Metric::Cityblock, metric::cityblock),
            (Metric::Chebyshev, metric::chebyshev),
            (Metric::Hamming, metric::hamming),
            (Metric::Jaccard, metric::jaccard),
        ];
        for (metric, f) in cases {
            let named = pdist(x.view(), &metric).unwrap();
            let custom = pdist(x.view(), &Metric::custom(f)).unwrap();
            assert_close(&named, custom.as_slice().unwrap());
        }
    }

    #[test]
    fn minkowski_orders() {
        let x = array![[0.0, 0.0], [3.0, 4.0]];
        let p1 = pdist(x.view(), &Metric::minkowski(1.0)).unwrap();
        let p3 = pdist(x.view(), &Metric::minkowski(3.0)).unwrap();
        assert_close(&p1, &[7.0]);
        assert_close(&p3, &[(27.0f64 + 64.0).powf(1.0 / 3.0)]);
        assert!(pdist(x.view(), &Metric::minkowski(0.0)).is_err());
        assert!(pdist(x.view(), &Metric::minkowski(f64::NAN)).is_err());
    }

    #[test]
    fn seuclidean_scales_by_sample_variance() {
        // column variances (ddof 1): [1.0, 4.0]
        let x = array![[0.0, 0.0], [1.0, 2.0], [2.0, 4.0]];
        let y = pdist(x.view(), &Metric::SEuclidean).unwrap();
        let d01 = (1.0f64 / 1.0 + 4.0 / 4.0).sqrt();
        let d02 = (4.0f64 / 1.0 + 16.0 / 4.0).sqrt();
        assert_close(&y, &[d01, d02, d01]);
    }

    #[test]
    fn seuclidean_rejects_constant_column() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]];
        let err = pdist(x.view(), &Metric::SEuclidean).unwrap_err();
        assert_eq!(err, Error::ZeroVariance { dimension: 1 });
    }

    #[test]
    fn cosine_and_correlation() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let y = pdist(x.view(), &Metric::Cosine).unwrap();
        let half = 1.0 - 1.0 / 2f64.sqrt();
        assert_close(&y, &[1.0, half, half]);

        // Row-wise affine maps do not change correlation distance.
        let a = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.5], [3.0, 1.0, 2.0]];
        let b = array![[11.0, 12.0, 13.0], [4.0, 8.0, 13.0], [3.0, 1.0, 2.0]];
        let ya = pdist(a.view(), &Metric::Correlation).unwrap();
        let yb = pdist(b.view(), &Metric::Correlation).unwrap();
        assert_close(&ya, yb.as_slice().unwrap());
    }

    #[test]
    fn cosine_rejects_zero_row() {
        let x = array![[1.0, 0.0], [0.0, 0.0]];
        assert_eq!(
            pdist(x.view(), &Metric::Cosine).unwrap_err(),
            Error::ZeroNorm { row: 1 }
        );
        let c = array![[1.0, 2.0], [3.0, 3.0]];
        assert_eq!(
            pdist(c.view(), &Metric::Correlation).unwrap_err(),
            Error::ZeroNorm { row: 1 }
        );
    }

    #[test]
    fn mahalanobis_matches_whitened_euclidean() {
        // Uncorrelated columns: Mahalanobis reduces to seuclidean.
        let x = array![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0], [2.0, 2.0], [1.0, 1.0]];
        let maha = pdist(x.view(), &Metric::Mahalanobis).unwrap();
        let se = pdist(x.view(), &Metric::SEuclidean).unwrap();
        assert_close(&maha, se.as_slice().unwrap());
    }

    #[test]
    fn mahalanobis_rejects_singular_covariance() {
        // Second column is twice the first.
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [5.0, 10.0]];
        assert_eq!(
            pdist(x.view(), &Metric::Mahalanobis).unwrap_err(),
            Error::SingularCovariance
        );
        // Fewer rows than dimensions.
        let y = array![[1.0, 2.0, 3.0], [2.0, 1.0, 0.0]];
        assert_eq!(
            pdist(y.view(), &Metric::Mahalanobis).unwrap_err(),
            Error::SingularCovariance
        );
    }

    #[test]
    fn custom_metric_called_once_per_pair() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let metric = Metric::custom(move |u, v| {
            counter.fetch_add(1, Ordering::Relaxed);
            u[0] * 10.0 + v[0]
        });
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = pdist(x.view(), &metric).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 6);
        // Raw output, canonical order.
        assert_close(&y, &[1.0, 2.0, 3.0, 12.0, 13.0, 23.0]);
    }

    #[test]
    fn boolean_path() {
        let x = array![[true, false, true], [true, true, false], [false, false, false]];
        let h = pdist_bool(x.view(), &Metric::Hamming).unwrap();
        assert_close(&h, &[2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0]);
        let j = pdist_bool(x.view(), &Metric::Jaccard).unwrap();
        assert_close(&j, &[2.0 / 3.0, 1.0, 1.0]);
        let err = pdist_bool(x.view(), &Metric::Euclidean).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::TypeMismatch);
    }

    #[test]
    fn shape_preconditions() {
        let one = array![[1.0, 2.0]];
        assert_eq!(
            pdist(one.view(), &Metric::Euclidean).unwrap_err(),
            Error::TooFewObservations {
                required: 2,
                found: 1
            }
        );
        let empty_cols = Array2::<f64>::zeros((3, 0));
        assert!(pdist(empty_cols.view(), &Metric::Euclidean).is_err());
    }

    #[test]
    fn non_standard_layout_input() {
        let x = array![[0.0, 3.0, 3.0], [0.0, 0.0, 4.0]];
        // Columns of x as observations.
        let t = x.t();
        let y = pdist(t, &Metric::Euclidean).unwrap();
        assert_close(&y, &[3.0, 5.0, 4.0]);
    }

    proptest! {
        #[test]
        fn length_is_m_choose_2(m in 2usize..20, n in 1usize..5, seed in 0u64..1000) {
            let x = Array2::from_shape_fn((m, n), |(i, j)| ((i * 31 + j * 17) as u64 ^ seed) as f64 * 0.01);
            let y = pdist(x.view(), &Metric::Cityblock).unwrap();
            prop_assert_eq!(y.len(), m * (m - 1) / 2);
            for i in 0..m - 1 {
                for j in (i + 1)..m {
                    let expect = metric::cityblock(
                        x.row(i).as_slice().unwrap(),
                        x.row(j).as_slice().unwrap(),
                    );
                    prop_assert!((y[condensed_index(i, j, m)] - expect).abs() < 1e-12);
                }
            }
        }
    }
}
