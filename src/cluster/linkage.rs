//! Agglomerative (SAHN) clustering.
//!
//! Bottom-up clustering that builds a **linkage matrix** by repeatedly
//! merging the two closest clusters. Nothing about the number of clusters
//! is decided up front: the whole merge history is recorded.
//!
//! # Linkage Methods
//!
//! The key choice: how do we define "distance between clusters"?
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min d(a,b), a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max d(a,b) | Compact, spherical clusters |
//! | Average | mean d(a,b) | Balanced compromise |
//! | Weighted | mean of the parents' distances | Ignores cluster sizes |
//! | Centroid | ‖μₐ − μᵦ‖ | Can produce inversions |
//! | Median | ‖μₐ − μᵦ‖, μ unweighted | Can produce inversions |
//! | Ward | Δ variance | Minimizes within-cluster variance |
//!
//! Centroid, median and Ward only make sense for raw observations under the
//! Euclidean metric.
//!
//! ## Ward's Method: Variance Minimization
//!
//! ```text
//! d(A,B) = sqrt( 2·nₐ·nᵦ/(nₐ + nᵦ) ) · ‖μₐ − μᵦ‖
//! ```
//!
//! # The Linkage Matrix
//!
//! Row `i` records round `i`: `[left, right, distance, count]`, where the
//! new cluster gets id `n + i` and `left < right`.
//!
//! ```text
//!   points 0, 1, 2 on a line at 0, 1, 2
//!
//!   round  left  right  dist  count        3 ─┬─ 0
//!   0      0     1      1.0   2               └─ 1
//!   1      2     3      1.0   3        4 ─┬─ 2
//!                                         └─ 3
//! ```
//!
//! # Ties
//!
//! Live clusters are scanned in ascending id order, `s` outer and `t`
//! inner, and only a strictly smaller distance replaces the current best.
//! The first pair in that order wins, so results are reproducible bit for
//! bit, including under the `parallel` feature.

use super::method::Method;
use crate::distance::{condensed_index, metric, num_observations, pdist, Metric};
use crate::error::{Error, Result};
use crate::hierarchy::Dendrogram;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What [`linkage`] clusters.
#[derive(Debug, Clone, Copy)]
pub enum LinkageInput<'a> {
    /// A condensed distance vector.
    Condensed(ArrayView1<'a, f64>),
    /// An m×n observation matrix, one observation per row.
    Observations(ArrayView2<'a, f64>),
}

impl<'a> From<ArrayView1<'a, f64>> for LinkageInput<'a> {
    fn from(y: ArrayView1<'a, f64>) -> Self {
        LinkageInput::Condensed(y)
    }
}

impl<'a> From<ArrayView2<'a, f64>> for LinkageInput<'a> {
    fn from(x: ArrayView2<'a, f64>) -> Self {
        LinkageInput::Observations(x)
    }
}

impl<'a> From<&'a Array1<f64>> for LinkageInput<'a> {
    fn from(y: &'a Array1<f64>) -> Self {
        LinkageInput::Condensed(y.view())
    }
}

impl<'a> From<&'a Array2<f64>> for LinkageInput<'a> {
    fn from(x: &'a Array2<f64>) -> Self {
        LinkageInput::Observations(x.view())
    }
}

/// Hierarchical (agglomerative) clustering.
///
/// ```rust
/// use hcluster::cluster::{HierarchicalClustering, Method};
/// use ndarray::array;
///
/// let x = array![[0.0], [1.0], [3.0]];
/// let z = HierarchicalClustering::new(Method::Ward).fit(x.view()).unwrap();
/// assert_eq!(z.dim(), (2, 4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HierarchicalClustering {
    /// Linkage method.
    method: Method,
    /// Metric used when clustering raw observations.
    metric: Metric,
}

impl HierarchicalClustering {
    /// Create a new hierarchical clusterer with the Euclidean metric.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            metric: Metric::Euclidean,
        }
    }

    /// Set the metric applied to observations.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Linkage method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Observation metric.
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// Cluster the rows of `x` and return the linkage matrix.
    pub fn fit(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.fit_dendrogram(LinkageInput::Observations(x))?.to_linkage())
    }

    /// Cluster a condensed distance vector and return the linkage matrix.
    pub fn fit_condensed(&self, y: ArrayView1<'_, f64>) -> Result<Array2<f64>> {
        Ok(self.fit_dendrogram(LinkageInput::Condensed(y))?.to_linkage())
    }

    /// Fit and return the full merge history.
    pub fn fit_dendrogram(&self, input: LinkageInput<'_>) -> Result<Dendrogram> {
        let method = self.method;
        if method.requires_euclidean() {
            if let LinkageInput::Condensed(_) = input {
                return Err(Error::IncompatibleMethod {
                    method: method.name(),
                    reason: "needs raw observations, not a condensed distance vector",
                });
            }
            if !self.metric.is_euclidean() {
                return Err(Error::IncompatibleMethod {
                    method: method.name(),
                    reason: "is only defined for the euclidean metric",
                });
            }
        }

        let (n, dist, centroids): (usize, Vec<f64>, Option<Vec<Vec<f64>>>) = match input {
            LinkageInput::Condensed(y) => {
                let n = num_observations(y.len())?;
                (n, y.to_vec(), None)
            }
            LinkageInput::Observations(x) => {
                let dist = pdist(x, &self.metric)?.to_vec();
                let centroids = method
                    .tracks_centroids()
                    .then(|| x.rows().into_iter().map(|r| r.to_vec()).collect());
                (x.nrows(), dist, centroids)
            }
        };
        if let Some(index) = dist.iter().position(|d| !d.is_finite()) {
            return Err(Error::NonFiniteDistance { index });
        }

        tracing::debug!(
            observations = n,
            method = method.name(),
            "linkage.start"
        );
        let dendro = Forest::new(n, dist, centroids).agglomerate(method);
        tracing::debug!(
            merges = dendro.n_merges(),
            height = dendro.distances().last().copied().unwrap_or(0.0),
            "linkage.done"
        );
        Ok(dendro)
    }
}

/// Cluster `input` with `method` and return the (n−1)×4 linkage matrix.
///
/// `metric` only applies to [`LinkageInput::Observations`].
///
/// ```rust
/// use hcluster::{linkage, LinkageInput, Method, Metric};
/// use ndarray::array;
///
/// let y = array![1.0, 2.0, 1.0];
/// let z = linkage(LinkageInput::from(y.view()), Method::Single, &Metric::Euclidean).unwrap();
/// assert_eq!(z, array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 1.0, 3.0]]);
/// ```
pub fn linkage(input: LinkageInput<'_>, method: Method, metric: &Metric) -> Result<Array2<f64>> {
    HierarchicalClustering::new(method)
        .with_metric(metric.clone())
        .fit_dendrogram(input)
        .map(|d| d.to_linkage())
}

/// A live cluster occupying an arena slot.
#[derive(Debug, Clone, Copy)]
struct Cluster {
    id: usize,
    size: usize,
}

/// Arena of clusters indexed by slot.
///
/// Slot `i` starts as singleton `i`. When `s` and `t` merge, the new
/// cluster takes over slot `s` and slot `t` is retired. `dist` stays a
/// condensed table over slots throughout.
struct Forest {
    n: usize,
    clusters: Vec<Cluster>,
    dist: Vec<f64>,
    /// Slots of live clusters, ascending by cluster id.
    live: Vec<usize>,
    centroids: Option<Vec<Vec<f64>>>,
}

impl Forest {
    fn new(n: usize, dist: Vec<f64>, centroids: Option<Vec<Vec<f64>>>) -> Self {
        Self {
            n,
            clusters: (0..n).map(|id| Cluster { id, size: 1 }).collect(),
            dist,
            live: (0..n).collect(),
            centroids,
        }
    }

    #[inline]
    fn d(&self, a: usize, b: usize) -> f64 {
        self.dist[condensed_index(a.min(b), a.max(b), self.n)]
    }

    #[inline]
    fn set(&mut self, a: usize, b: usize, value: f64) {
        let k = condensed_index(a.min(b), a.max(b), self.n);
        self.dist[k] = value;
    }

    fn agglomerate(mut self, method: Method) -> Dendrogram {
        let mut dendro = Dendrogram::new(self.n);
        for round in 0..self.n.saturating_sub(1) {
            let (a, b) = self.nearest_pair();
            let (s, t) = (self.live[a], self.live[b]);
            let d_st = self.d(s, t);
            let (cs, ct) = (self.clusters[s], self.clusters[t]);
            let size = cs.size + ct.size;
            let id = self.n + round;

            let (left, right) = (cs.id.min(ct.id), cs.id.max(ct.id));
            tracing::trace!(
                round,
                left,
                right,
                distance = d_st,
                size,
                "linkage.merge"
            );
            dendro.add_merge(left, right, d_st, size);

            // `b > a`: remove the later position first.
            self.live.remove(b);
            self.live.remove(a);

            let by_centroid = self.merge_centroids(s, t, method, cs.size, ct.size);
            for i in 0..self.live.len() {
                let u = self.live[i];
                let value = if by_centroid {
                    self.centroid_distance(s, u)
                } else {
                    method.update(
                        self.d(s, u),
                        self.d(t, u),
                        d_st,
                        cs.size,
                        ct.size,
                        self.clusters[u].size,
                    )
                };
                self.set(s, u, value);
            }

            self.clusters[s] = Cluster { id, size };
            // Newest id is the largest: pushing keeps `live` sorted.
            self.live.push(s);
        }
        dendro
    }

    /// Write the centroid of `s ∪ t` into slot `s`. Returns `false` when
    /// centroids are not tracked.
    fn merge_centroids(&mut self, s: usize, t: usize, method: Method, n_s: usize, n_t: usize) -> bool {
        let Some(centroids) = self.centroids.as_mut() else {
            return false;
        };
        let (ws, wt) = match method {
            Method::Median => (0.5, 0.5),
            _ => {
                let total = (n_s + n_t) as f64;
                (n_s as f64 / total, n_t as f64 / total)
            }
        };
        let merged: Vec<f64> = centroids[s]
            .iter()
            .zip(&centroids[t])
            .map(|(x, y)| ws * x + wt * y)
            .collect();
        centroids[s] = merged;
        true
    }

    fn centroid_distance(&self, a: usize, b: usize) -> f64 {
        match &self.centroids {
            Some(c) => metric::euclidean(&c[a], &c[b]),
            None => self.d(a, b),
        }
    }

    /// Positions `(a, b)`, `a < b`, into `live` of the closest pair.
    #[cfg(not(feature = "parallel"))]
    fn nearest_pair(&self) -> (usize, usize) {
        let mut best = (f64::INFINITY, 0, 1);
        for a in 0..self.live.len() {
            if let Some((d, b)) = self.row_min(a) {
                if d < best.0 {
                    best = (d, a, b);
                }
            }
        }
        (best.1, best.2)
    }

    /// Positions `(a, b)`, `a < b`, into `live` of the closest pair.
    #[cfg(feature = "parallel")]
    fn nearest_pair(&self) -> (usize, usize) {
        let best = (0..self.live.len())
            .into_par_iter()
            .filter_map(|a| self.row_min(a).map(|(d, b)| (d, a, b)))
            .reduce_with(|x, y| {
                // Ties go to the earlier scan position.
                if y.0 < x.0 || (y.0 == x.0 && (y.1, y.2) < (x.1, x.2)) {
                    y
                } else {
                    x
                }
            });
        match best {
            Some((_, a, b)) => (a, b),
            None => (0, 1),
        }
    }

    /// First minimum over `t` positions after `a`.
    fn row_min(&self, a: usize) -> Option<(f64, usize)> {
        let s = self.live[a];
        let mut best: Option<(f64, usize)> = None;
        for b in (a + 1)..self.live.len() {
            let d = self.d(s, self.live[b]);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, b));
            }
        }
        best
    }
}
