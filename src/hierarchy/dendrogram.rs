//! Merge history of an agglomerative clustering.
//!
//! A dendrogram is the typed form of a linkage matrix: one [`Merge`] per
//! row, with cluster `n + i` formed by merge `i`.

use super::validate::{check_linkage, propagate_counts};
use crate::error::Result;
use ndarray::{Array2, ArrayView2};

/// A dendrogram representing hierarchical cluster merges.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The distance at which they merged
/// - The size of the resulting cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First merged cluster (column 0 of the linkage row).
    pub cluster_a: usize,
    /// Second merged cluster (column 1 of the linkage row).
    pub cluster_b: usize,
    /// Distance/dissimilarity at which merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Empty history for `n_items` observations.
    pub(crate) fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge, keeping the ids in the order given.
    pub(crate) fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Parse and validate a linkage matrix.
    pub fn from_linkage(z: ArrayView2<'_, f64>) -> Result<Self> {
        let n = check_linkage(z)?;
        Ok(Self::from_checked(z, n, None))
    }

    /// Build from rows whose structure is already validated.
    ///
    /// Sizes come from `counts` (as produced by `propagate_counts`) when
    /// given, else from column 3.
    pub(crate) fn from_checked(z: ArrayView2<'_, f64>, n: usize, counts: Option<&[usize]>) -> Self {
        let mut dendro = Self::new(n);
        for (i, row) in z.rows().into_iter().enumerate() {
            let size = match counts {
                Some(c) => c[n + i],
                None => row[3] as usize,
            };
            dendro.add_merge(row[0] as usize, row[1] as usize, row[2], size);
        }
        dendro
    }

    /// Build from a 3-column structure, recomputing sizes.
    pub(crate) fn from_structure(z: ArrayView2<'_, f64>, n: usize) -> Self {
        let counts = propagate_counts(z, n);
        Self::from_checked(z, n, Some(&counts))
    }

    /// The (n−1)×4 linkage matrix.
    pub fn to_linkage(&self) -> Array2<f64> {
        let mut z = Array2::<f64>::zeros((self.merges.len(), 4));
        for (mut row, m) in z.rows_mut().into_iter().zip(&self.merges) {
            row[0] = m.cluster_a as f64;
            row[1] = m.cluster_b as f64;
            row[2] = m.distance;
            row[3] = m.size as f64;
        }
        z
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge `i`, which formed cluster `n_items + i`.
    pub fn merge(&self, i: usize) -> Option<&Merge> {
        self.merges.get(i)
    }

    /// The merge distances, in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }

    /// Id of the root cluster, once all merges are recorded.
    pub fn root_id(&self) -> usize {
        (self.n_items + self.merges.len()).saturating_sub(1)
    }

    /// Whether merge distances never decrease.
    ///
    /// Centroid and median linkage can produce inversions.
    pub fn is_monotonic(&self) -> bool {
        self.merges.windows(2).all(|w| w[0].distance <= w[1].distance)
    }
}
