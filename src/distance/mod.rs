//! Pairwise distances and distance-matrix forms.
//!
//! Hierarchical clustering consumes dissimilarities, not points. This module
//! turns an m×n observation matrix into the **condensed** vector of its
//! m(m−1)/2 pairwise distances, and converts between that vector and the
//! full square matrix.
//!
//! ```text
//!  observations          condensed                 square
//!  (m × n)        pdist  [d01 d02 d03 d12 d13 d23]  ┌ 0   d01 d02 d03 ┐
//!  ──────────────►       ◄──── squareform ────►     │ d01 0   d12 d13 │
//!                                                   │ d02 d12 0   d23 │
//!                                                   └ d03 d13 d23 0   ┘
//! ```
//!
//! # Metrics
//!
//! [`Metric`] is a closed catalogue plus one escape hatch,
//! [`Metric::custom`], for any `Fn(&[f64], &[f64]) -> f64`. Names parse with
//! [`str::parse`], including short aliases (`"eu"`, `"cb"`, `"se"`, ...).
//!
//! Boolean observations go through [`pdist_bool`] (hamming, jaccard only).
//!
//! # Parallelism
//!
//! With the `parallel` feature, kernel evaluations are spread over rayon
//! workers. The output is identical: every pair owns a fixed slot.

mod condensed;
pub mod metric;
mod pdist;
mod squareform;

pub use condensed::{
    condensed_index, condensed_len, is_valid_condensed, is_valid_square, num_observations,
    random_condensed,
};
pub use metric::{DistanceFn, Metric};
pub use pdist::{pdist, pdist_bool};
pub use squareform::{squareform, to_matrix, to_vector, DistanceForm, Force};
