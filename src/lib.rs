//! # hcluster
//!
//! Agglomerative hierarchical clustering: pairwise distances, SAHN linkage,
//! cluster trees and cophenetic analysis.
//!
//! ```text
//!  observations ──pdist──► condensed Y ──linkage──► Z ──┬─ totree ──► ClusterNode
//!                              ▲                        ├─ cophenet ─► ultrametric
//!                          squareform                   ├─ inconsistent
//!                              ▼                        └─ to/from legacy
//!                         square matrix
//! ```
//!
//! ```rust
//! use hcluster::{cophenet_correlation, linkage, pdist, totree, LinkageInput, Method, Metric};
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]];
//! let y = pdist(x.view(), &Metric::Euclidean).unwrap();
//! let z = linkage(LinkageInput::from(y.view()), Method::Average, &Metric::Euclidean).unwrap();
//!
//! let root = totree(z.view()).unwrap();
//! assert_eq!(root.count(), 4);
//!
//! let (c, _) = cophenet_correlation(z.view(), y.view()).unwrap();
//! assert!(c > 0.9);
//! ```
//!
//! All operations are synchronous and pure. With the `parallel` feature,
//! distance kernels and the closest-pair scan run on rayon; results are
//! identical to the sequential build.
//!
//! The crate always links `std`. The `std` feature (on by default) only
//! controls the `std::error::Error` impl on [`Error`].

pub mod cluster;
pub mod distance;
/// Error types used across `hcluster`.
pub mod error;
pub mod hierarchy;


pub use error::{Corruption, Error, ErrorKind, Result};

pub use cluster::{linkage, HierarchicalClustering, LinkageInput, Method};
pub use distance::{pdist, pdist_bool, squareform, DistanceForm, Force, Metric};
pub use hierarchy::{
    cophenet, cophenet_correlation, from_legacy_linkage, inconsistent, to_legacy_linkage, totree,
    ClusterNode, Dendrogram,
};
