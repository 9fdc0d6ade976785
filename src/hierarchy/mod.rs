//! Cluster trees built from linkage matrices.
//!
//! # The Linkage Matrix
//!
//! Agglomerative clustering of `n` observations records `n − 1` merges.
//! Row `i` of the linkage matrix `Z` is
//!
//! ```text
//! [ left id , right id , merge distance , leaves below ]
//! ```
//!
//! and forms cluster `n + i`. Leaves are `0..n`; the root is `2n − 2`.
//!
//! ```text
//!         6 (height=1.0)           Z = [[0, 1, 0.5, 2],
//!        / \                            [2, 3, 0.7, 2],
//!       4   5 (height=0.7, 0.5)         [4, 5, 1.0, 4]]
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! Every operation here validates `Z` first (see [`check_linkage`]), so a
//! malformed matrix is rejected with the offending row rather than
//! producing a malformed tree.
//!
//! # Views of the same tree
//!
//! | View | Type | Built by |
//! |------|------|----------|
//! | merge history | [`Dendrogram`] | [`Dendrogram::from_linkage`] |
//! | owned tree | [`ClusterNode`] | [`totree`] |
//! | ultrametric | condensed vector | [`cophenet`] |
//! | link statistics | (n−1)×4 matrix | [`inconsistent`] |
//! | 1-based, no counts | (n−1)×3 matrix | [`to_legacy_linkage`] |
//!
//! ## Ultrametrics
//!
//! An ultrametric satisfies a stronger triangle inequality:
//!
//! ```text
//! d(x, z) <= max(d(x, y), d(y, z))
//! ```
//!
//! A finite metric is ultrametric exactly when it is the leaf-to-leaf LCA
//! height of some rooted tree. Cophenetic distances of a monotone linkage
//! are that ultrametric, and [`cophenet_correlation`] measures how well it
//! preserves the original distances.
//!
//! # References
//!
//! - Carlsson & Mémoli (2010): "Characterization, Stability and Convergence
//!   of Hierarchical Clustering Methods"
//! - Sokal & Rohlf (1962): "The Comparison of Dendrograms by Objective
//!   Methods"

mod cophenet;
mod dendrogram;
mod inconsistent;
mod legacy;
mod node;
mod tree;
mod validate;

pub use cophenet::{cophenet, cophenet_correlation};
pub use dendrogram::{Dendrogram, Merge};
pub use inconsistent::inconsistent;
pub use legacy::{from_legacy_linkage, to_legacy_linkage};
pub use node::ClusterNode;
pub use tree::totree;
pub use validate::{check_linkage, is_valid_linkage};
