//! Agglomerative clustering.
//!
//! Bottom-up: start with each observation as its own cluster, repeatedly
//! merge the two closest clusters until one remains. The merge history is a
//! **linkage matrix**, one row per merge, which the [`hierarchy`](crate::hierarchy)
//! module turns into trees and cophenetic distances.
//!
//! ## Linkage methods
//!
//! Every method is an instance of the Lance–Williams recurrence: after
//! merging `s` and `t` into `q`, the distance to any other cluster `u` is
//!
//! ```text
//! d(q,u) = α_s·d(s,u) + α_t·d(t,u) + β·d(s,t) + γ·|d(s,u) − d(t,u)|
//! ```
//!
//! with coefficients from [`Method::coefficients`]. Only the distance table
//! is needed, except for centroid and median, which follow cluster centres
//! in observation space.
//!
//! | Method | Input | Monotone |
//! |--------|-------|----------|
//! | single, complete, average, weighted | condensed or observations | yes |
//! | ward | Euclidean observations | yes |
//! | centroid, median | Euclidean observations | no |
//!
//! ## Usage
//!
//! ```rust
//! use hcluster::cluster::{HierarchicalClustering, Method};
//! use ndarray::array;
//!
//! let x = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
//! let z = HierarchicalClustering::new(Method::Average).fit(x.view()).unwrap();
//!
//! // The two tight pairs merge first; the last merge joins them.
//! assert_eq!(z.row(0)[3], 2.0);
//! assert_eq!(z.row(2)[3], 4.0);
//! ```

mod linkage;
mod method;

pub use linkage::{linkage, HierarchicalClustering, LinkageInput};
pub use method::{LanceWilliams, Method};
