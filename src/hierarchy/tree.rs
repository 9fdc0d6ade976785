//! Linkage matrix → owned tree.

use super::dendrogram::Dendrogram;
use super::node::ClusterNode;
use crate::error::{Corruption, Error, Result};
use ndarray::ArrayView2;

/// Build the cluster tree of a linkage matrix and return its root.
///
/// `z` is fully validated first (see [`check_linkage`](super::check_linkage)),
/// so a returned tree always has `n` leaves and `n − 1` internal nodes.
///
/// ```rust
/// use hcluster::totree;
/// use ndarray::array;
///
/// let z = array![[0.0, 1.0, 1.0, 2.0], [2.0, 3.0, 1.0, 3.0]];
/// let root = totree(z.view()).unwrap();
/// assert_eq!(root.id(), 4);
/// assert_eq!(root.count(), 3);
/// assert_eq!(root.leaf_ids(), vec![2, 0, 1]);
/// ```
pub fn totree(z: ArrayView2<'_, f64>) -> Result<ClusterNode> {
    Dendrogram::from_linkage(z)?.to_tree()
}

impl Dendrogram {
    /// Materialize the merge history as an owned tree.
    pub fn to_tree(&self) -> Result<ClusterNode> {
        let n = self.n_items();
        let mut slots: Vec<Option<ClusterNode>> =
            (0..n).map(|id| Some(ClusterNode::Leaf { id })).collect();
        slots.reserve(self.n_merges());

        for (i, m) in self.merges().enumerate() {
            let left = take(&mut slots, m.cluster_a, i)?;
            let right = take(&mut slots, m.cluster_b, i)?;
            slots.push(Some(ClusterNode::Internal {
                id: n + i,
                left: Box::new(left),
                right: Box::new(right),
                distance: m.distance,
                count: m.size,
            }));
        }

        // Last node built is the root.
        match slots.pop().flatten() {
            Some(root) if slots.iter().all(Option::is_none) => Ok(root),
            _ => Err(Error::ShapeMismatch {
                expected: "merges joining every observation into one tree".to_string(),
                actual: format!("{} merges over {} observations", self.n_merges(), n),
            }),
        }
    }
}

fn take(slots: &mut [Option<ClusterNode>], id: usize, row: usize) -> Result<ClusterNode> {
    slots
        .get_mut(id)
        .and_then(Option::take)
        .ok_or_else(|| Error::corrupt(row, Corruption::IdReused { id }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, unused_results)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use ndarray::array;

    #[test]
    fn two_leaves() {
        let root = totree(array![[0.0, 1.0, 3.5, 2.0]].view()).unwrap();
        match root {
            ClusterNode::Internal {
                id,
                left,
                right,
                distance,
                count,
            } => {
                assert_eq!(id, 2);
                assert_eq!(*left, ClusterNode::Leaf { id: 0 });
                assert_eq!(*right, ClusterNode::Leaf { id: 1 });
                assert!((distance - 3.5).abs() < 1e-10);
                assert_eq!(count, 2);
            }
            ClusterNode::Leaf { .. } => panic!("root should be internal"),
        }
    }

    #[test]
    fn children_follow_column_order() {
        let root = totree(array![[1.0, 0.0, 1.0, 2.0]].view()).unwrap();
        assert_eq!(root.left().map(ClusterNode::id), Some(1));
        assert_eq!(root.right().map(ClusterNode::id), Some(0));
        assert_eq!(root.leaf_ids(), vec![1, 0]);

        let z = array![[2.0, 0.0, 0.5, 2.0], [1.0, 3.0, 0.9, 3.0]];
        assert_eq!(totree(z.view()).unwrap().leaf_ids(), vec![1, 2, 0]);
    }

    #[test]
    fn every_node_reachable() {
        let z = array![
            [0.0, 1.0, 0.5, 2.0],
            [2.0, 3.0, 0.7, 2.0],
            [4.0, 5.0, 1.0, 4.0]
        ];
        let root = totree(z.view()).unwrap();
        assert_eq!(root.id(), 6);
        let mut leaves = root.leaf_ids();
        leaves.sort_unstable();
        assert_eq!(leaves, vec![0, 1, 2, 3]);
        for id in 0..7 {
            assert!(root.find(id).is_some(), "missing {id}");
        }
        assert_eq!(root.find(5).map(ClusterNode::count), Some(2));
    }

    #[test]
    fn rejects_corrupt_input() {
        let cases = [
            array![[0.0, 1.0, -1.0, 2.0]],
            array![[0.0, 1.0, 1.0, -2.0]],
            array![[0.0, 2.0, 1.0, 2.0]],
            array![[1.0, 1.0, 1.0, 2.0]],
            array![[0.0, 1.0, 1.0, 3.0]],
        ];
        for z in cases {
            let err = totree(z.view()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CorruptStructure, "{z}");
        }
        let short = array![[0.0, 1.0, 1.0]];
        assert_eq!(totree(short.view()).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    }
}
