//! Owned cluster tree node.

use core::fmt;

/// A node of the tree built from a linkage matrix.
///
/// Leaves are original observations `0..n`; internal node `n + i` is the
/// cluster formed by linkage row `i` and owns both children.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterNode {
    /// An original observation.
    Leaf {
        /// Observation index.
        id: usize,
    },
    /// A merged cluster.
    Internal {
        /// Cluster id, `n + row`.
        id: usize,
        /// Child named in column 0 of the linkage row.
        left: Box<ClusterNode>,
        /// Child named in column 1 of the linkage row.
        right: Box<ClusterNode>,
        /// Merge distance.
        distance: f64,
        /// Number of leaves below.
        count: usize,
    },
}

impl ClusterNode {
    /// Cluster id.
    pub fn id(&self) -> usize {
        match self {
            ClusterNode::Leaf { id } | ClusterNode::Internal { id, .. } => *id,
        }
    }

    /// Check if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, ClusterNode::Leaf { .. })
    }

    /// Merge distance; 0 for leaves.
    pub fn distance(&self) -> f64 {
        match self {
            ClusterNode::Leaf { .. } => 0.0,
            ClusterNode::Internal { distance, .. } => *distance,
        }
    }

    /// Number of leaves below, 1 for a leaf.
    pub fn count(&self) -> usize {
        match self {
            ClusterNode::Leaf { .. } => 1,
            ClusterNode::Internal { count, .. } => *count,
        }
    }

    /// Left child, if internal.
    pub fn left(&self) -> Option<&ClusterNode> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { left, .. } => Some(left),
        }
    }

    /// Right child, if internal.
    pub fn right(&self) -> Option<&ClusterNode> {
        match self {
            ClusterNode::Leaf { .. } => None,
            ClusterNode::Internal { right, .. } => Some(right),
        }
    }

    /// Leaf ids in left-to-right order.
    pub fn leaf_ids(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                ClusterNode::Leaf { id } => out.push(*id),
                ClusterNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        out
    }

    /// The node with cluster id `id`, if it is in this subtree.
    pub fn find(&self, id: usize) -> Option<&ClusterNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id() == id {
                return Some(node);
            }
            if let ClusterNode::Internal { left, right, .. } = node {
                stack.push(right);
                stack.push(left);
            }
        }
        None
    }
}

impl fmt::Display for ClusterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterNode::Leaf { id } => write!(f, "Leaf[{id}]"),
            ClusterNode::Internal {
                id,
                left,
                right,
                distance,
                count,
            } => write!(
                f,
                "Node[{id}] d={distance} n={count} ({}, {})",
                left.id(),
                right.id()
            ),
        }
    }
}
