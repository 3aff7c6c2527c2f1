//! Factorization tree stored in a generational arena.
//!
//! Nodes keep parent and child links plus a creation-order ordinal; a
//! composite node is split at most once into a factor pair.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::layout::{LayoutEngine, Point};
use crate::domain::number::{factor_pairs, is_prime, FactorPair};

/// Classification of a node value, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Prime,
    Composite,
}

impl NodeKind {
    pub fn of(value: u64) -> Self {
        if is_prime(value) {
            NodeKind::Prime
        } else {
            NodeKind::Composite
        }
    }
}

/// Data payload for a bubble in the factorization tree.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub value: u64,
    pub kind: NodeKind,
    /// Only ever true for composite nodes
    pub decomposed: bool,
    /// Root is depth 0
    pub depth: usize,
    /// Cached layout position, used for drawing connectors
    pub position: Point,
    /// Creation order within the tree, root is 0
    pub ordinal: usize,
}

impl NodeData {
    pub fn is_prime(&self) -> bool {
        self.kind == NodeKind::Prime
    }

    /// Composite and not yet decomposed.
    pub fn is_pending(&self) -> bool {
        self.kind == NodeKind::Composite && !self.decomposed
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct FactorNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Left and right child after decomposition, empty before
    pub children: Vec<Index>,
}

/// Arena-based factorization tree.
///
/// Nodes are addressed by generational [`Index`]; creation order is kept
/// separately so every node also has a stable ordinal.
#[derive(Debug)]
pub struct FactorTree {
    arena: Arena<FactorNode>,
    root: Index,
    order: Vec<Index>,
}

impl FactorTree {
    /// Creates a tree holding only its root at depth 0.
    #[instrument(level = "debug")]
    pub fn new(value: u64, position: Point) -> DomainResult<Self> {
        if value <= 1 {
            return Err(DomainError::ValueTooSmall(value));
        }
        let mut arena = Arena::new();
        let root = arena.insert(FactorNode {
            data: NodeData {
                value,
                kind: NodeKind::of(value),
                decomposed: false,
                depth: 0,
                position,
                ordinal: 0,
            },
            parent: None,
            children: Vec::new(),
        });
        Ok(Self {
            arena,
            root,
            order: vec![root],
        })
    }

    #[instrument(level = "trace", skip(self))]
    fn insert_child(&mut self, value: u64, parent: Index, depth: usize, position: Point) -> Index {
        let node = FactorNode {
            data: NodeData {
                value,
                kind: NodeKind::of(value),
                decomposed: false,
                depth,
                position,
                ordinal: self.order.len(),
            },
            parent: Some(parent),
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.order.push(node_idx);
        node_idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_value(&self) -> u64 {
        self.arena[self.root].data.value
    }

    pub fn get_node(&self, idx: Index) -> Option<&FactorNode> {
        self.arena.get(idx)
    }

    pub fn node(&self, idx: Index) -> DomainResult<&FactorNode> {
        self.arena.get(idx).ok_or(DomainError::NodeNotFound)
    }

    /// Node with the given creation ordinal.
    pub fn by_ordinal(&self, ordinal: usize) -> Option<Index> {
        self.order.get(ordinal).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Replaces a pending composite node by two children whose values are `pair`.
    ///
    /// Children land at `depth + 1`, positioned by `layout`, left/right in pair order.
    #[instrument(level = "debug", skip(self, layout))]
    pub fn decompose(
        &mut self,
        idx: Index,
        pair: FactorPair,
        layout: &LayoutEngine,
    ) -> DomainResult<(Index, Index)> {
        let data = self.node(idx)?.data.clone();
        if data.kind == NodeKind::Prime {
            return Err(DomainError::NotComposite(data.value));
        }
        if data.decomposed {
            return Err(DomainError::AlreadyDecomposed(data.value));
        }
        if !factor_pairs(data.value).contains(&pair) {
            return Err(DomainError::InvalidFactorPair {
                value: data.value,
                pair,
            });
        }

        if let Some(node) = self.arena.get_mut(idx) {
            node.data.decomposed = true;
        }
        let (left_pos, right_pos) = layout.child_positions(data.position, data.depth);
        let left = self.insert_child(pair.0, idx, data.depth + 1, left_pos);
        let right = self.insert_child(pair.1, idx, data.depth + 1, right_pos);
        debug!("decomposed {} into {}", data.value, pair);
        Ok((left, right))
    }

    /// True iff no composite node is left undecomposed.
    pub fn is_complete(&self) -> bool {
        self.arena.iter().all(|(_, n)| !n.data.is_pending())
    }

    /// First undecomposed composite node in pre-order.
    pub fn first_pending(&self) -> Option<Index> {
        self.iter()
            .find(|(_, n)| n.data.is_pending())
            .map(|(idx, _)| idx)
    }

    /// Values of all prime nodes, with repetition, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn prime_leaves(&self) -> Vec<u64> {
        self.iter()
            .filter(|(_, n)| n.data.is_prime())
            .map(|(_, n)| n.data.value)
            .collect()
    }

    /// Number of levels, a lone root counts as 1.
    pub fn depth(&self) -> usize {
        self.arena
            .iter()
            .map(|(_, n)| n.data.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (Index, &FactorNode)> {
        self.order.iter().map(|&idx| (idx, &self.arena[idx]))
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }
}

/// Pre-order, left to right.
pub struct TreeIterator<'a> {
    tree: &'a FactorTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a FactorTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a FactorNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(value: u64) -> FactorTree {
        FactorTree::new(value, Point::new(300.0, 50.0)).unwrap()
    }

    #[test]
    fn test_root_classification() {
        let t = tree(12);
        let root = t.node(t.root()).unwrap();
        assert_eq!(root.data.kind, NodeKind::Composite);
        assert_eq!(root.data.depth, 0);
        assert!(!root.data.decomposed);
        assert!(root.parent.is_none());
        assert!(!t.is_complete());

        let p = tree(13);
        assert!(p.is_complete());
        assert_eq!(p.prime_leaves(), vec![13]);
    }

    #[test]
    fn test_rejects_values_below_two() {
        assert_eq!(
            FactorTree::new(1, Point::default()).unwrap_err(),
            DomainError::ValueTooSmall(1)
        );
    }

    #[test]
    fn test_decompose_links_children_in_pair_order() {
        let layout = LayoutEngine::default();
        let mut t = tree(12);
        let root = t.root();
        let (l, r) = t.decompose(root, FactorPair(2, 6), &layout).unwrap();

        let left = t.node(l).unwrap();
        let right = t.node(r).unwrap();
        assert_eq!((left.data.value, right.data.value), (2, 6));
        assert_eq!(left.data.kind, NodeKind::Prime);
        assert_eq!(right.data.kind, NodeKind::Composite);
        assert_eq!(left.data.depth, 1);
        assert_eq!(left.parent, Some(root));
        assert_eq!(t.node(root).unwrap().children, vec![l, r]);
        assert!(t.node(root).unwrap().data.decomposed);
        assert!(left.data.position.x < right.data.position.x);
        assert_eq!(left.data.position.y, 150.0);
        assert_eq!((left.data.ordinal, right.data.ordinal), (1, 2));
    }

    #[test]
    fn test_decompose_preconditions() {
        let layout = LayoutEngine::default();
        let mut t = tree(12);
        let root = t.root();

        assert_eq!(
            t.decompose(root, FactorPair(5, 7), &layout).unwrap_err(),
            DomainError::InvalidFactorPair {
                value: 12,
                pair: FactorPair(5, 7)
            }
        );
        let (l, _) = t.decompose(root, FactorPair(3, 4), &layout).unwrap();
        assert_eq!(
            t.decompose(root, FactorPair(2, 6), &layout).unwrap_err(),
            DomainError::AlreadyDecomposed(12)
        );
        assert_eq!(
            t.decompose(l, FactorPair(1, 3), &layout).unwrap_err(),
            DomainError::NotComposite(3)
        );
    }

    #[test]
    fn test_completion_and_prime_leaves() {
        let layout = LayoutEngine::default();
        let mut t = tree(36);
        let (a, b) = t.decompose(t.root(), FactorPair(6, 6), &layout).unwrap();
        assert_eq!(t.first_pending(), Some(a));
        t.decompose(a, FactorPair(2, 3), &layout).unwrap();
        assert!(!t.is_complete());
        assert_eq!(t.first_pending(), Some(b));
        t.decompose(b, FactorPair(2, 3), &layout).unwrap();
        assert!(t.is_complete());
        assert_eq!(t.first_pending(), None);
        assert_eq!(t.prime_leaves(), vec![2, 3, 2, 3]);
        assert_eq!(t.depth(), 3);
        assert_eq!(t.len(), 7);
    }

    #[test]
    fn test_traversal_orders() {
        let layout = LayoutEngine::default();
        let mut t = tree(12);
        let (_, six) = t.decompose(t.root(), FactorPair(2, 6), &layout).unwrap();
        t.decompose(six, FactorPair(2, 3), &layout).unwrap();

        let pre: Vec<u64> = t.iter().map(|(_, n)| n.data.value).collect();
        assert_eq!(pre, vec![12, 2, 6, 2, 3]);
        let created: Vec<u64> = t.nodes().map(|(_, n)| n.data.value).collect();
        assert_eq!(created, vec![12, 2, 6, 2, 3]);
        assert_eq!(t.by_ordinal(2), Some(six));
        assert_eq!(t.by_ordinal(9), None);
    }
}
