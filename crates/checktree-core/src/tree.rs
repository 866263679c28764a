#![forbid(unsafe_code)]

//! Arena flattening of an item tree.
//!
//! [`ItemTree`] copies the caller's items into a flat node list in
//! deterministic pre-order, wrapped in a synthetic root at index 0. Because
//! the order is pre-order, every subtree occupies the contiguous id range
//! `id..subtree_end(id)`, so "walk the subtree" is a range scan and "walk
//! bottom-up" is the same range reversed.
//!
//! Construction uses an explicit stack; arbitrarily deep trees never recurse.
//!
//! # Invariants
//!
//! 1. `nodes[0]` is the synthetic root; it has no item and no parent.
//! 2. For every non-root node, `parent(id) < id`.
//! 3. `subtree(id)` is `id..end` with `end <= len()`, and contains exactly
//!    `id` and its descendants.
//! 4. Children lists preserve the caller's order.

use std::ops::Range;

use bitflags::bitflags;

use crate::children::Children;
use crate::comparator::Comparator;
use crate::disabled::DisabledSet;

/// Index of a node in an [`ItemTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The synthetic root wrapping the caller's top-level items.
    pub const ROOT: Self = Self(0);

    /// Raw arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    /// Whether this is the synthetic root.
    #[inline]
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

bitflags! {
    /// Structural facts about a node, fixed at build time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u8 {
        /// The synthetic root.
        const ROOT = 0b0000_0001;
        /// No children (absent or empty children field).
        const LEAF = 0b0000_0010;
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    item: Option<T>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subtree_end: usize,
    depth: usize,
    flags: NodeFlags,
}

/// Flattened tree of items under a synthetic root.
#[derive(Debug, Clone)]
pub struct ItemTree<T> {
    nodes: Vec<Node<T>>,
    height: usize,
}

impl<T: Clone> ItemTree<T> {
    /// Flatten `items` (the top-level sequence) into pre-order.
    ///
    /// Each node keeps its own clone of the item; wrap heavy items in `Rc`
    /// when clones are expensive.
    #[must_use]
    pub fn build(items: &[T], children: &Children<T>) -> Self {
        let mut nodes = vec![Node {
            item: None,
            parent: None,
            children: Vec::with_capacity(items.len()),
            subtree_end: 1,
            depth: 0,
            flags: if items.is_empty() {
                NodeFlags::ROOT | NodeFlags::LEAF
            } else {
                NodeFlags::ROOT
            },
        }];

        // Pushed in reverse so the first child pops first.
        let mut stack: Vec<(NodeId, &T, usize)> =
            items.iter().rev().map(|item| (NodeId::ROOT, item, 1)).collect();
        let mut height = 0;

        while let Some((parent, item, depth)) = stack.pop() {
            let id = NodeId(nodes.len());
            let kids = children.of(item).unwrap_or(&[]);
            nodes[parent.0].children.push(id);
            nodes.push(Node {
                item: Some(item.clone()),
                parent: Some(parent),
                children: Vec::with_capacity(kids.len()),
                subtree_end: id.0 + 1,
                depth,
                flags: if kids.is_empty() {
                    NodeFlags::LEAF
                } else {
                    NodeFlags::empty()
                },
            });
            height = height.max(depth);
            stack.extend(kids.iter().rev().map(|kid| (id, kid, depth + 1)));
        }

        // Children always follow their parent, so one reverse sweep closes
        // every subtree range.
        for idx in (1..nodes.len()).rev() {
            let end = nodes[idx].subtree_end;
            if let Some(parent) = nodes[idx].parent {
                let slot = &mut nodes[parent.0].subtree_end;
                *slot = (*slot).max(end);
            }
        }

        Self { nodes, height }
    }
}

impl<T> ItemTree<T> {
    /// Number of nodes, synthetic root included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the caller supplied no items at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The synthetic root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Whether `id` addresses a node of this tree.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// The item stored at `id`; `None` for the root or an out-of-range id.
    #[must_use]
    pub fn item(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|node| node.item.as_ref())
    }

    /// Parent of `id`; `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    /// Direct children of `id`, in the caller's order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// The caller's top-level items (children of the synthetic root).
    #[must_use]
    pub fn top_level(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Depth of `id`; the root is at depth 0.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes.get(id.0).map_or(0, |node| node.depth)
    }

    /// Depth of the deepest node.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Structural flags of `id`.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.nodes
            .get(id.0)
            .map_or(NodeFlags::empty(), |node| node.flags)
    }

    /// Whether `id` has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::LEAF)
    }

    /// Pre-order id range of the subtree rooted at `id` (inclusive of `id`).
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Range<usize> {
        match self.nodes.get(id.0) {
            Some(node) => id.0..node.subtree_end,
            None => 0..0,
        }
    }

    /// Strict descendants of `id` in pre-order.
    pub fn descendants(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        let range = self.subtree(id);
        (range.start.saturating_add(1).min(range.end)..range.end).map(NodeId)
    }

    /// Every node in pre-order, synthetic root first.
    pub fn flatten(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// First node in pre-order whose item equals `item`.
    ///
    /// The synthetic root never matches.
    #[must_use]
    pub fn find(&self, item: &T, comparator: &Comparator<T>) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, node)| {
                node.item
                    .as_ref()
                    .is_some_and(|candidate| comparator.eq(candidate, item))
            })
            .map(|(idx, _)| NodeId(idx))
    }
}

/// Borrowed bundle of everything a reducer or query needs to know about the
/// tree: structure, identity, and which nodes are frozen.
#[derive(Debug)]
pub struct TreeView<'a, T> {
    /// Flattened tree.
    pub tree: &'a ItemTree<T>,
    /// Identity equality.
    pub comparator: &'a Comparator<T>,
    /// Result of the disabled-item filter over `tree`.
    pub disabled: &'a DisabledSet,
}

impl<T> Clone for TreeView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TreeView<'_, T> {}

impl<'a, T> TreeView<'a, T> {
    /// Bundle a tree with its comparator and disabled set.
    #[must_use]
    pub fn new(
        tree: &'a ItemTree<T>,
        comparator: &'a Comparator<T>,
        disabled: &'a DisabledSet,
    ) -> Self {
        Self {
            tree,
            comparator,
            disabled,
        }
    }

    /// Whether `id` is excluded from direct mutation.
    #[inline]
    #[must_use]
    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.disabled.contains(id)
    }

    /// Direct children of `id` that are not disabled.
    pub fn enabled_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let disabled = self.disabled;
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(move |child| !disabled.contains(*child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct N {
        label: &'static str,
        kids: Vec<N>,
    }

    fn n(label: &'static str, kids: Vec<N>) -> N {
        N { label, kids }
    }

    fn children() -> Children<N> {
        Children::new(|node: &N| Some(node.kids.as_slice()))
    }

    fn labels(tree: &ItemTree<N>) -> Vec<&'static str> {
        tree.flatten()
            .map(|id| tree.item(id).map_or("<root>", |item| item.label))
            .collect()
    }

    fn sample() -> Vec<N> {
        vec![
            n("a", vec![n("a1", vec![]), n("a2", vec![n("a2x", vec![])])]),
            n("b", vec![]),
        ]
    }

    /// Builds through a caller that only knows `T: Clone`.
    fn node_count<T: Clone>(items: &[T], children: &Children<T>) -> usize {
        ItemTree::build(items, children).len()
    }

    #[test]
    fn build_needs_no_static_bound() {
        assert_eq!(node_count(&sample(), &children()), 6);
        assert_eq!(children().of(&sample()[0]).map(<[N]>::len), Some(2));
        assert_eq!(children().field(), None);
    }

    #[test]
    fn flatten_is_pre_order_with_root_first() {
        let tree = ItemTree::build(&sample(), &children());
        assert_eq!(labels(&tree), ["<root>", "a", "a1", "a2", "a2x", "b"]);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn subtree_ranges_are_contiguous() {
        let tree = ItemTree::build(&sample(), &children());
        assert_eq!(tree.subtree(NodeId::ROOT), 0..6);
        assert_eq!(tree.subtree(NodeId(1)), 1..5);
        assert_eq!(tree.subtree(NodeId(3)), 3..5);
        assert_eq!(tree.subtree(NodeId(5)), 5..6);
        assert_eq!(
            tree.descendants(NodeId(1)).collect::<Vec<_>>(),
            [NodeId(2), NodeId(3), NodeId(4)]
        );
        assert_eq!(tree.descendants(NodeId(5)).count(), 0);
    }

    #[test]
    fn parents_children_and_flags() {
        let tree = ItemTree::build(&sample(), &children());
        assert_eq!(tree.top_level(), &[NodeId(1), NodeId(5)]);
        assert_eq!(tree.children(NodeId(1)), &[NodeId(2), NodeId(3)]);
        assert_eq!(tree.parent(NodeId(4)), Some(NodeId(3)));
        assert_eq!(tree.parent(NodeId::ROOT), None);
        assert!(tree.flags(NodeId::ROOT).contains(NodeFlags::ROOT));
        assert!(tree.is_leaf(NodeId(2)));
        assert!(!tree.is_leaf(NodeId(1)));
        assert_eq!(tree.depth(NodeId(4)), 3);
        assert!(tree.item(NodeId::ROOT).is_none());
    }

    #[test]
    fn find_uses_comparator_and_skips_root() {
        let tree = ItemTree::build(&sample(), &children());
        let by_label = Comparator::by_key(|node: &N| node.label);
        assert_eq!(tree.find(&n("a2", vec![]), &by_label), Some(NodeId(3)));
        assert_eq!(tree.find(&n("zzz", vec![]), &by_label), None);
        // Deep equality needs the whole subtree to match.
        assert_eq!(tree.find(&n("a2", vec![]), &Comparator::by_eq()), None);
    }

    #[test]
    fn empty_tree_is_root_only() {
        let tree = ItemTree::build(&[], &children());
        assert!(tree.is_empty());
        assert!(tree.is_leaf(NodeId::ROOT));
        assert_eq!(tree.flatten().count(), 1);
        assert_eq!(tree.subtree(NodeId(9)), 0..0);
        assert!(tree.children(NodeId(9)).is_empty());
    }

    #[test]
    fn deep_chain_builds_without_recursion() {
        #[derive(Debug)]
        struct Link {
            kids: Vec<Rc<Link>>,
        }

        let mut node = Rc::new(Link { kids: Vec::new() });
        for _ in 0..5_000 {
            node = Rc::new(Link { kids: vec![node] });
        }
        let tree = ItemTree::build(
            &[node],
            &Children::new(|link: &Rc<Link>| Some(link.kids.as_slice())),
        );
        assert_eq!(tree.len(), 5_002);
        assert_eq!(tree.height(), 5_001);
        assert_eq!(tree.subtree(NodeId(1)), 1..5_002);
        assert!(tree.is_leaf(NodeId(5_001)));
    }
}
