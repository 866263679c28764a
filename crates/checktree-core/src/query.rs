#![forbid(unsafe_code)]

//! Derived checked/partial state.
//!
//! Nothing here is stored state: every table is a projection of a
//! [`Selection`] over a [`TreeView`], recomputed whenever the selection
//! changes.
//!
//! - `is_checked(n)`: if `n` has enabled children, all of them are checked
//!   (recursively); otherwise `n` itself is in the selection.
//! - `is_partially_checked(n)`: `n` is enabled and at least one strict
//!   descendant is in the selection.
//!
//! Both are computed for every node in one reverse pre-order sweep, since in
//! pre-order every child sits after its parent.

use crate::selection::Selection;
use crate::tree::{NodeId, TreeView};

/// Per-node membership of one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    mask: Vec<bool>,
}

impl Membership {
    /// Test every node of the view against `selection`.
    #[must_use]
    pub fn compute<T>(view: &TreeView<'_, T>, selection: &Selection<T>) -> Self {
        Self {
            mask: view
                .tree
                .flatten()
                .map(|id| selection.contains_node(view, id))
                .collect(),
        }
    }

    /// Whether node `id` is in the selection.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.mask.get(id.index()).copied().unwrap_or(false)
    }

    /// Overwrite one node's bit after a single-node `Check`/`Uncheck`.
    pub(crate) fn set(&mut self, id: NodeId, member: bool) {
        if let Some(slot) = self.mask.get_mut(id.index()) {
            *slot = member;
        }
    }

    /// Number of member nodes (synthetic root included when marked).
    #[must_use]
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|member| **member).count()
    }
}

/// Three-way visual state of a checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckState {
    /// Fully checked.
    Checked,
    /// Some descendants checked, not the whole node.
    Indeterminate,
    /// Nothing checked.
    Unchecked,
}

/// Checked and partial tables for every node of one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedState {
    membership: Membership,
    checked: Vec<bool>,
    partial: Vec<bool>,
}

impl DerivedState {
    /// Derive both tables for the whole tree.
    #[must_use]
    pub fn compute<T>(view: &TreeView<'_, T>, selection: &Selection<T>) -> Self {
        let membership = Membership::compute(view, selection);
        let len = view.tree.len();
        let mut checked = vec![false; len];
        let mut below = vec![false; len];

        for idx in (0..len).rev() {
            let id = NodeId(idx);
            let mut any_enabled = false;
            let mut all_checked = true;
            let mut any_below = false;
            for &child in view.tree.children(id) {
                any_below |= membership.contains(child) || below[child.index()];
                if !view.is_disabled(child) {
                    any_enabled = true;
                    all_checked &= checked[child.index()];
                }
            }
            checked[idx] = if any_enabled {
                all_checked
            } else {
                membership.contains(id)
            };
            below[idx] = any_below;
        }

        let partial = below
            .iter()
            .enumerate()
            .map(|(idx, any)| *any && !view.is_disabled(NodeId(idx)))
            .collect();

        Self {
            membership,
            checked,
            partial,
        }
    }

    /// Whether `id` reads as checked. Unknown ids read as unchecked.
    #[inline]
    #[must_use]
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.checked.get(id.index()).copied().unwrap_or(false)
    }

    /// Whether `id` is enabled and has a checked strict descendant.
    #[inline]
    #[must_use]
    pub fn is_partially_checked(&self, id: NodeId) -> bool {
        self.partial.get(id.index()).copied().unwrap_or(false)
    }

    /// Checkbox state for rendering: checked wins over indeterminate.
    #[must_use]
    pub fn check_state(&self, id: NodeId) -> CheckState {
        if self.is_checked(id) {
            CheckState::Checked
        } else if self.is_partially_checked(id) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Whether the synthetic root reads as checked.
    #[inline]
    #[must_use]
    pub fn all_checked(&self) -> bool {
        self.is_checked(NodeId::ROOT)
    }

    /// Raw membership the tables were derived from.
    #[must_use]
    pub fn membership(&self) -> &Membership {
        &self.membership
    }
}

impl<T> TreeView<'_, T> {
    /// Derive checked/partial tables for `selection`.
    #[must_use]
    pub fn derive(&self, selection: &Selection<T>) -> DerivedState {
        DerivedState::compute(self, selection)
    }
}

/// `is_checked(id)` evaluated over `id`'s subtree only.
pub(crate) fn subtree_is_checked<T>(view: &TreeView<'_, T>, selection: &Selection<T>, id: NodeId) -> bool {
    let range = view.tree.subtree(id);
    if range.is_empty() {
        return false;
    }
    let base = range.start;
    let mut checked = vec![false; range.len()];
    for idx in range.rev() {
        let node = NodeId(idx);
        let mut any_enabled = false;
        let mut all_checked = true;
        for child in view.enabled_children(node) {
            any_enabled = true;
            all_checked &= checked[child.index() - base];
        }
        checked[idx - base] = if any_enabled {
            all_checked
        } else {
            selection.contains_node(view, node)
        };
    }
    checked[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::children::Children;
    use crate::comparator::Comparator;
    use crate::disabled::{DisabledPredicate, DisabledSet};
    use crate::tree::ItemTree;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u8,
        off: bool,
        kids: Vec<Item>,
    }

    fn leaf(id: u8) -> Item {
        Item {
            id,
            off: false,
            kids: Vec::new(),
        }
    }

    fn branch(id: u8, kids: Vec<Item>) -> Item {
        Item {
            id,
            off: false,
            kids,
        }
    }

    // root(0) ─ 1(1) ─ 2(2)
    //                └ 3(3) ─ 4(4)
    //                       └ 5(5, disabled)
    //         └ 6(6, disabled) ─ 7(7)
    fn fixture() -> (ItemTree<Item>, Comparator<Item>, DisabledSet) {
        let mut five = leaf(5);
        five.off = true;
        let mut six = branch(6, vec![leaf(7)]);
        six.off = true;
        let items = vec![branch(1, vec![leaf(2), branch(3, vec![leaf(4), five])]), six];
        let tree = ItemTree::build(&items, &Children::new(|i: &Item| Some(i.kids.as_slice())));
        let disabled = DisabledSet::compute(&tree, &DisabledPredicate::new(|i: &Item| i.off));
        (tree, Comparator::by_key(|i: &Item| i.id), disabled)
    }

    #[test]
    fn leaf_checked_is_membership() {
        let (tree, cmp, disabled) = fixture();
        let view = TreeView::new(&tree, &cmp, &disabled);
        let sel = Selection::from_items([leaf(2)], &cmp);
        let derived = view.derive(&sel);
        assert!(derived.is_checked(NodeId(2)));
        assert!(!derived.is_checked(NodeId(4)));
        assert_eq!(derived.membership().count(), 1);
    }

    #[test]
    fn parent_checked_ignores_disabled_children() {
        let (tree, cmp, disabled) = fixture();
        let view = TreeView::new(&tree, &cmp, &disabled);
        let sel = Selection::from_items([leaf(4)], &cmp);
        let derived = view.derive(&sel);
        // 3's only enabled child is 4.
        assert!(derived.is_checked(NodeId(3)));
        assert!(!derived.is_checked(NodeId(1)));
        assert!(subtree_is_checked(&view, &sel, NodeId(3)));
        assert!(!subtree_is_checked(&view, &sel, NodeId(1)));
    }

    #[test]
    fn recursive_checked_through_levels() {
        let (tree, cmp, disabled) = fixture();
        let view = TreeView::new(&tree, &cmp, &disabled);
        let sel = Selection::from_items([leaf(2), leaf(4)], &cmp);
        let derived = view.derive(&sel);
        assert!(derived.is_checked(NodeId(1)));
        // Root's only enabled child is 1.
        assert!(derived.all_checked());
        assert!(subtree_is_checked(&view, &sel, NodeId::ROOT));
    }

    #[test]
    fn partial_needs_strict_descendant_and_enabled_node() {
        let (tree, cmp, disabled) = fixture();
        let view = TreeView::new(&tree, &cmp, &disabled);
        let sel = Selection::from_items([leaf(7), leaf(2)], &cmp);
        let derived = view.derive(&sel);
        assert!(derived.is_partially_checked(NodeId(1)));
        assert!(derived.is_partially_checked(NodeId::ROOT));
        // Disabled nodes never show partial.
        assert!(!derived.is_partially_checked(NodeId(6)));
        // Leaves have no descendants.
        assert!(!derived.is_partially_checked(NodeId(2)));
        assert_eq!(derived.check_state(NodeId(1)), CheckState::Indeterminate);
        assert_eq!(derived.check_state(NodeId(2)), CheckState::Checked);
        assert_eq!(derived.check_state(NodeId(4)), CheckState::Unchecked);
    }

    #[test]
    fn unknown_ids_read_as_unchecked() {
        let (tree, cmp, disabled) = fixture();
        let view = TreeView::new(&tree, &cmp, &disabled);
        let derived = view.derive(&Selection::new());
        assert!(!derived.is_checked(NodeId(100)));
        assert!(!derived.is_partially_checked(NodeId(100)));
        assert!(!subtree_is_checked(&view, &Selection::new(), NodeId(100)));
    }
}
