#![forbid(unsafe_code)]

//! The checked collection and its reducer.
//!
//! [`Selection`] is an ordered, duplicate-free (under the comparator) list of
//! checked items plus a marker for the synthetic root. It changes only through
//! [`reduce`] (pure, returns a new selection) or [`Selection::apply`] (the
//! same transition in place).
//!
//! # Actions
//!
//! | Action | Effect |
//! |---|---|
//! | `Toggle(n)` | If `n` is checked, remove every enabled node of its subtree; otherwise add them. Disabled nodes are left untouched either way. |
//! | `Check(n)` | Add `n` alone, unless disabled or already present. |
//! | `Uncheck(n)` | Remove `n` alone if present. |
//! | `BulkCheck(n)` | Add every enabled node of the subtree, root inclusive, pre-order. |
//! | `BulkUncheck(n)` | Remove every node of the subtree, disabled or not. |
//!
//! Every action is idempotent and none of them fail: acting on a disabled node
//! or an id outside the tree simply changes nothing.
//!
//! # Invariants
//!
//! 1. No two items compare equal under the comparator the selection was
//!    built and mutated with.
//! 2. Insertion order is preserved.
//! 3. No action ever adds a disabled node.
//! 4. `revision` increases exactly when an action changed the selection.

use crate::comparator::Comparator;
use crate::query;
use crate::tree::{NodeId, TreeView};

/// One transition of the checked collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Flip a node's aggregate checked state across its enabled subtree.
    Toggle(NodeId),
    /// Add a single node.
    Check(NodeId),
    /// Remove a single node.
    Uncheck(NodeId),
    /// Add every enabled node of a subtree.
    BulkCheck(NodeId),
    /// Remove every node of a subtree.
    BulkUncheck(NodeId),
}

impl Action {
    /// Node the action targets.
    #[must_use]
    pub const fn node(self) -> NodeId {
        match self {
            Self::Toggle(id)
            | Self::Check(id)
            | Self::Uncheck(id)
            | Self::BulkCheck(id)
            | Self::BulkUncheck(id) => id,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Toggle(_) => "toggle",
            Self::Check(_) => "check",
            Self::Uncheck(_) => "uncheck",
            Self::BulkCheck(_) => "bulk_check",
            Self::BulkUncheck(_) => "bulk_uncheck",
        }
    }
}

/// Ordered, comparator-unique collection of checked items.
#[derive(Debug, Clone)]
pub struct Selection<T> {
    items: Vec<T>,
    root: bool,
    revision: u64,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Selection<T> {
    /// Empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            root: false,
            revision: 0,
        }
    }

    /// Seed a selection from caller-supplied items, dropping later duplicates.
    ///
    /// Items are not checked against any tree; entries that match no node
    /// stay in the collection until replaced.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = T>, comparator: &Comparator<T>) -> Self {
        let mut out = Vec::new();
        for item in items {
            if !comparator.contains(&out, &item) {
                out.push(item);
            }
        }
        Self {
            items: out,
            root: false,
            revision: 0,
        }
    }

    /// Checked items in insertion order. The synthetic root is never listed.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the selection, yielding its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of checked items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item is checked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the synthetic root itself is marked checked.
    #[inline]
    #[must_use]
    pub fn root_checked(&self) -> bool {
        self.root
    }

    /// Change counter; bumped once per action that changed anything.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether an item equal to `item` is checked.
    #[must_use]
    pub fn contains(&self, item: &T, comparator: &Comparator<T>) -> bool {
        comparator.contains(&self.items, item)
    }

    /// Whether node `id` of the viewed tree is checked.
    #[must_use]
    pub fn contains_node(&self, view: &TreeView<'_, T>, id: NodeId) -> bool {
        if id.is_root() {
            return self.root;
        }
        view.tree
            .item(id)
            .is_some_and(|item| self.contains(item, view.comparator))
    }
}

impl<T: Clone> Selection<T> {
    /// Apply `action` in place. Returns whether the selection changed.
    pub fn apply(&mut self, action: Action, view: &TreeView<'_, T>) -> bool {
        let id = action.node();
        if !view.tree.contains(id) {
            return false;
        }

        let changed = match action {
            Action::Toggle(id) => {
                if query::subtree_is_checked(view, self, id) {
                    self.remove_where(view, id, |node| !view.is_disabled(node))
                } else {
                    self.insert_subtree(view, id)
                }
            }
            Action::Check(id) => !view.is_disabled(id) && self.insert_node(view, id),
            Action::Uncheck(id) => self.remove_node(view, id),
            Action::BulkCheck(id) => self.insert_subtree(view, id),
            Action::BulkUncheck(id) => self.remove_where(view, id, |_| true),
        };

        if changed {
            self.revision += 1;
        }
        changed
    }

    fn insert_node(&mut self, view: &TreeView<'_, T>, id: NodeId) -> bool {
        if id.is_root() {
            return !std::mem::replace(&mut self.root, true);
        }
        match view.tree.item(id) {
            Some(item) if !self.contains(item, view.comparator) => {
                self.items.push(item.clone());
                true
            }
            _ => false,
        }
    }

    fn remove_node(&mut self, view: &TreeView<'_, T>, id: NodeId) -> bool {
        if id.is_root() {
            return std::mem::replace(&mut self.root, false);
        }
        let Some(item) = view.tree.item(id) else {
            return false;
        };
        let before = self.items.len();
        self.items.retain(|checked| !view.comparator.eq(checked, item));
        self.items.len() != before
    }

    fn insert_subtree(&mut self, view: &TreeView<'_, T>, id: NodeId) -> bool {
        let mut changed = false;
        for idx in view.tree.subtree(id) {
            let node = NodeId(idx);
            if !view.is_disabled(node) {
                changed |= self.insert_node(view, node);
            }
        }
        changed
    }

    /// Remove every node of `id`'s subtree accepted by `accept`.
    fn remove_where(
        &mut self,
        view: &TreeView<'_, T>,
        id: NodeId,
        accept: impl Fn(NodeId) -> bool,
    ) -> bool {
        let targets: Vec<&T> = view
            .tree
            .subtree(id)
            .map(NodeId)
            .filter(|node| accept(*node))
            .filter_map(|node| view.tree.item(node))
            .collect();

        let mut changed = false;
        if id.is_root() && self.root && accept(NodeId::ROOT) {
            self.root = false;
            changed = true;
        }

        let before = self.items.len();
        self.items.retain(|checked| {
            !targets
                .iter()
                .any(|target| view.comparator.eq(checked, target))
        });
        changed || self.items.len() != before
    }
}

/// Pure reducer: `(selection, action) -> selection`.
#[must_use]
pub fn reduce<T: Clone>(selection: &Selection<T>, action: Action, view: &TreeView<'_, T>) -> Selection<T> {
    let mut next = selection.clone();
    next.apply(action, view);
    next
}
