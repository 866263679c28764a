#![forbid(unsafe_code)]

//! Disabled-item filter.
//!
//! A disabled node can never be newly checked or toggled, and it is left out
//! when deciding whether a parent's children are "all checked". Unchecking is
//! still allowed: disabling freezes additions, not removals.
//!
//! The filter runs over the flattened tree and is recomputed whenever the tree
//! or the predicate changes. The synthetic root is never disabled.

use std::fmt;
use std::rc::Rc;

use crate::tree::{ItemTree, NodeId};

type PredicateFn<T> = dyn Fn(&T) -> bool;

/// Injected "can this item never be checked" predicate.
pub struct DisabledPredicate<T> {
    predicate: Rc<PredicateFn<T>>,
}

impl<T> Clone for DisabledPredicate<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for DisabledPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisabledPredicate").finish_non_exhaustive()
    }
}

impl<T: 'static> DisabledPredicate<T> {
    /// Wrap a predicate.
    #[must_use]
    pub fn new(predicate: impl Fn(&T) -> bool + 'static) -> Self {
        Self {
            predicate: Rc::new(predicate),
        }
    }

    /// Nothing is disabled.
    #[must_use]
    pub fn never() -> Self {
        Self::new(|_| false)
    }
}

impl<T: 'static> Default for DisabledPredicate<T> {
    fn default() -> Self {
        Self::never()
    }
}

impl<T> DisabledPredicate<T> {
    /// Whether `item` is disabled.
    #[inline]
    #[must_use]
    pub fn test(&self, item: &T) -> bool {
        (self.predicate)(item)
    }
}

/// Nodes of one [`ItemTree`] rejected by a [`DisabledPredicate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledSet {
    mask: Vec<bool>,
    ids: Vec<NodeId>,
}

impl DisabledSet {
    /// Apply `predicate` to every node of `tree` in pre-order.
    #[must_use]
    pub fn compute<T>(tree: &ItemTree<T>, predicate: &DisabledPredicate<T>) -> Self {
        let mut mask = vec![false; tree.len()];
        let mut ids = Vec::new();
        for id in tree.flatten() {
            if tree.item(id).is_some_and(|item| predicate.test(item)) {
                mask[id.index()] = true;
                ids.push(id);
            }
        }
        Self { mask, ids }
    }

    /// Whether `id` is disabled. Unknown ids are not.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.mask.get(id.index()).copied().unwrap_or(false)
    }

    /// Disabled node ids in pre-order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of disabled nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no node is disabled.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The disabled items themselves, in pre-order.
    pub fn items<'t, T>(&'t self, tree: &'t ItemTree<T>) -> impl Iterator<Item = &'t T> + 't {
        self.ids.iter().filter_map(move |id| tree.item(*id))
    }
}
