#![forbid(unsafe_code)]

//! The checkbox-tree engine.
//!
//! [`CheckboxTree`] owns one item tree, its disabled set, the checked
//! collection and the derived checked/partial tables, and exposes the
//! operations a renderer wires to its checkboxes.
//!
//! # Transitions
//!
//! Every mutating operation is one synchronous, atomic transition:
//!
//! 1. the operation's action is reduced into a new collection;
//! 2. reconciliation runs against it until settled (see [`ReconcileMode`]);
//! 3. derived tables are recomputed;
//! 4. subscribers are notified once, with the settled items.
//!
//! No caller (subscriber or otherwise) can observe a half-reconciled
//! collection. Inside [`CheckboxTree::batch`] step 4 is deferred to the end of
//! the outermost batch and coalesced into a single notification.
//!
//! # Guards
//!
//! `toggle`, `check` and `uncheck` on a disabled item do nothing. The
//! whole-tree variants always run: the synthetic root is never disabled, so
//! `uncheck_all` still clears disabled items that were seeded as checked.
//!
//! # Membership
//!
//! Item-addressed operations look the item up in the current tree through the
//! comparator and fail with [`CheckboxTreeError::ItemNotInTree`] when it is
//! absent; node-addressed ones fail with
//! [`CheckboxTreeError::NodeOutOfRange`] for stale ids. Initially checked
//! items are taken as given: entries matching no node stay in
//! `checked_items` (and count for `some_checked`) until removed by
//! [`CheckboxTree::set_checked`].

use checktree_core::{
    Action, CheckState, Children, Comparator, DerivedState, DisabledPredicate, DisabledSet,
    ItemTree, NodeId, ReconcileMode, Selection, TreeView, reduce, settle,
};
use tracing::{debug, info_span, warn};
use web_time::Instant;

use crate::config::CheckboxTreeConfig;
use crate::error::{CheckboxTreeError, Result};
use crate::options::{NotifyPolicy, TreeOptions};
use crate::subscription::{Subscribers, Subscription};

/// Tri-state selection engine over one item tree.
pub struct CheckboxTree<T> {
    children: Children<T>,
    comparator: Comparator<T>,
    is_disabled: DisabledPredicate<T>,
    options: TreeOptions,
    tree: ItemTree<T>,
    disabled: DisabledSet,
    selection: Selection<T>,
    derived: DerivedState,
    subscribers: Subscribers<T>,
    batch_depth: u32,
    pending_notify: bool,
    version: u64,
}

impl<T: std::fmt::Debug> std::fmt::Debug for CheckboxTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckboxTree")
            .field("nodes", &self.tree.len())
            .field("checked", &self.selection.items())
            .field("disabled", &self.disabled.len())
            .field("options", &self.options)
            .field("version", &self.version)
            .field("subscriber_count", &self.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> CheckboxTree<T> {
    /// Build the engine over `items` (the caller's top-level sequence).
    ///
    /// The initial checked items are reconciled against the tree right away;
    /// subscribers are not notified for that.
    #[must_use]
    pub fn new(items: &[T], config: CheckboxTreeConfig<T>) -> Self {
        let CheckboxTreeConfig {
            children,
            comparator,
            is_disabled,
            checked,
            options,
            on_change,
        } = config;

        let tree = ItemTree::build(items, &children);
        let disabled = DisabledSet::compute(&tree, &is_disabled);
        let initial = Selection::from_items(checked, &comparator);

        let (selection, derived) = {
            let view = TreeView::new(&tree, &comparator, &disabled);
            let settled = settle(initial, &view, options.reconcile);
            let derived = view.derive(&settled.selection);
            (settled.selection, derived)
        };

        let mut subscribers = Subscribers::default();
        if let Some(callback) = on_change {
            subscribers.attach(callback);
        }

        debug!(
            nodes = tree.len() as u64,
            disabled = disabled.len() as u64,
            checked = selection.len() as u64,
            "checkbox tree created"
        );

        Self {
            children,
            comparator,
            is_disabled,
            options,
            tree,
            disabled,
            selection,
            derived,
            subscribers,
            batch_depth: 0,
            pending_notify: false,
            version: 0,
        }
    }

    // --- Mutations ---------------------------------------------------------

    /// Flip `item`'s aggregate state across its enabled subtree.
    ///
    /// Returns whether the checked collection changed.
    pub fn toggle(&mut self, item: &T) -> Result<bool> {
        let id = self.locate(item)?;
        self.toggle_node(id)
    }

    /// [`toggle`](Self::toggle) addressed by node id.
    pub fn toggle_node(&mut self, id: NodeId) -> Result<bool> {
        self.guarded("toggle", Action::Toggle(id))
    }

    /// Toggle the whole tree through the synthetic root.
    pub fn toggle_all(&mut self) -> bool {
        self.dispatch("toggle_all", Action::Toggle(NodeId::ROOT))
    }

    /// Check every enabled node of `item`'s subtree.
    pub fn check(&mut self, item: &T) -> Result<bool> {
        let id = self.locate(item)?;
        self.check_node(id)
    }

    /// [`check`](Self::check) addressed by node id.
    pub fn check_node(&mut self, id: NodeId) -> Result<bool> {
        self.guarded("check", Action::BulkCheck(id))
    }

    /// Check every enabled node of the tree.
    pub fn check_all(&mut self) -> bool {
        self.dispatch("check_all", Action::BulkCheck(NodeId::ROOT))
    }

    /// Uncheck every node of `item`'s subtree.
    pub fn uncheck(&mut self, item: &T) -> Result<bool> {
        let id = self.locate(item)?;
        self.uncheck_node(id)
    }

    /// [`uncheck`](Self::uncheck) addressed by node id.
    pub fn uncheck_node(&mut self, id: NodeId) -> Result<bool> {
        self.guarded("uncheck", Action::BulkUncheck(id))
    }

    /// Uncheck every node of the tree, disabled ones included.
    pub fn uncheck_all(&mut self) -> bool {
        self.dispatch("uncheck_all", Action::BulkUncheck(NodeId::ROOT))
    }

    /// Replace the checked collection wholesale, then reconcile.
    ///
    /// Items are not validated against the tree.
    pub fn set_checked(&mut self, checked: impl IntoIterator<Item = T>) -> bool {
        let replacement = Selection::from_items(checked, &self.comparator);
        self.transition("set_checked", None, |_, _| replacement, true)
    }

    /// Swap in a new item tree (e.g. fresh data on a re-render).
    ///
    /// The disabled set is recomputed and the current collection reconciled
    /// against the new structure.
    pub fn set_items(&mut self, items: &[T]) -> bool {
        self.tree = ItemTree::build(items, &self.children);
        self.disabled = DisabledSet::compute(&self.tree, &self.is_disabled);
        debug!(
            nodes = self.tree.len() as u64,
            disabled = self.disabled.len() as u64,
            "checkbox tree items replaced"
        );
        self.transition("set_items", None, |selection, _| selection.clone(), false)
    }

    /// Swap in a new disabled predicate and reconcile.
    pub fn set_disabled(&mut self, is_disabled: DisabledPredicate<T>) -> bool {
        self.is_disabled = is_disabled;
        self.disabled = DisabledSet::compute(&self.tree, &self.is_disabled);
        self.transition("set_disabled", None, |selection, _| selection.clone(), false)
    }

    /// Run several operations as one observable change.
    ///
    /// Subscribers are notified at most once, when the outermost batch ends,
    /// and only if some transition inside asked for a notification. The
    /// batch also ends when `f` unwinds.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mut scope = BatchScope::enter(self);
        f(&mut *scope.tree)
    }

    /// Register a change callback; dropping the guard detaches it.
    pub fn subscribe(&mut self, callback: impl Fn(&[T]) + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    // --- Queries -----------------------------------------------------------

    /// First node whose item equals `item` under the comparator.
    #[must_use]
    pub fn find(&self, item: &T) -> Option<NodeId> {
        self.tree.find(item, &self.comparator)
    }

    /// Whether `item` reads as checked.
    ///
    /// Items outside the tree fall back to plain membership.
    #[must_use]
    pub fn is_checked(&self, item: &T) -> bool {
        match self.find(item) {
            Some(id) => self.derived.is_checked(id),
            None => self.selection.contains(item, &self.comparator),
        }
    }

    /// Whether node `id` reads as checked.
    #[must_use]
    pub fn is_checked_node(&self, id: NodeId) -> bool {
        self.derived.is_checked(id)
    }

    /// Whether `item` is enabled and has a checked strict descendant.
    #[must_use]
    pub fn is_partially_checked(&self, item: &T) -> bool {
        self.find(item)
            .is_some_and(|id| self.derived.is_partially_checked(id))
    }

    /// Whether node `id` is enabled and has a checked strict descendant.
    #[must_use]
    pub fn is_partially_checked_node(&self, id: NodeId) -> bool {
        self.derived.is_partially_checked(id)
    }

    /// Visual checkbox state of `item`.
    #[must_use]
    pub fn check_state(&self, item: &T) -> CheckState {
        match self.find(item) {
            Some(id) => self.derived.check_state(id),
            None if self.selection.contains(item, &self.comparator) => CheckState::Checked,
            None => CheckState::Unchecked,
        }
    }

    /// Visual checkbox state of node `id`.
    #[must_use]
    pub fn check_state_node(&self, id: NodeId) -> CheckState {
        self.derived.check_state(id)
    }
}

impl<T> CheckboxTree<T> {
    /// Currently checked items, in insertion order.
    #[must_use]
    pub fn checked_items(&self) -> &[T] {
        self.selection.items()
    }

    /// The checked collection itself.
    #[must_use]
    pub fn selection(&self) -> &Selection<T> {
        &self.selection
    }

    /// The flattened tree, synthetic root included.
    #[must_use]
    pub fn item_tree(&self) -> &ItemTree<T> {
        &self.tree
    }

    /// Disabled items in pre-order.
    pub fn disabled_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.disabled.items(&self.tree)
    }

    /// Disabled node ids.
    #[must_use]
    pub fn disabled_set(&self) -> &DisabledSet {
        &self.disabled
    }

    /// Whether `item` is disabled under the current predicate.
    #[must_use]
    pub fn is_disabled(&self, item: &T) -> bool {
        self.is_disabled.test(item)
    }

    /// Whether node `id` is disabled.
    #[must_use]
    pub fn is_disabled_node(&self, id: NodeId) -> bool {
        self.disabled.contains(id)
    }

    /// Whether the whole tree reads as checked.
    #[must_use]
    pub fn all_checked(&self) -> bool {
        self.derived.all_checked()
    }

    /// Whether anything at all is checked.
    #[must_use]
    pub fn some_checked(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Derived checked/partial tables for the settled collection.
    #[must_use]
    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    /// Engine options.
    #[must_use]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Number of transitions that changed the checked collection.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

// --- Transition machinery ---------------------------------------------------

impl<T: Clone + 'static> CheckboxTree<T> {
    fn locate(&self, item: &T) -> Result<NodeId> {
        self.find(item).ok_or(CheckboxTreeError::ItemNotInTree)
    }

    fn ensure_node(&self, id: NodeId) -> Result<()> {
        if self.tree.contains(id) {
            Ok(())
        } else {
            Err(CheckboxTreeError::NodeOutOfRange {
                id: id.index(),
                len: self.tree.len(),
            })
        }
    }

    /// Dispatch a caller-level action unless its target is disabled.
    fn guarded(&mut self, op: &'static str, action: Action) -> Result<bool> {
        let id = action.node();
        self.ensure_node(id)?;
        if self.disabled.contains(id) {
            debug!(op, node = id.index() as u64, "ignored on disabled node");
            return Ok(false);
        }
        Ok(self.dispatch(op, action))
    }

    fn dispatch(&mut self, op: &'static str, action: Action) -> bool {
        self.transition(
            op,
            Some(action.node()),
            |selection, view| reduce(selection, action, view),
            false,
        )
    }

    /// One atomic transition: reduce, settle, derive, notify.
    fn transition(
        &mut self,
        op: &'static str,
        node: Option<NodeId>,
        next: impl FnOnce(&Selection<T>, &TreeView<'_, T>) -> Selection<T>,
        replaced: bool,
    ) -> bool {
        let start = Instant::now();
        let span = info_span!(
            "checkbox_tree.transition",
            op,
            node = node.map(|id| id.index() as u64),
            passes = tracing::field::Empty,
            corrections = tracing::field::Empty,
            checked = tracing::field::Empty,
            changed = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        let guard = span.enter();

        let before = self.selection.revision();
        let view = TreeView::new(&self.tree, &self.comparator, &self.disabled);
        let candidate = next(&self.selection, &view);
        let settled = settle(candidate, &view, self.options.reconcile);

        if !settled.converged && self.options.reconcile == ReconcileMode::FixedPoint {
            warn!(
                op,
                passes = settled.passes as u64,
                "reconciliation hit its pass bound before settling"
            );
        }

        let changed = replaced || settled.selection.revision() != before;
        self.derived = view.derive(&settled.selection);
        self.selection = settled.selection;
        if changed {
            self.version += 1;
        }

        span.record("passes", settled.passes as u64);
        span.record("corrections", settled.corrections as u64);
        span.record("checked", self.selection.len() as u64);
        span.record("changed", changed);
        span.record("duration_us", start.elapsed().as_micros() as u64);
        drop(guard);

        if changed || self.options.notify == NotifyPolicy::EveryTransition {
            if self.batch_depth > 0 {
                self.pending_notify = true;
            } else {
                self.subscribers.notify(self.selection.items());
            }
        }
        changed
    }
}

/// Open batch level; dropping it closes the level and flushes at depth 0.
struct BatchScope<'a, T> {
    tree: &'a mut CheckboxTree<T>,
}

impl<'a, T> BatchScope<'a, T> {
    fn enter(tree: &'a mut CheckboxTree<T>) -> Self {
        tree.batch_depth += 1;
        Self { tree }
    }
}

impl<T> Drop for BatchScope<'_, T> {
    fn drop(&mut self) {
        let tree = &mut *self.tree;
        tree.batch_depth -= 1;
        if tree.batch_depth == 0 && std::mem::take(&mut tree.pending_notify) {
            tree.subscribers.notify(tree.selection.items());
        }
    }
}
