#![forbid(unsafe_code)]

//! Reconciliation ("shake"): restore parent/children consistency.
//!
//! After any change to the checked collection, a parent can disagree with its
//! children: all of its enabled children checked while the parent is not, or
//! the parent checked while some enabled child is not. A parent whose
//! children are all disabled has nothing left to disagree with, so it counts
//! as fully checked and an enabled one is checked. Leaves are never corrected.
//!
//! [`shake`] evaluates every node against one snapshot and returns the
//! corrections a single pre-order pass would dispatch. A correction deep in
//! the tree can create a new disagreement further up, which that pass has
//! already visited.
//!
//! [`settle`] in [`ReconcileMode::FixedPoint`] instead sweeps the tree once in
//! reverse pre-order over a live membership mask, so every parent is judged
//! against its children's final state and a whole tree settles in one sweep.
//! A second sweep confirms nothing is left; it only finds work when distinct
//! nodes share an identity. [`ReconcileMode::SinglePass`] applies one snapshot
//! pass and stops.

use crate::query::Membership;
use crate::selection::{Action, Selection};
use crate::tree::{NodeId, TreeView};

/// How far one transition reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ReconcileMode {
    /// Sweep until nothing changes.
    #[default]
    FixedPoint,
    /// One snapshot pass per transition; deep corrections may need later
    /// transitions to reach their ancestors.
    SinglePass,
}

/// Outcome of [`settle`].
#[derive(Debug, Clone)]
pub struct Settled<T> {
    /// The reconciled selection.
    pub selection: Selection<T>,
    /// Passes (or sweeps) that applied at least one correction.
    pub passes: usize,
    /// Total corrections applied.
    pub corrections: usize,
    /// Whether nothing was left to correct.
    pub converged: bool,
}

/// The correction node `id` needs against `membership`, if any.
fn correction<T>(id: NodeId, membership: &Membership, view: &TreeView<'_, T>) -> Option<Action> {
    if view.tree.is_leaf(id) {
        return None;
    }
    let children_checked = view.enabled_children(id).all(|child| membership.contains(child));
    let self_checked = membership.contains(id);

    if children_checked && !self_checked && !view.is_disabled(id) {
        Some(Action::Check(id))
    } else if !children_checked && self_checked {
        Some(Action::Uncheck(id))
    } else {
        None
    }
}

/// One pre-order pass: corrections needed against `selection` as it stands.
#[must_use]
pub fn shake<T>(selection: &Selection<T>, view: &TreeView<'_, T>) -> Vec<Action> {
    let membership = Membership::compute(view, selection);
    view.tree
        .flatten()
        .filter_map(|id| correction(id, &membership, view))
        .collect()
}

/// Corrections found and applied by one [`sweep`].
#[derive(Debug, Clone, Copy, Default)]
struct Sweep {
    found: usize,
    applied: usize,
}

/// Correct every node children-first, updating `membership` as it goes.
fn sweep<T: Clone>(
    selection: &mut Selection<T>,
    membership: &mut Membership,
    view: &TreeView<'_, T>,
) -> Sweep {
    let mut out = Sweep::default();
    for id in view.tree.flatten().rev() {
        let Some(action) = correction(id, membership, view) else {
            continue;
        };
        out.found += 1;
        if selection.apply(action, view) {
            out.applied += 1;
        }
        membership.set(id, matches!(action, Action::Check(_)));
    }
    out
}

/// Apply corrections until the collection is consistent (or once, in
/// single-pass mode).
#[must_use]
pub fn settle<T: Clone>(
    selection: Selection<T>,
    view: &TreeView<'_, T>,
    mode: ReconcileMode,
) -> Settled<T> {
    match mode {
        ReconcileMode::FixedPoint => settle_sweeping(selection, view),
        ReconcileMode::SinglePass => settle_once(selection, view),
    }
}

fn settle_sweeping<T: Clone>(mut selection: Selection<T>, view: &TreeView<'_, T>) -> Settled<T> {
    let max_passes = view.tree.height() + 2;
    let mut passes = 0;
    let mut corrections = 0;

    loop {
        // Fresh each sweep: an applied correction also moves every node that
        // shares the corrected item's identity.
        let mut membership = Membership::compute(view, &selection);
        let swept = sweep(&mut selection, &mut membership, view);
        if swept.applied == 0 {
            return Settled {
                selection,
                passes,
                corrections,
                converged: swept.found == 0,
            };
        }
        passes += 1;
        corrections += swept.applied;
        if passes == max_passes {
            let converged = is_consistent(&selection, view);
            return Settled {
                selection,
                passes,
                corrections,
                converged,
            };
        }
    }
}

fn settle_once<T: Clone>(mut selection: Selection<T>, view: &TreeView<'_, T>) -> Settled<T> {
    let actions = shake(&selection, view);
    let mut corrections = 0;
    for action in actions.iter().copied() {
        if selection.apply(action, view) {
            corrections += 1;
        }
    }
    let converged = actions.is_empty() || is_consistent(&selection, view);
    Settled {
        selection,
        passes: usize::from(corrections > 0),
        corrections,
        converged,
    }
}

/// Whether every non-leaf node agrees with its enabled children.
#[must_use]
pub fn is_consistent<T>(selection: &Selection<T>, view: &TreeView<'_, T>) -> bool {
    shake(selection, view).is_empty()
}

/// Nodes a pass would correct, without building actions.
#[must_use]
pub fn inconsistent_nodes<T>(selection: &Selection<T>, view: &TreeView<'_, T>) -> Vec<NodeId> {
    shake(selection, view).into_iter().map(Action::node).collect()
}
