#![forbid(unsafe_code)]

//! Tri-state hierarchical selection model.
//!
//! This crate holds the pure half of checktree: an arena view of an
//! application-supplied item tree, the ordered checked collection with its
//! reducer, the reconciliation pass that keeps parents consistent with their
//! children, and the derived checked/partial queries renderers read back.
//!
//! Nothing here logs, allocates global state, or talks to the outside world.
//! The stateful engine that strings these pieces into atomic transitions
//! lives in `checktree-runtime`.
//!
//! # Example
//!
//! ```
//! use checktree_core::{
//!     Action, Children, Comparator, DisabledPredicate, DisabledSet, ItemTree, NodeId,
//!     ReconcileMode, Selection, TreeView, reduce, settle,
//! };
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Node {
//!     name: &'static str,
//!     kids: Vec<Node>,
//! }
//!
//! let leaf = |name| Node { name, kids: Vec::new() };
//! let items = vec![Node { name: "a", kids: vec![leaf("b"), leaf("c")] }];
//!
//! let tree = ItemTree::build(&items, &Children::new(|n: &Node| Some(n.kids.as_slice())));
//! let disabled = DisabledSet::compute(&tree, &DisabledPredicate::never());
//! let cmp = Comparator::by_eq();
//! let view = TreeView::new(&tree, &cmp, &disabled);
//!
//! let b = tree.find(&leaf("b"), &cmp).unwrap();
//! let c = tree.find(&leaf("c"), &cmp).unwrap();
//! let sel = reduce(&Selection::new(), Action::BulkCheck(b), &view);
//! let sel = reduce(&sel, Action::BulkCheck(c), &view);
//! let settled = settle(sel, &view, ReconcileMode::FixedPoint);
//!
//! // Both children checked, so the parent and the synthetic root follow.
//! assert_eq!(settled.selection.len(), 3);
//! assert!(settled.selection.root_checked());
//! assert!(view.derive(&settled.selection).all_checked());
//! # let _ = NodeId::ROOT;
//! ```

pub mod children;
pub mod comparator;
pub mod disabled;
pub mod query;
pub mod reconcile;
pub mod selection;
pub mod tree;

pub use children::Children;
pub use comparator::Comparator;
pub use disabled::{DisabledPredicate, DisabledSet};
pub use query::{CheckState, DerivedState, Membership};
pub use reconcile::{ReconcileMode, Settled, inconsistent_nodes, is_consistent, settle, shake};
pub use selection::{Action, Selection, reduce};
pub use tree::{ItemTree, NodeFlags, NodeId, TreeView};
