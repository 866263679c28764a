#![forbid(unsafe_code)]

//! checktree public facade crate.
//!
//! Re-exports the model and the engine behind one dependency, plus a
//! prelude for day-to-day usage.
//!
//! ```
//! use checktree::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Entry {
//!     name: &'static str,
//!     children: Vec<Entry>,
//! }
//!
//! let leaf = |name| Entry { name, children: Vec::new() };
//! let items = vec![Entry { name: "src", children: vec![leaf("lib.rs"), leaf("main.rs")] }];
//!
//! let mut tree = CheckboxTree::new(
//!     &items,
//!     CheckboxTreeConfig::new(Children::new(|e: &Entry| Some(e.children.as_slice()))),
//! );
//!
//! tree.check(&leaf("lib.rs"))?;
//! assert_eq!(tree.check_state(&items[0]), CheckState::Indeterminate);
//!
//! tree.check(&leaf("main.rs"))?;
//! assert_eq!(tree.check_state(&items[0]), CheckState::Checked);
//! assert!(tree.all_checked());
//! # Ok::<(), checktree::CheckboxTreeError>(())
//! ```

// --- Model re-exports ------------------------------------------------------

pub use checktree_core::{
    Action, CheckState, Children, Comparator, DerivedState, DisabledPredicate, DisabledSet,
    ItemTree, Membership, NodeFlags, NodeId, ReconcileMode, Selection, Settled, TreeView,
    inconsistent_nodes, is_consistent, reduce, settle, shake,
};

// --- Runtime re-exports ----------------------------------------------------

pub use checktree_runtime::{
    CheckboxTree, CheckboxTreeConfig, CheckboxTreeError, NotifyPolicy, Result, Subscription,
    TreeOptions,
};

#[cfg(feature = "options-config")]
pub use checktree_runtime::OptionsError;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CheckState, CheckboxTree, CheckboxTreeConfig, CheckboxTreeError, Children, Comparator,
        DisabledPredicate, NodeId, NotifyPolicy, ReconcileMode, Subscription, TreeOptions,
    };

    pub use crate::{core, runtime};
}

pub use checktree_core as core;
pub use checktree_runtime as runtime;
