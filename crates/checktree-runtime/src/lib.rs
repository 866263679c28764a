#![forbid(unsafe_code)]

//! checktree runtime
//!
//! This crate strings the pure model of `checktree-core` into a stateful
//! engine that renderers drive from checkbox clicks.
//!
//! # Key Components
//!
//! - [`CheckboxTree`] - The engine: atomic transitions, settling, queries
//! - [`CheckboxTreeConfig`] - Injected capabilities and initial state
//! - [`TreeOptions`] - Plain-data tunables (reconciliation, notification)
//! - [`Subscription`] - RAII guard for change callbacks
//! - [`CheckboxTreeError`] - Failures addressing items outside the tree
//!
//! # Observability
//!
//! Each transition runs inside a `checkbox_tree.transition` tracing span
//! recording the operation, settle passes, corrections applied, checked
//! count and duration. Nothing is emitted unless the application installs a
//! `tracing` subscriber.

mod checkbox_tree;
pub mod config;
pub mod error;
pub mod options;
mod subscription;

pub use checkbox_tree::CheckboxTree;
pub use config::CheckboxTreeConfig;
pub use error::{CheckboxTreeError, Result};
#[cfg(feature = "options-config")]
pub use options::OptionsError;
pub use options::{NotifyPolicy, TreeOptions};
pub use subscription::Subscription;

// --- Core re-exports -------------------------------------------------------

pub use checktree_core::{
    Action, CheckState, Children, Comparator, DerivedState, DisabledPredicate, DisabledSet,
    ItemTree, NodeFlags, NodeId, ReconcileMode, Selection,
};
