#![forbid(unsafe_code)]

//! Construction-time configuration for [`CheckboxTree`](crate::CheckboxTree).
//!
//! The caller injects three capabilities (children accessor, comparator,
//! disabled predicate) plus the initial checked items, plain-data
//! [`TreeOptions`], and an optional change callback.
//!
//! ```
//! use checktree_runtime::{CheckboxTreeConfig, Children, DisabledPredicate};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Folder {
//!     name: String,
//!     readonly: bool,
//!     children: Vec<Folder>,
//! }
//!
//! let config = CheckboxTreeConfig::new(Children::new(|f: &Folder| Some(f.children.as_slice())))
//!     .with_disabled(DisabledPredicate::new(|f: &Folder| f.readonly));
//! # let _ = config;
//! ```

use std::fmt;
use std::rc::Rc;

use checktree_core::{Children, Comparator, DisabledPredicate};

use crate::options::TreeOptions;

pub(crate) type ChangeCallback<T> = Rc<dyn Fn(&[T])>;

/// Everything a [`CheckboxTree`](crate::CheckboxTree) is built from.
pub struct CheckboxTreeConfig<T> {
    pub(crate) children: Children<T>,
    pub(crate) comparator: Comparator<T>,
    pub(crate) is_disabled: DisabledPredicate<T>,
    pub(crate) checked: Vec<T>,
    pub(crate) options: TreeOptions,
    pub(crate) on_change: Option<ChangeCallback<T>>,
}

impl<T> fmt::Debug for CheckboxTreeConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxTreeConfig")
            .field("children", &self.children)
            .field("checked", &self.checked.len())
            .field("options", &self.options)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: PartialEq + 'static> CheckboxTreeConfig<T> {
    /// Configuration comparing items by `PartialEq`.
    #[must_use]
    pub fn new(children: Children<T>) -> Self {
        Self::from_parts(children, Comparator::by_eq())
    }
}

impl<T: 'static> CheckboxTreeConfig<T> {
    /// Configuration for items that need a custom comparator.
    #[must_use]
    pub fn from_parts(children: Children<T>, comparator: Comparator<T>) -> Self {
        Self {
            children,
            comparator,
            is_disabled: DisabledPredicate::never(),
            checked: Vec::new(),
            options: TreeOptions::default(),
            on_change: None,
        }
    }

    /// Replace the comparator.
    #[must_use]
    pub fn with_comparator(mut self, comparator: Comparator<T>) -> Self {
        self.comparator = comparator;
        self
    }

    /// Set the disabled predicate.
    #[must_use]
    pub fn with_disabled(mut self, is_disabled: DisabledPredicate<T>) -> Self {
        self.is_disabled = is_disabled;
        self
    }

    /// Initially checked items. Duplicates under the comparator are dropped.
    #[must_use]
    pub fn with_checked(mut self, checked: impl IntoIterator<Item = T>) -> Self {
        self.checked = checked.into_iter().collect();
        self
    }

    /// Set plain-data options.
    #[must_use]
    pub fn with_options(mut self, options: TreeOptions) -> Self {
        self.options = options;
        self
    }

    /// Callback invoked with the checked items after each settled change.
    ///
    /// It stays registered for the lifetime of the engine.
    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(&[T]) + 'static) -> Self {
        self.on_change = Some(Rc::new(callback));
        self
    }

    /// The configured options.
    #[must_use]
    pub fn options(&self) -> &TreeOptions {
        &self.options
    }
}

#[cfg(feature = "json")]
impl CheckboxTreeConfig<serde_json::Value> {
    /// JSON items with children under `"children"`, compared by deep equality.
    #[must_use]
    pub fn json() -> Self {
        Self::new(Children::json())
    }

    /// JSON items with children under `field`, compared by deep equality.
    #[must_use]
    pub fn json_field(field: impl Into<String>) -> Self {
        Self::new(Children::json_field(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checktree_core::ReconcileMode;

    #[test]
    fn builder_collects_settings() {
        let config = CheckboxTreeConfig::new(Children::<u32>::none())
            .with_checked([1, 2, 3])
            .with_options(TreeOptions::default().with_reconcile(ReconcileMode::SinglePass))
            .with_disabled(DisabledPredicate::new(|n: &u32| *n > 10))
            .on_change(|_| {});
        assert_eq!(config.checked, [1, 2, 3]);
        assert_eq!(config.options().reconcile, ReconcileMode::SinglePass);
        assert!(config.is_disabled.test(&11));
        assert!(config.on_change.is_some());
    }

    #[test]
    fn custom_comparator_for_non_partial_eq_items() {
        struct Opaque(u8);
        let config =
            CheckboxTreeConfig::from_parts(Children::none(), Comparator::by_key(|o: &Opaque| o.0));
        assert!(config.comparator.eq(&Opaque(4), &Opaque(4)));
        let debug = format!("{config:?}");
        assert!(debug.starts_with("CheckboxTreeConfig"));
    }
}
