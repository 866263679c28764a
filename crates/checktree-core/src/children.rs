#![forbid(unsafe_code)]

//! Children accessor: how an item exposes its nested items.
//!
//! Applications store hierarchy differently: a `Vec<Self>` field, an
//! optional list, or (for dynamic data) an array under a named key. The
//! [`Children`] accessor abstracts that away so the flattener only ever asks
//! "what are this item's children?".
//!
//! An item without children (accessor returns `None` or an empty slice) is
//! a leaf.

use std::fmt;
use std::rc::Rc;

/// Shared accessor callback.
type ChildrenFn<T> = dyn for<'a> Fn(&'a T) -> Option<&'a [T]>;

/// Injected accessor yielding the ordered children of an item.
///
/// Cloning shares the same callback.
pub struct Children<T> {
    accessor: Rc<ChildrenFn<T>>,
    field: Option<String>,
}

impl<T> Clone for Children<T> {
    fn clone(&self) -> Self {
        Self {
            accessor: Rc::clone(&self.accessor),
            field: self.field.clone(),
        }
    }
}

impl<T> fmt::Debug for Children<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Children<T> {
    /// Wrap an accessor function.
    #[must_use]
    pub fn new(accessor: impl for<'a> Fn(&'a T) -> Option<&'a [T]> + 'static) -> Self {
        Self {
            accessor: Rc::new(accessor),
            field: None,
        }
    }

    /// Treat every item as a leaf (flat checklists).
    #[must_use]
    pub fn none() -> Self {
        Self::new(|_| None)
    }
}

impl<T> Children<T> {
    /// Children of `item`, or `None` when it has no children field.
    #[inline]
    #[must_use]
    pub fn of<'a>(&self, item: &'a T) -> Option<&'a [T]> {
        (self.accessor)(item)
    }

    /// Name of the field the accessor reads, when built from one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

/// Default children key for JSON item trees.
#[cfg(feature = "json")]
pub const DEFAULT_CHILDREN_FIELD: &str = "children";

#[cfg(feature = "json")]
impl Children<serde_json::Value> {
    /// Read children from the array stored under `name`.
    ///
    /// A missing key, or a value that is not an array, makes the item a leaf.
    #[must_use]
    pub fn json_field(name: impl Into<String>) -> Self {
        let name = name.into();
        let key = name.clone();
        let mut children = Self::new(move |item| {
            item.get(key.as_str())
                .and_then(serde_json::Value::as_array)
                .map(Vec::as_slice)
        });
        children.field = Some(name);
        children
    }

    /// [`Children::json_field`] with the default `"children"` key.
    #[must_use]
    pub fn json() -> Self {
        Self::json_field(DEFAULT_CHILDREN_FIELD)
    }
}
